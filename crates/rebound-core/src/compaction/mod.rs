//! Session compaction on context-window overflow.
//!
//! - `Compactor`: port for the token-threshold compaction routine
//! - `BoxCompactor`: object-safe wrapper for dynamic dispatch
//! - `CompactionTrigger`: one-shot compaction with a scoped retention override

pub mod box_compactor;
pub mod compactor;
pub mod trigger;

pub use box_compactor::BoxCompactor;
pub use compactor::Compactor;
pub use trigger::{CompactionTrigger, DEFAULT_EVENT_RETENTION_SIZE};
