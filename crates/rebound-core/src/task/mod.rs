//! Mapping between runtime events and A2A task events.
//!
//! - `convert`: runtime `Event` -> `TaskEvent`, A2A message -> run request
//! - `aggregator`: folds forwarded status updates into the task's final state

pub mod aggregator;
pub mod convert;

pub use aggregator::TaskResultAggregator;
pub use convert::{build_run_args, convert_event};
