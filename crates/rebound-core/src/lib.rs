//! Context-overflow recovery and collaborator traits for Rebound.
//!
//! This crate defines the "ports" (traits) for the agent runtime, session
//! store, compaction routine, and outbound event queue, plus the decision
//! logic that sits between them: classifying context-window failures,
//! compacting a session once, and retrying the failed turn once. It depends
//! only on `rebound-types` -- never on a concrete runtime or storage crate.

pub mod classify;
pub mod compaction;
pub mod config;
pub mod error;
pub mod executor;
pub mod queue;
pub mod runner;
pub mod session;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;
