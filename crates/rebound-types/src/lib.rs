//! Shared domain types for Rebound.
//!
//! This crate contains the plain data exchanged between the executor and its
//! collaborators: runtime events, sessions, run requests, compaction
//! configuration, A2A task events, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, anyhow.

pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod task;
