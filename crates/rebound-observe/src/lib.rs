//! Observability setup for Rebound.
//!
//! The executor crates only emit `tracing` spans and events; binaries that
//! embed them call [`tracing_setup::init_tracing`] once at startup.

pub mod tracing_setup;

pub use tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
