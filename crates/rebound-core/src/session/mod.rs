//! Session store abstractions for Rebound.
//!
//! This module defines the `SessionService` trait that the hosting runtime
//! implements, plus the `BoxSessionService` wrapper used for dynamic dispatch.

pub mod box_service;
pub mod service;

pub use box_service::BoxSessionService;
pub use service::SessionService;
