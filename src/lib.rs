//! Gatherly Request Service
//!
//! Join request orchestration for Gatherly events. This library owns the
//! full request lifecycle: eligibility evaluation against event policy,
//! approval and decline flows with auto-approval, bulk responses,
//! expiration sweeps, and retention cleanup, with lifecycle notifications
//! published for asynchronous fan-out.

pub mod clients;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GatherlyError, GatewayError, Result};

// Re-export main components for easy access
pub use database::{RequestRepository, RequestStore};
pub use services::{EligibilityChecker, NotificationPublisher, RequestService, Scheduler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
