//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod request;

// Re-export repositories
pub use request::RequestRepository;
