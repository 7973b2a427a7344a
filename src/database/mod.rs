//! Database module
//!
//! This module handles database connections and the request store

pub mod connection;
pub mod store;
pub mod repositories;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use store::RequestStore;
pub use repositories::RequestRepository;
