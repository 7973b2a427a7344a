//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub services: ServicesConfig,
    pub request: RequestConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis notification bus configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub channel_prefix: String,
}

/// Base URLs and timeout for the collaborator services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    pub event_service_url: String,
    pub user_service_url: String,
    pub rating_service_url: String,
    pub chat_service_url: String,
    pub timeout_seconds: u64,
}

/// Join-request lifecycle policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestConfig {
    /// Days a pending request stays open before it expires
    pub auto_expire_days: i64,
    /// Cap on concurrent PENDING requests per requester
    pub max_pending_requests: i64,
    /// Permit a second active request for the same event
    pub allow_duplicate_requests: bool,
    /// Minimum rating applied when an event specifies none
    pub default_min_rating: f64,
    /// Terminal requests older than this many days are purged
    pub retention_days: i64,
}

/// Background task cadence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    pub sweep_interval_seconds: u64,
    pub purge_interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("GATHERLY"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::GatherlyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/gatherly_requests".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                channel_prefix: "gatherly:".to_string(),
            },
            services: ServicesConfig {
                event_service_url: "http://localhost:8081/api/events".to_string(),
                user_service_url: "http://localhost:8082/api/users".to_string(),
                rating_service_url: "http://localhost:8083/api/ratings".to_string(),
                chat_service_url: "http://localhost:8084/api/chat".to_string(),
                timeout_seconds: 5,
            },
            request: RequestConfig {
                auto_expire_days: 7,
                max_pending_requests: 10,
                allow_duplicate_requests: false,
                default_min_rating: 0.0,
                retention_days: 90,
            },
            scheduler: SchedulerConfig {
                sweep_interval_seconds: 3600,
                purge_interval_seconds: 86400,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/gatherly".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_request_policy() {
        let settings = Settings::default();
        assert_eq!(settings.request.auto_expire_days, 7);
        assert_eq!(settings.request.max_pending_requests, 10);
        assert!(!settings.request.allow_duplicate_requests);
    }
}
