//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{GatherlyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_services_config(&settings.services)?;
    validate_request_config(&settings.request)?;
    validate_scheduler_config(&settings.scheduler)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GatherlyError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(GatherlyError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GatherlyError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GatherlyError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

/// Validate collaborator service configuration
fn validate_services_config(config: &super::ServicesConfig) -> Result<()> {
    for (name, url) in [
        ("Event service URL", &config.event_service_url),
        ("User service URL", &config.user_service_url),
        ("Rating service URL", &config.rating_service_url),
        ("Chat service URL", &config.chat_service_url),
    ] {
        if url.is_empty() {
            return Err(GatherlyError::Config(format!("{} is required", name)));
        }
    }

    if config.timeout_seconds == 0 {
        return Err(GatherlyError::Config(
            "Service timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate request lifecycle policy
fn validate_request_config(config: &super::RequestConfig) -> Result<()> {
    if config.auto_expire_days <= 0 {
        return Err(GatherlyError::Config(
            "Auto-expire window must be at least one day".to_string()
        ));
    }

    if config.max_pending_requests <= 0 {
        return Err(GatherlyError::Config(
            "Max pending requests must be greater than 0".to_string()
        ));
    }

    if config.default_min_rating < 0.0 || config.default_min_rating > 5.0 {
        return Err(GatherlyError::Config(
            "Default minimum rating must be between 0.0 and 5.0".to_string()
        ));
    }

    if config.retention_days <= 0 {
        return Err(GatherlyError::Config(
            "Retention window must be at least one day".to_string()
        ));
    }

    Ok(())
}

/// Validate scheduler cadence
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if config.sweep_interval_seconds == 0 || config.purge_interval_seconds == 0 {
        return Err(GatherlyError::Config(
            "Scheduler intervals must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GatherlyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GatherlyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_pending_cap() {
        let mut settings = Settings::default();
        settings.request.max_pending_requests = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_default_rating() {
        let mut settings = Settings::default();
        settings.request.default_min_rating = 7.5;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_invalid_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_empty_service_url() {
        let mut settings = Settings::default();
        settings.services.chat_service_url = String::new();
        assert!(validate_settings(&settings).is_err());
    }
}
