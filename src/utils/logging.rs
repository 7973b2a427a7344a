//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! helpers for the request service.

use tracing::{info, warn, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must stay alive for the lifetime of the process;
/// dropping it stops the background file writer.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "gatherly-requests.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a request lifecycle transition with structured data
pub fn log_request_transition(request_id: i64, from: &str, to: &str, actor_id: i64) {
    info!(
        request_id = request_id,
        from = from,
        to = to,
        actor_id = actor_id,
        "Request status transition"
    );
}

/// Log a failed side effect after a committed approval
pub fn log_side_effect_failure(request_id: i64, step: &str, error: &str) {
    error!(
        request_id = request_id,
        step = step,
        error = error,
        "Approval side effect failed; transition remains committed"
    );
}

/// Log collaborator call failures with context
pub fn log_gateway_error(service: &str, error: &str, context: Option<&str>) {
    warn!(
        service = service,
        error = error,
        context = context,
        "Collaborator call failed"
    );
}
