//! Remote collaborator gateways
//!
//! Narrow clients to the event, user, rating, and chat services. Each trait
//! carries exactly the calls the orchestration core needs; the concrete
//! implementations speak JSON over HTTP with a shared timeout.

pub mod event;
pub mod user;
pub mod rating;
pub mod chat;

use std::time::Duration;
use async_trait::async_trait;

use crate::models::{EventSnapshot, RatingSummary, UserSnapshot};
use crate::utils::errors::{GatewayError, GatewayResult};

pub use event::EventServiceClient;
pub use user::UserServiceClient;
pub use rating::RatingServiceClient;
pub use chat::ChatServiceClient;

/// Event collaborator: snapshots and participant registration
#[async_trait]
pub trait EventGateway: Send + Sync {
    async fn get_event(&self, event_id: i64) -> GatewayResult<EventSnapshot>;

    /// Idempotent at the collaborator: re-adding an existing participant
    /// is a no-op there.
    async fn add_participant(&self, event_id: i64, user_id: i64) -> GatewayResult<()>;
}

/// Identity collaborator: requester profile snapshots
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn get_user(&self, user_id: i64) -> GatewayResult<UserSnapshot>;
}

/// Trust collaborator: requester rating summaries
#[async_trait]
pub trait TrustGateway: Send + Sync {
    async fn get_rating_summary(&self, user_id: i64) -> GatewayResult<RatingSummary>;
}

/// Chat collaborator: event room membership. Creating the room on first
/// member is the collaborator's responsibility.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn add_member_to_event_room(&self, event_id: i64, user_id: i64) -> GatewayResult<()>;
}

/// Build the HTTP client shared by the gateway implementations
pub(crate) fn build_http_client(timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent("Gatherly-Requests/1.0")
        .build()
}

/// Map a transport-level failure onto the gateway error taxonomy
pub(crate) fn map_transport_error(service: &'static str, e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout { service }
    } else if e.is_connect() {
        GatewayError::ServiceUnavailable { service }
    } else {
        GatewayError::RequestFailed { service, message: e.to_string() }
    }
}

/// Convert a non-success HTTP response into a gateway error
pub(crate) async fn map_status_error(
    service: &'static str,
    id: i64,
    response: reqwest::Response,
) -> GatewayError {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return GatewayError::NotFound { service, id };
    }

    let body = response.text().await.unwrap_or_default();
    GatewayError::RequestFailed {
        service,
        message: format!("HTTP {}: {}", status, body),
    }
}
