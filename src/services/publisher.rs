//! Lifecycle notification publishing
//!
//! The orchestrator publishes request lifecycle notifications to a Redis
//! pub/sub bus for asynchronous fan-out (push, email, WebSocket). Publishing
//! is fire-and-forget from the orchestrator's perspective; failures are
//! logged, never propagated.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{EventSnapshot, JoinRequest, UserSnapshot};
use crate::utils::errors::Result;

/// Lifecycle notification channels. Expired requests reuse the declined
/// channel with an `expired` flag.
pub mod channels {
    pub const REQUEST_CREATED: &str = "join.request.created";
    pub const REQUEST_APPROVED: &str = "join.request.approved";
    pub const REQUEST_DECLINED: &str = "join.request.declined";
    pub const REQUEST_CANCELLED: &str = "join.request.cancelled";
}

/// Publish-only obligation of the orchestration core. Subscriber behavior
/// and channel provisioning are external concerns.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: Value) -> Result<()>;
}

/// Redis pub/sub implementation of the notification bus
#[derive(Clone)]
pub struct RedisEventPublisher {
    client: redis::Client,
    channel_prefix: String,
}

impl RedisEventPublisher {
    pub fn new(client: redis::Client, channel_prefix: String) -> Self {
        Self { client, channel_prefix }
    }
}

#[async_trait]
impl NotificationPublisher for RedisEventPublisher {
    async fn publish(&self, channel: &str, payload: Value) -> Result<()> {
        let mut conn = self.client.get_async_connection().await?;
        let full_channel = format!("{}{}", self.channel_prefix, channel);

        let _: () = redis::cmd("PUBLISH")
            .arg(&full_channel)
            .arg(payload.to_string())
            .query_async(&mut conn)
            .await?;

        debug!(channel = %full_channel, "Lifecycle notification published");
        Ok(())
    }
}

/// Identifier payload common to every lifecycle notification
pub fn basic_payload(request: &JoinRequest) -> Value {
    json!({
        "requestId": request.id,
        "eventId": request.event_id,
        "requesterUserId": request.requester_user_id,
        "hostUserId": request.host_user_id,
        "status": request.status,
        "timestamp": Utc::now().timestamp_millis(),
    })
}

/// Created notifications carry enough context for the host's notification
/// without another round of collaborator lookups.
pub fn created_payload(request: &JoinRequest, event: &EventSnapshot, requester: &UserSnapshot) -> Value {
    let mut payload = basic_payload(request);
    if let Value::Object(fields) = &mut payload {
        fields.insert("eventTitle".to_string(), json!(event.title));
        fields.insert("eventHostName".to_string(), json!(event.host_username));
        fields.insert("requesterUsername".to_string(), json!(requester.username));
        fields.insert("requesterRating".to_string(), json!(request.requester_rating));
        fields.insert("requestMessage".to_string(), json!(request.request_message));
    }
    payload
}

/// Expired requests are announced on the declined channel with a flag
pub fn expired_payload(request: &JoinRequest) -> Value {
    let mut payload = basic_payload(request);
    if let Value::Object(fields) = &mut payload {
        fields.insert("expired".to_string(), json!(true));
    }
    payload
}
