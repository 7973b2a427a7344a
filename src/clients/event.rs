//! Event service client

use async_trait::async_trait;
use tracing::debug;

use crate::models::EventSnapshot;
use crate::utils::errors::{GatewayError, GatewayResult};
use super::{build_http_client, map_status_error, map_transport_error, EventGateway};

const SERVICE: &str = "event-service";

#[derive(Debug, Clone)]
pub struct EventServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl EventServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout_seconds)?,
            base_url,
        })
    }
}

#[async_trait]
impl EventGateway for EventServiceClient {
    async fn get_event(&self, event_id: i64) -> GatewayResult<EventSnapshot> {
        let url = format!("{}/{}", self.base_url, event_id);
        debug!(event_id = event_id, url = %url, "Fetching event snapshot");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(map_status_error(SERVICE, event_id, response).await);
        }

        response.json::<EventSnapshot>().await.map_err(|e| {
            GatewayError::InvalidResponse { service: SERVICE, message: e.to_string() }
        })
    }

    async fn add_participant(&self, event_id: i64, user_id: i64) -> GatewayResult<()> {
        let url = format!("{}/{}/participants/{}", self.base_url, event_id, user_id);
        debug!(event_id = event_id, user_id = user_id, "Adding event participant");

        let response = self.client
            .post(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(map_status_error(SERVICE, event_id, response).await);
        }

        Ok(())
    }
}
