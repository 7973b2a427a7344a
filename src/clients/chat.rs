//! Chat service client

use async_trait::async_trait;
use tracing::debug;

use crate::utils::errors::GatewayResult;
use super::{build_http_client, map_status_error, map_transport_error, ChatGateway};

const SERVICE: &str = "chat-service";

#[derive(Debug, Clone)]
pub struct ChatServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout_seconds)?,
            base_url,
        })
    }
}

#[async_trait]
impl ChatGateway for ChatServiceClient {
    async fn add_member_to_event_room(&self, event_id: i64, user_id: i64) -> GatewayResult<()> {
        let url = format!("{}/groups/event/{}/participants/{}", self.base_url, event_id, user_id);
        debug!(event_id = event_id, user_id = user_id, "Adding member to event chat room");

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
