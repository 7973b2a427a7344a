//! Rating service client

use async_trait::async_trait;
use tracing::debug;

use crate::models::RatingSummary;
use crate::utils::errors::{GatewayError, GatewayResult};
use super::{build_http_client, map_status_error, map_transport_error, TrustGateway};

const SERVICE: &str = "rating-service";

#[derive(Debug, Clone)]
pub struct RatingServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl RatingServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout_seconds)?,
            base_url,
        })
    }
}

#[async_trait]
impl TrustGateway for RatingServiceClient {
    async fn get_rating_summary(&self, user_id: i64) -> GatewayResult<RatingSummary> {
        let url = format!("{}/summary/{}", self.base_url, user_id);
        debug!(user_id = user_id, url = %url, "Fetching rating summary");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(map_status_error(SERVICE, user_id, response).await);
        }

        response.json::<RatingSummary>().await.map_err(|e| {
            GatewayError::InvalidResponse { service: SERVICE, message: e.to_string() }
        })
    }
}
