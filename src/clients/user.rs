//! User service client

use async_trait::async_trait;
use tracing::debug;

use crate::models::UserSnapshot;
use crate::utils::errors::{GatewayError, GatewayResult};
use super::{build_http_client, map_status_error, map_transport_error, IdentityGateway};

const SERVICE: &str = "user-service";

#[derive(Debug, Clone)]
pub struct UserServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout_seconds)?,
            base_url,
        })
    }
}

#[async_trait]
impl IdentityGateway for UserServiceClient {
    async fn get_user(&self, user_id: i64) -> GatewayResult<UserSnapshot> {
        let url = format!("{}/{}", self.base_url, user_id);
        debug!(user_id = user_id, url = %url, "Fetching user snapshot");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(map_status_error(SERVICE, user_id, response).await);
        }

        response.json::<UserSnapshot>().await.map_err(|e| {
            GatewayError::InvalidResponse { service: SERVICE, message: e.to_string() }
        })
    }
}
