use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::api::HealthCheckResponse;

pub struct HealthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn check(&self) -> Result<HealthCheckResponse, ApiError> {
        self.client.get("/health").await
    }
}
