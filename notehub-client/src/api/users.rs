use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::domain::User;
use reqwest::Method;

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/users/me").await
    }

    /// Same as [`Self::me`] for a token that is not in the session yet.
    pub async fn me_as(&self, token: &str) -> Result<User, ApiError> {
        let req = self.client.request(Method::GET, "/users/me");
        let res = self.client.send_as(req, token).await?;
        Ok(res.json::<User>().await?)
    }
}
