use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::api::{Credentials, Token};
use notehub_common::domain::User;
use reqwest::Method;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The login endpoint is an OAuth2 password flow and only accepts form data.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let form = Credentials {
            username: username.into(),
            password: password.into(),
        };
        let req = self.client.request(Method::POST, "/auth/login").form(&form);
        let res = self.client.send(req).await?;
        Ok(res.json::<Token>().await?)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = Credentials {
            username: username.into(),
            password: password.into(),
        };
        self.client
            .send_json(Method::POST, "/auth/register", &body)
            .await
    }
}
