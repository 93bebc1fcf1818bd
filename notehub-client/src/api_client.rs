use crate::cache::QueryCache;
use crate::error::ApiError;
use crate::router::{Navigator, Route};
use crate::session::SessionStore;
use crate::settings::Settings;
use eyre::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Every backend call goes through here. Attaches the session token on the way out and turns
/// failed responses into [`ApiError`] on the way back.
///
/// A 401 from any endpoint ends the session, drops every cached query and sends the navigator to
/// the login route.
#[derive(Clone)]
pub struct ApiClient {
    address: String,
    http: reqwest::Client,
    session: SessionStore,
    cache: QueryCache,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(
        settings: &Settings,
        session: SessionStore,
        cache: QueryCache,
        navigator: Navigator,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .wrap_err("Failed to build http client")?;

        Ok(Self {
            address: settings.server_address.trim_end_matches('/').to_string(),
            http,
            session,
            cache,
            navigator,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.address))
    }

    /// Sends with whatever token the session holds at this moment.
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.session.token();
        self.dispatch(req, token).await
    }

    /// Sends with an explicit token, used before the token has become part of the session.
    pub(crate) async fn send_as(&self, req: RequestBuilder, token: &str) -> Result<Response, ApiError> {
        self.dispatch(req, Some(token.to_string())).await
    }

    async fn dispatch(&self, req: RequestBuilder, token: Option<String>) -> Result<Response, ApiError> {
        let req = match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let req = req.build()?;
        let method = req.method().clone();
        let path = req.url().path().to_string();

        let res = self.http.execute(req).await?;
        debug!(%method, path, status = res.status().as_u16(), "request");

        self.handle_response_error(res).await
    }

    async fn handle_response_error(&self, res: Response) -> Result<Response, ApiError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized();
        }

        let body = res.bytes().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    fn on_unauthorized(&self) {
        if self.session.expire() {
            warn!("session rejected by the backend, signing out");
            self.cache.clear();
        }
        self.navigator.force(Route::Login);
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let res = self.send(self.request(Method::GET, path)).await?;
        Ok(res.json::<T>().await?)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send(self.request(method, path).json(body)).await?;
        Ok(res.json::<T>().await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
