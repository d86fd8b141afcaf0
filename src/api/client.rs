use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::images::asset_origin;
use crate::auth::SessionStore;
use crate::error::{ApiError, ApiResult};

/// Body of an outgoing request.
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

impl Payload {
    pub(crate) fn json<T: Serialize>(body: &T) -> ApiResult<Self> {
        Ok(Payload::Json(serde_json::to_value(body)?))
    }
}

/// HTTP client for the blog API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<Url>,
    asset_origin: Arc<str>,
    session: Arc<SessionStore>,
    logout_on_unauthorized: bool,
}

impl ApiClient {
    /// `base_url` includes the `/api` suffix, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> ApiResult<Self> {
        // Url::join replaces the last segment unless the base ends with '/'.
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base = Url::parse(&normalized)?;

        Ok(Self {
            http: Client::new(),
            base_url: Arc::new(base),
            asset_origin: Arc::from(asset_origin(base_url)),
            session,
            logout_on_unauthorized: true,
        })
    }

    pub fn with_logout_on_unauthorized(mut self, enabled: bool) -> Self {
        self.logout_on_unauthorized = enabled;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn asset_origin(&self) -> &str {
        &self.asset_origin
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request to `path` under the base URL.
    ///
    /// This is the only place credentials are attached: the session's bearer
    /// token when one is held, no `Authorization` header otherwise. Non-2xx
    /// responses come back as `ApiError` with the server's message.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> ApiResult<Response> {
        let url = self.endpoint(path)?;
        let token = self.session.token();

        let mut request = self.http.request(method.clone(), url);
        if let Some(ref token) = token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };

        tracing::debug!(%method, path, authenticated = token.is_some(), "Sending request");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        tracing::debug!(%method, path, status = status.as_u16(), "Request failed: {}", err);

        if err.is_unauthorized() && token.is_some() && self.logout_on_unauthorized {
            self.drop_rejected_session(token.as_deref());
        }

        Err(err)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> ApiResult<T> {
        let response = self.send(method, path, payload).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn send_empty(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> ApiResult<()> {
        self.send(method, path, payload).await?;
        Ok(())
    }

    /// Only clears the session if it still holds the token the server rejected.
    fn drop_rejected_session(&self, rejected: Option<&str>) {
        if self.session.token().as_deref() != rejected {
            return;
        }
        tracing::warn!("Server rejected the stored token, signing out");
        if let Err(e) = self.session.logout() {
            tracing::warn!("Failed to clear session storage: {}", e);
        }
    }
}
