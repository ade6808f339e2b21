//! HTTP client for the job-tracker API.
//!
//! DESIGN
//! ======
//! There is no client-wide default `Authorization` header. Every request is
//! built through [`HttpApi::request`], which takes the bearer token for that
//! one call. Callers read the token from the session right before building,
//! so a request issued after logout never carries a stale credential while
//! requests already on the wire are left alone.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] carrying the server's
//! `{message}` when present. Body decode problems on success responses become
//! [`ApiError::Decode`].

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest, User};
use crate::error::ApiError;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const CURRENT_USER_PATH: &str = "/api/auth/user";

// =============================================================================
// AUTH SEAM
// =============================================================================

/// Credential endpoints consumed by the session manager.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account and receive a token for it. `token` is the credential
    /// already held, if any; it is sent like on every other call.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-success status.
    async fn register(&self, request: &RegisterRequest, token: Option<&str>) -> Result<AuthResponse, ApiError>;

    /// Exchange credentials for a token. `token` is the credential already held, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-success status.
    async fn login(&self, request: &LoginRequest, token: Option<&str>) -> Result<AuthResponse, ApiError>;

    /// Resolve the identity behind `token`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the token is rejected or the API is unreachable.
    async fn fetch_user(&self, token: &str) -> Result<User, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client rooted at `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to initialize.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Start a request, attaching `Authorization: Bearer <token>` when a token is given.
    #[must_use]
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or decode failure.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = Self::send_checked(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and ignore any success body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        Self::send_checked(request).await.map(|_| ())
    }

    async fn send_checked(request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = ErrorBody::message_from(&text);
            tracing::debug!(status = status.as_u16(), has_message = message.is_some(), "API returned error status");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, request: &RegisterRequest, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, REGISTER_PATH, token).json(request);
        self.send_json(builder).await
    }

    async fn login(&self, request: &LoginRequest, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, LOGIN_PATH, token).json(request);
        self.send_json(builder).await
    }

    async fn fetch_user(&self, token: &str) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, CURRENT_USER_PATH, Some(token));
        self.send_json(builder).await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
