//! Error types shared across the session core.
//!
//! ERROR HANDLING
//! ==============
//! API failures keep the server-provided `{message}` when one was returned so
//! callers can surface it verbatim; everything else collapses into a caller
//! supplied fallback via [`ApiError::user_message`].

// =============================================================================
// API
// =============================================================================

/// Errors produced by calls against the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16, message: Option<String> },

    /// A success response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// An authenticated call was attempted without a session token.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Request input was rejected before anything was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Server-provided message, if the API returned one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message: Some(message), .. } => Some(message),
            _ => None,
        }
    }

    /// Message suitable for display: the server's own text or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidInput(reason) => reason.clone(),
            _ => self.server_message().unwrap_or(fallback).to_owned(),
        }
    }

    /// HTTP status code when the API responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Errors produced by persistent token storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// CONFIG
// =============================================================================

/// Errors produced while resolving client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL is not an `http://` or `https://` URL.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// No explicit store path was given and `HOME` is not set.
    #[error("cannot resolve default store path: HOME not set")]
    MissingHome,
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
