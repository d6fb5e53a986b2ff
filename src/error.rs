//! Error types for the admin API client

use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh token was rejected or the refresh call failed.
    /// Stored credentials have been cleared; the caller should send the user to login.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status of an API error, if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::HttpRequest(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
