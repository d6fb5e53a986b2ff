//! Type definitions for authentication

use serde::{Deserialize, Serialize};

/// Storage key holding the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key holding the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Authentication tokens (access + refresh)
///
/// Returned by login, register, social login, password change and refresh.
/// The refresh token rotates on every refresh call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims read from the access token payload.
///
/// Only `exp` matters to the client; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds). May be fractional.
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// Expiration time in milliseconds since the epoch
    pub fn expires_at_ms(&self) -> Option<i64> {
        // `as` saturates on overflow
        self.exp.filter(|exp| exp.is_finite()).map(|exp| (exp * 1000.0) as i64)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
