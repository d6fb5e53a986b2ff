//! Session management: access token lookup and refresh

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::token::is_near_expiry;
use crate::token_store::TokenStore;
use crate::types::{AuthTokens, RefreshRequest};
use async_singleflight::Group;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Refresh endpoint, relative to the base URL
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// There is one credential pair, so every refresh shares one flight.
const REFRESH_FLIGHT_KEY: &str = "refresh";

/// Refresh outcome shared between callers of one flight.
/// Singleflight hands the same error to every waiter, so it has to be `Clone`.
#[derive(Debug, Clone)]
enum RefreshFailure {
    NoRefreshToken,
    SessionExpired(String),
}

impl From<RefreshFailure> for ClientError {
    fn from(failure: RefreshFailure) -> Self {
        match failure {
            RefreshFailure::NoRefreshToken => ClientError::NoRefreshToken,
            RefreshFailure::SessionExpired(msg) => ClientError::SessionExpired(msg),
        }
    }
}

/// Owns the credential store and the refresh procedure
pub struct SessionManager {
    config: Arc<ClientConfig>,
    store: Arc<dyn TokenStore>,
    http_client: Client,
    /// Singleflight group so concurrent callers share a single refresh call.
    /// Refresh tokens rotate, so a second parallel refresh would present a superseded token.
    refresh_singleflight: Group<String, RefreshFailure>,
}

impl SessionManager {
    pub(crate) fn new(config: Arc<ClientConfig>, store: Arc<dyn TokenStore>, http_client: Client) -> Self {
        Self {
            config,
            store,
            http_client,
            refresh_singleflight: Group::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Access token to attach to an outgoing request
    ///
    /// - No stored token: `None`, the request goes out unauthenticated
    /// - Token near expiry: refreshes first and returns the new token
    /// - Otherwise: the stored token as is
    pub async fn token_for_request(&self) -> Result<Option<String>> {
        let Some(token) = self.store.access_token() else {
            return Ok(None);
        };

        if !is_near_expiry(&token, self.config.refresh_threshold) {
            return Ok(Some(token));
        }

        debug!("Access token near expiry, refreshing before send");
        self.refresh_replacing(Some(token)).await.map(Some)
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// Always goes to the network unless another refresh is already in flight, in which
    /// case its result is shared. On failure both tokens are cleared and
    /// [`ClientError::SessionExpired`] is returned.
    pub async fn refresh(&self) -> Result<String> {
        self.refresh_singleflight_with(None).await
    }

    /// Refresh because `stale` was found expiring or was rejected with 401.
    ///
    /// If the stored token already differs from `stale` and is still fresh, someone else
    /// refreshed in the meantime and that token is returned without a network call.
    pub async fn refresh_replacing(&self, stale: Option<String>) -> Result<String> {
        self.refresh_singleflight_with(stale).await
    }

    async fn refresh_singleflight_with(&self, stale: Option<String>) -> Result<String> {
        let (success_opt, error_opt, shared) = self
            .refresh_singleflight
            .work(REFRESH_FLIGHT_KEY, async {
                if let Some(stale) = &stale {
                    if let Some(current) = self.store.access_token() {
                        if &current != stale && !is_near_expiry(&current, self.config.refresh_threshold) {
                            debug!("Token was refreshed by another request, reusing it");
                            return Ok(current);
                        }
                    }
                }

                self.do_refresh().await.map(|tokens| tokens.access_token)
            })
            .await;

        if shared {
            debug!("Joined in-flight token refresh");
        }

        match (success_opt, error_opt) {
            (Some(token), None) => Ok(token),
            (None, Some(failure)) => Err(failure.into()),
            _ => {
                warn!("Token refresh finished without a result, clearing credentials");
                self.clear_credentials();
                Err(ClientError::SessionExpired(
                    "Unknown error during token refresh".to_string(),
                ))
            }
        }
    }

    /// Perform the refresh call and update the store
    ///
    /// Exactly one outcome: both tokens replaced, or both tokens cleared.
    async fn do_refresh(&self) -> std::result::Result<AuthTokens, RefreshFailure> {
        let Some(refresh_token) = self.store.refresh_token() else {
            warn!("Token refresh requested without a stored refresh token");
            return Err(RefreshFailure::NoRefreshToken);
        };

        info!("Refreshing access token");

        match self.request_new_tokens(&refresh_token).await {
            Ok(tokens) => {
                if let Err(e) = self.store.store_tokens(&tokens) {
                    // The old refresh token is already rotated out server-side
                    let err_msg = format!("failed to persist refreshed tokens: {e}");
                    warn!(error = %err_msg, "Clearing credentials");
                    self.clear_credentials();
                    return Err(RefreshFailure::SessionExpired(err_msg));
                }
                info!("Access token refreshed successfully");
                Ok(tokens)
            }
            Err(e) => {
                let err_msg = e.to_string();
                warn!(error = %err_msg, "Token refresh failed, clearing credentials");
                self.clear_credentials();
                Err(RefreshFailure::SessionExpired(err_msg))
            }
        }
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credentials");
        }
    }

    /// Unauthenticated POST to the refresh endpoint, bounded by the refresh timeout
    async fn request_new_tokens(&self, refresh_token: &str) -> Result<AuthTokens> {
        let response = self
            .http_client
            .post(self.config.url(REFRESH_PATH))
            .timeout(self.config.refresh_timeout)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tests::token_expiring_in;
    use crate::token_store::MemoryTokenStore;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn session_with(server: &MockServer, store: &MemoryTokenStore) -> SessionManager {
        let config = ClientConfig::new(server.base_url()).with_refresh_timeout(Duration::from_millis(500));
        SessionManager::new(Arc::new(config), Arc::new(store.clone()), Client::new())
    }

    fn stored(access: &str, refresh: &str) -> MemoryTokenStore {
        MemoryTokenStore::with_tokens(&AuthTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        })
    }

    #[tokio::test]
    async fn test_refresh_rotates_both_tokens() {
        let server = MockServer::start_async().await;
        let new_access = token_expiring_in(3600);
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(REFRESH_PATH)
                .json_body(json!({ "refreshToken": "refresh-1" }));
            then.status(200)
                .json_body(json!({ "accessToken": new_access, "refreshToken": "refresh-2" }));
        });

        let store = stored("old-access", "refresh-1");
        let session = session_with(&server, &store);

        let token = session.refresh().await.unwrap();
        assert_eq!(token, new_access);
        assert_eq!(store.access_token().as_deref(), Some(new_access.as_str()));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_makes_no_call() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200);
        });

        let store = MemoryTokenStore::new();
        store.set(crate::types::ACCESS_TOKEN_KEY, "access").unwrap();
        let session = session_with(&server, &store);

        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, ClientError::NoRefreshToken));
        // Nothing is cleared when there was nothing to refresh with
        assert_eq!(store.access_token().as_deref(), Some("access"));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_credentials() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(401).body("refresh token revoked");
        });

        let store = stored("old-access", "refresh-1");
        let session = session_with(&server, &store);

        let err = session.refresh().await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(err.to_string().contains("refresh token revoked"));
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        mock.assert();
    }

    /// Store whose writes of the refresh token fail, leaving a half-written pair
    struct RefreshWriteFails(MemoryTokenStore);

    impl TokenStore for RefreshWriteFails {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == crate::types::REFRESH_TOKEN_KEY {
                return Err(ClientError::Storage("disk full".to_string()));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[tokio::test]
    async fn test_failed_persist_clears_credentials() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200)
                .json_body(json!({ "accessToken": token_expiring_in(3600), "refreshToken": "refresh-2" }));
        });

        let inner = stored("old-access", "refresh-1");
        let config = ClientConfig::new(server.base_url());
        let session = SessionManager::new(
            Arc::new(config),
            Arc::new(RefreshWriteFails(inner.clone())),
            Client::new(),
        );

        let err = session.refresh().await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(err.to_string().contains("disk full"));
        // No new access token paired with the rotated-out refresh token
        assert!(inner.access_token().is_none());
        assert!(inner.refresh_token().is_none());
        mock.assert();
    }

    #[tokio::test]
    async fn test_refresh_timeout_counts_as_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({ "accessToken": "a", "refreshToken": "r" }));
        });

        let store = stored("old-access", "refresh-1");
        let session = session_with(&server, &store);

        let err = session.refresh().await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(store.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_malformed_refresh_response_clears_credentials() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200).body("<html>maintenance</html>");
        });

        let store = stored("old-access", "refresh-1");
        let session = session_with(&server, &store);

        assert!(session.refresh().await.unwrap_err().is_session_expired());
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_token_for_request_paths() {
        let server = MockServer::start_async().await;
        let fresh = token_expiring_in(3600);
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200)
                .json_body(json!({ "accessToken": fresh, "refreshToken": "refresh-2" }));
        });

        // No token at all
        let empty = MemoryTokenStore::new();
        assert_eq!(session_with(&server, &empty).token_for_request().await.unwrap(), None);

        // Fresh token is used as is
        let store = stored(&fresh, "refresh-1");
        let session = session_with(&server, &store);
        assert_eq!(session.token_for_request().await.unwrap().as_deref(), Some(fresh.as_str()));
        mock.assert_hits(0);

        // Near-expiry token triggers one refresh
        let store = stored(&token_expiring_in(30), "refresh-1");
        let session = session_with(&server, &store);
        assert_eq!(session.token_for_request().await.unwrap().as_deref(), Some(fresh.as_str()));
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_call() {
        let server = MockServer::start_async().await;
        let fresh = token_expiring_in(3600);
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(json!({ "accessToken": fresh, "refreshToken": "refresh-2" }));
        });

        let store = stored(&token_expiring_in(30), "refresh-1");
        let session = session_with(&server, &store);

        let (a, b, c) = tokio::join!(
            session.token_for_request(),
            session.token_for_request(),
            session.token_for_request()
        );
        assert_eq!(a.unwrap().as_deref(), Some(fresh.as_str()));
        assert_eq!(b.unwrap().as_deref(), Some(fresh.as_str()));
        assert_eq!(c.unwrap().as_deref(), Some(fresh.as_str()));
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_late_caller_reuses_completed_refresh() {
        let server = MockServer::start_async().await;
        let fresh = token_expiring_in(3600);
        let mock = server.mock(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200)
                .json_body(json!({ "accessToken": fresh, "refreshToken": "refresh-2" }));
        });

        let stale = token_expiring_in(30);
        let store = stored(&stale, "refresh-1");
        let session = session_with(&server, &store);

        session.refresh_replacing(Some(stale.clone())).await.unwrap();
        // A second caller that saw the same stale token does not refresh again
        let token = session.refresh_replacing(Some(stale)).await.unwrap();
        assert_eq!(token, fresh);
        mock.assert_hits(1);
    }
}
