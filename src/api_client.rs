//! Authenticated request pipeline
//!
//! Every request goes through [`ApiClient::execute`]:
//! 1. attach the stored access token, refreshing it first when it is near expiry
//! 2. a 403 answer to an `OPTIONS` request is resent once with a permissive CORS header
//! 3. a 401 answer triggers one refresh and one resend; a second failure is returned as is

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, Attempt};
use crate::resources::{
    AdminUsers, Articles, Auth, Events, Iap, Places, Promos, Tours, Uploads, Users,
};
use crate::session::SessionManager;
use crate::token_store::TokenStore;
use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build an [`ClientError::Api`] from a failed response, keeping its body
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ClientError::Api { status, body }
}

/// API client with automatic token management
pub struct ApiClient {
    config: Arc<ClientConfig>,
    http_client: Client,
    session: SessionManager,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Base URL and timeouts
    /// * `store` - Where the credential pair lives
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Arc<Self>> {
        config.validate()?;

        let http_client = Client::builder()
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let config = Arc::new(config);
        let session = SessionManager::new(Arc::clone(&config), store, http_client.clone());

        info!(base_url = %config.base_url, "Created API client");

        Ok(Arc::new(Self {
            config,
            http_client,
            session,
        }))
    }

    /// Create a client using [`ClientConfig::from_env`]
    pub fn from_env(store: Arc<dyn TokenStore>) -> Result<Arc<Self>> {
        Self::new(ClientConfig::from_env(), store)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Whether a credential pair is currently stored
    pub fn is_logged_in(&self) -> bool {
        self.session.store().refresh_token().is_some()
    }

    /// Drop the stored credentials
    pub fn logout(&self) -> Result<()> {
        info!("Logging out, clearing credentials");
        self.session.store().clear()
    }

    /// Send a request through the pipeline and return the successful response
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let mut token = if request.authenticated {
            self.session.token_for_request().await?
        } else {
            None
        };
        let mut attempt = Attempt::First;

        loop {
            let response = self.send(request, token.as_deref(), false).await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if attempt == Attempt::First {
                if status == StatusCode::FORBIDDEN && request.method == Method::OPTIONS {
                    warn!(path = %request.path, "Preflight rejected, resending with permissive CORS header");
                    let response = self.send(request, token.as_deref(), true).await?;
                    if response.status().is_success() {
                        return Ok(response);
                    }
                    return Err(api_error(response).await);
                }

                if status == StatusCode::UNAUTHORIZED && request.authenticated {
                    info!(path = %request.path, "Request unauthorized, refreshing token and retrying once");
                    attempt = Attempt::Retried;
                    token = Some(self.session.refresh_replacing(token).await?);
                    continue;
                }
            }

            debug!(path = %request.path, status = %status, ?attempt, "Request failed");
            return Err(api_error(response).await);
        }
    }

    /// Send a request and decode the JSON response body
    pub async fn execute_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose response body is not needed
    pub async fn execute_empty(&self, request: &ApiRequest) -> Result<()> {
        self.execute(request).await.map(drop)
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>, relaxed_cors: bool) -> Result<Response> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), self.config.url(&request.path))
            .timeout(self.config.request_timeout);

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if relaxed_cors {
            builder = builder.header(ACCESS_CONTROL_ALLOW_ORIGIN, "*");
        }

        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = request.apply_body(builder)?.send().await?;
        Ok(response)
    }
}

/// Resource facades
impl ApiClient {
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn admin_users(&self) -> AdminUsers<'_> {
        AdminUsers::new(self)
    }

    pub fn places(&self) -> Places<'_> {
        Places::new(self)
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn articles(&self) -> Articles<'_> {
        Articles::new(self)
    }

    pub fn tours(&self) -> Tours<'_> {
        Tours::new(self)
    }

    pub fn uploads(&self) -> Uploads<'_> {
        Uploads::new(self)
    }

    pub fn iap(&self) -> Iap<'_> {
        Iap::new(self)
    }

    pub fn promos(&self) -> Promos<'_> {
        Promos::new(self)
    }
}
