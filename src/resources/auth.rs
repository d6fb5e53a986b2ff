use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{
    AppleLoginRequest, ChangePasswordRequest, DeleteAccountRequest, GoogleLoginRequest,
    LoginRequest, RegisterRequest,
};
use crate::request::ApiRequest;
use crate::types::AuthTokens;
use tracing::info;

/// `/auth/*` endpoints
///
/// Every call that returns a credential pair stores it, so later requests are authenticated.
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/register").json(data)?.anonymous();
        self.sign_in(&request).await
    }

    pub async fn login(&self, data: &LoginRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/login").json(data)?.anonymous();
        self.sign_in(&request).await
    }

    /// Sign in with an Apple identity token
    pub async fn apple(&self, data: &AppleLoginRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/apple").json(data)?.anonymous();
        self.sign_in(&request).await
    }

    /// Sign in with a Google ID token
    pub async fn google(&self, data: &GoogleLoginRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/google").json(data)?.anonymous();
        self.sign_in(&request).await
    }

    /// Rotate the stored credential pair now, returning the new access token.
    /// Shares the in-flight refresh if one is running.
    pub async fn refresh_token(&self) -> Result<String> {
        self.client.session().refresh().await
    }

    /// Change the password. The server answers with a new credential pair.
    pub async fn change_password(&self, data: &ChangePasswordRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/change-password").json(data)?;
        self.sign_in(&request).await
    }

    /// Delete the signed-in account and drop local credentials
    pub async fn delete_account(&self, data: &DeleteAccountRequest) -> Result<()> {
        let request = ApiRequest::delete("/auth/user").json(data)?;
        self.client.execute_empty(&request).await?;
        info!("Account deleted");
        self.client.logout()
    }

    async fn sign_in(&self, request: &ApiRequest) -> Result<AuthTokens> {
        let tokens: AuthTokens = self.client.execute_json(request).await?;
        self.client.session().store().store_tokens(&tokens)?;
        info!(path = %request.path, "Stored new credentials");
        Ok(tokens)
    }
}
