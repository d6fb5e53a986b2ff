use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::IapVerification;
use crate::request::ApiRequest;

/// In-app purchase verification
pub struct Iap<'a> {
    client: &'a ApiClient,
}

impl<'a> Iap<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Submit a store receipt. The response shape is store-specific and returned raw.
    pub async fn verify(&self, data: &IapVerification) -> Result<serde_json::Value> {
        let request = ApiRequest::post("/iap/verify").json(data)?;
        let response = self.client.execute(&request).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
