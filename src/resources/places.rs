use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{Place, PlaceForm};
use crate::request::ApiRequest;

/// `/places` CRUD. Create and update are multipart so images can ride along.
pub struct Places<'a> {
    client: &'a ApiClient,
}

impl<'a> Places<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<Place>> {
        self.client.execute_json(&ApiRequest::get("/places")).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Place> {
        self.client.execute_json(&ApiRequest::get(format!("/places/{id}"))).await
    }

    pub async fn create(&self, form: PlaceForm) -> Result<Place> {
        let request = ApiRequest::post("/places").multipart(form.into_multipart());
        self.client.execute_json(&request).await
    }

    pub async fn update(&self, id: &str, form: PlaceForm) -> Result<Place> {
        let request = ApiRequest::put(format!("/places/{id}")).multipart(form.into_multipart());
        self.client.execute_json(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.execute_empty(&ApiRequest::delete(format!("/places/{id}"))).await
    }
}
