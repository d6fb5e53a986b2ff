use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{Tour, TourInput};
use crate::request::ApiRequest;

/// `/tours` CRUD with JSON bodies. Stops and their contents travel nested in the tour.
pub struct Tours<'a> {
    client: &'a ApiClient,
}

impl<'a> Tours<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<Tour>> {
        self.client.execute_json(&ApiRequest::get("/tours")).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Tour> {
        self.client.execute_json(&ApiRequest::get(format!("/tours/{id}"))).await
    }

    pub async fn create(&self, data: &TourInput) -> Result<Tour> {
        let request = ApiRequest::post("/tours").json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn update(&self, id: &str, data: &TourInput) -> Result<Tour> {
        let request = ApiRequest::put(format!("/tours/{id}")).json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.execute_empty(&ApiRequest::delete(format!("/tours/{id}"))).await
    }
}
