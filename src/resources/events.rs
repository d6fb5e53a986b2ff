use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{Event, EventForm};
use crate::request::ApiRequest;

/// `/events` CRUD, multipart on create and update
pub struct Events<'a> {
    client: &'a ApiClient,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<Event>> {
        self.client.execute_json(&ApiRequest::get("/events")).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Event> {
        self.client.execute_json(&ApiRequest::get(format!("/events/{id}"))).await
    }

    pub async fn create(&self, form: EventForm) -> Result<Event> {
        let request = ApiRequest::post("/events").multipart(form.into_multipart());
        self.client.execute_json(&request).await
    }

    pub async fn update(&self, id: &str, form: EventForm) -> Result<Event> {
        let request = ApiRequest::put(format!("/events/{id}")).multipart(form.into_multipart());
        self.client.execute_json(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.execute_empty(&ApiRequest::delete(format!("/events/{id}"))).await
    }
}
