use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{Article, ArticleInput};
use crate::request::ApiRequest;

/// `/articles` CRUD with JSON bodies
pub struct Articles<'a> {
    client: &'a ApiClient,
}

impl<'a> Articles<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<Article>> {
        self.client.execute_json(&ApiRequest::get("/articles")).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Article> {
        self.client.execute_json(&ApiRequest::get(format!("/articles/{id}"))).await
    }

    pub async fn create(&self, data: &ArticleInput) -> Result<Article> {
        let request = ApiRequest::post("/articles").json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn update(&self, id: &str, data: &ArticleInput) -> Result<Article> {
        let request = ApiRequest::put(format!("/articles/{id}")).json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.execute_empty(&ApiRequest::delete(format!("/articles/{id}"))).await
    }
}
