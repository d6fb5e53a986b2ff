use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{User, UserInfo};
use crate::request::ApiRequest;

/// `/users/me`
pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The account the stored credentials belong to
    pub async fn get_me(&self) -> Result<User> {
        self.client.execute_json(&ApiRequest::get("/users/me")).await
    }
}

/// `/admin/users/*`: account list and tour access management
pub struct AdminUsers<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminUsers<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<UserInfo>> {
        self.client.execute_json(&ApiRequest::get("/admin/users")).await
    }

    pub async fn grant_tour_access(&self, user_id: i64, tour_id: &str) -> Result<()> {
        let request = ApiRequest::post(format!("/admin/users/{user_id}/tours/{tour_id}"));
        self.client.execute_empty(&request).await
    }

    pub async fn revoke_tour_access(&self, user_id: i64, tour_id: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("/admin/users/{user_id}/tours/{tour_id}"));
        self.client.execute_empty(&request).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/admin/users/{user_id}"));
        self.client.execute_empty(&request).await
    }
}
