use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::{NewPromoCode, PromoCode, PromoCodeUpdate, SendPromoCode};
use crate::request::ApiRequest;

/// `/promo/*`: promo codes for tours. Codes are deactivated, never deleted.
pub struct Promos<'a> {
    client: &'a ApiClient,
}

impl<'a> Promos<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> Result<Vec<PromoCode>> {
        self.client.execute_json(&ApiRequest::get("/promo")).await
    }

    pub async fn create(&self, data: &NewPromoCode) -> Result<PromoCode> {
        let request = ApiRequest::post("/promo/create").json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn update(&self, id: &str, data: &PromoCodeUpdate) -> Result<PromoCode> {
        let request = ApiRequest::put(format!("/promo/{id}")).json(data)?;
        self.client.execute_json(&request).await
    }

    pub async fn deactivate(&self, id: &str) -> Result<PromoCode> {
        self.update(id, &PromoCodeUpdate::deactivate()).await
    }

    /// Email the code to every address in `data.emails`
    pub async fn send_emails(&self, data: &SendPromoCode) -> Result<()> {
        let request = ApiRequest::post("/promo/send").json(data)?;
        self.client.execute_empty(&request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{NewPromoCode, SendPromoCode};
    use crate::resources::test_support::logged_in_client;
    use httpmock::prelude::*;
    use serde_json::json;

    fn promo_json(active: bool) -> serde_json::Value {
        json!({
            "id": "promo-1",
            "code": "SPRING24",
            "maxActivations": 10,
            "currentActivations": 2,
            "expiryDate": "2024-06-01T00:00:00Z",
            "active": active,
            "tourId": "t1"
        })
    }

    #[tokio::test]
    async fn test_promo_lifecycle() {
        let server = MockServer::start_async().await;
        let (client, _store, _bearer) = logged_in_client(&server);

        let list = server.mock(|when, then| {
            when.method(GET).path("/promo");
            then.status(200).json_body(json!([promo_json(true)]));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/promo/create").json_body(json!({
                "code": "SPRING24",
                "maxActivations": 10,
                "expiryDate": "2024-06-01T00:00:00Z",
                "active": true,
                "tourId": "t1"
            }));
            then.status(201).json_body(promo_json(true));
        });
        let deactivate = server.mock(|when, then| {
            when.method(PUT)
                .path("/promo/promo-1")
                .json_body(json!({ "active": false }));
            then.status(200).json_body(promo_json(false));
        });
        let send = server.mock(|when, then| {
            when.method(POST).path("/promo/send").json_body(json!({
                "promoCodeId": "promo-1",
                "emails": ["a@example.com", "b@example.com"]
            }));
            then.status(200);
        });

        let promos = client.promos();
        let all = promos.get_all().await.unwrap();
        assert_eq!(all[0].current_activations, 2);

        let created = promos
            .create(&NewPromoCode {
                code: "SPRING24".into(),
                max_activations: 10,
                expiry_date: "2024-06-01T00:00:00Z".into(),
                active: true,
                tour_id: "t1".into(),
            })
            .await
            .unwrap();
        assert!(created.active);

        let updated = promos.deactivate("promo-1").await.unwrap();
        assert!(!updated.active);

        promos
            .send_emails(&SendPromoCode {
                promo_code_id: "promo-1".into(),
                emails: vec!["a@example.com".into(), "b@example.com".into()],
            })
            .await
            .unwrap();

        list.assert();
        create.assert();
        deactivate.assert();
        send.assert();
    }
}
