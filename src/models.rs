//! Resource DTOs exchanged with the admin API
//!
//! These are plain records passed through verbatim; the client does not validate them.
//! Content and stop `position` values are expected to run 1, 2, 3... in list order.

use crate::request::{MultipartForm, UploadFile};
use serde::{Deserialize, Serialize};

// Authentication request bodies

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleLoginRequest {
    pub identity_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub id_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// The signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidTour {
    pub id: String,
    pub title: String,
}

/// Account as seen by the admin user list, with the tours it can access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub paid_tours: Vec<PaidTour>,
}

impl UserInfo {
    pub fn tour_ids(&self) -> impl Iterator<Item = &str> {
        self.paid_tours.iter().map(|t| t.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub title: String,
    /// `HISTORICAL` or any other category the backend knows
    #[serde(rename = "type")]
    pub place_type: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_link: Option<String>,
}

/// Multipart payload for creating or updating a place
#[derive(Debug, Clone, Default)]
pub struct PlaceForm {
    pub title: String,
    pub place_type: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub link: Option<String>,
    pub price: Option<f64>,
    pub phone: Option<String>,
    pub google_maps_link: Option<String>,
    /// Images already hosted, kept on update
    pub images: Vec<String>,
    pub image_files: Vec<UploadFile>,
}

impl PlaceForm {
    pub fn into_multipart(self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("title", &self.title)
            .text("type", &self.place_type)
            .text("description", &self.description)
            .text("address", &self.address)
            .text("latitude", self.latitude)
            .text("longitude", self.longitude)
            .text_opt("link", self.link.as_deref())
            .text_opt("price", self.price)
            .text_opt("phone", self.phone.as_deref())
            .text_opt("googleMapsLink", self.google_maps_link.as_deref());

        self.images
            .iter()
            .fold(form, |form, url| form.text("images", url))
            .files("imageFiles", self.image_files)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub time_published: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Multipart payload for creating or updating an event
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO-8601 date-time
    pub event_time: String,
    pub link: Option<String>,
    pub price: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub image_files: Vec<UploadFile>,
}

impl EventForm {
    pub fn into_multipart(self) -> MultipartForm {
        MultipartForm::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("latitude", self.latitude)
            .text("longitude", self.longitude)
            .text("eventTime", &self.event_time)
            .text_opt("link", self.link.as_deref())
            .text_opt("price", self.price.as_deref())
            .text("address", &self.address)
            .text_opt("phone", self.phone.as_deref())
            .files("imageFiles", self.image_files)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    Text,
    Image,
    Audio,
}

/// One block of an article or tour stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleContent {
    pub content_type: ContentType,
    pub title: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub article_type: String,
    pub main_image: String,
    pub date_published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ArticleContent>>,
}

/// Article body for create/update; the server assigns id and publish date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    pub article_type: String,
    pub main_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ArticleContent>>,
}

impl From<Article> for ArticleInput {
    fn from(article: Article) -> Self {
        Self {
            title: article.title,
            article_type: article.article_type,
            main_image: article.main_image,
            contents: article.contents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourStop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub latitude: f64,
    pub longitude: f64,
    pub position: u32,
    pub address: String,
    #[serde(default)]
    pub contents: Vec<ArticleContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub cover_image: String,
    pub date_published: String,
    pub latitude: f64,
    pub longitude: f64,
    pub starting_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_purchased: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<TourStop>>,
}

/// Tour body for create/update; the server assigns id and publish date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourInput {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub cover_image: String,
    pub latitude: f64,
    pub longitude: f64,
    pub starting_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<TourStop>>,
}

impl From<Tour> for TourInput {
    fn from(tour: Tour) -> Self {
        Self {
            title: tour.title,
            description: tour.description,
            duration: tour.duration,
            cover_image: tour.cover_image,
            latitude: tour.latitude,
            longitude: tour.longitude,
            starting_address: tour.starting_address,
            product_id: tour.product_id,
            stops: tour.stops,
        }
    }
}

/// Result of an upload. Single uploads fill `url`, batches fill `urls`; audio may return
/// storage `keys` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

impl UploadResponse {
    /// Every location returned, in the order the server listed them
    pub fn locations(&self) -> Vec<&str> {
        if let Some(url) = &self.url {
            return vec![url.as_str()];
        }
        self.urls
            .iter()
            .chain(self.keys.iter())
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IapVerification {
    pub transaction_id: String,
    pub purchase_token: String,
    pub product_id: String,
    /// `GOOGLE_PLAY` or another store name
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: String,
    pub code: String,
    pub max_activations: u32,
    #[serde(default)]
    pub current_activations: u32,
    /// ISO-8601 date-time
    pub expiry_date: String,
    pub active: bool,
    pub tour_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromoCode {
    pub code: String,
    pub max_activations: u32,
    pub expiry_date: String,
    pub active: bool,
    pub tour_id: String,
}

/// Partial promo code update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_activations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_id: Option<String>,
}

impl PromoCodeUpdate {
    /// Update that only flips the code off. There is no delete endpoint.
    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPromoCode {
    pub promo_code_id: String,
    pub emails: Vec<String>,
}
