use crate::api_client::ApiClient;
use crate::error::Result;
use crate::models::UploadResponse;
use crate::request::{ApiRequest, MultipartForm, UploadFile};
use tracing::debug;

/// Upload destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// One standalone image, sent as a single `file` part
    Image,
    EventImages,
    ArticleImages,
    PlaceImages,
    TourImages,
    TourAudio,
}

impl UploadKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::Image => "/uploads/images",
            Self::EventImages => "/uploads/event-images",
            Self::ArticleImages => "/uploads/article-images",
            Self::PlaceImages => "/uploads/place-images",
            Self::TourImages => "/uploads/tour-images",
            Self::TourAudio => "/uploads/tour-audio",
        }
    }

    /// Multipart field carrying the file content
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Image => "file",
            _ => "files",
        }
    }
}

/// `/uploads/*`: media uploads returning hosted URLs
pub struct Uploads<'a> {
    client: &'a ApiClient,
}

impl<'a> Uploads<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn image(&self, file: UploadFile) -> Result<UploadResponse> {
        self.upload(UploadKind::Image, vec![file]).await
    }

    pub async fn event_images(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
        self.upload(UploadKind::EventImages, files).await
    }

    pub async fn article_images(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
        self.upload(UploadKind::ArticleImages, files).await
    }

    pub async fn place_images(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
        self.upload(UploadKind::PlaceImages, files).await
    }

    pub async fn tour_images(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
        self.upload(UploadKind::TourImages, files).await
    }

    pub async fn tour_audio(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
        self.upload(UploadKind::TourAudio, files).await
    }

    /// Upload `files` to `kind`. Every file becomes one part under the kind's field name.
    pub async fn upload(&self, kind: UploadKind, files: Vec<UploadFile>) -> Result<UploadResponse> {
        debug!(path = kind.path(), count = files.len(), "Uploading files");
        let form = MultipartForm::new().files(kind.field_name(), files);
        let request = ApiRequest::post(kind.path()).multipart(form);
        self.client.execute_json(&request).await
    }
}
