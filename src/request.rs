//! Replayable request descriptions
//!
//! A request may be sent up to twice (401 retry, CORS fallback), and a multipart body is
//! consumed once it is handed to reqwest. Requests are therefore kept as plain data and
//! turned into a fresh `reqwest::RequestBuilder` for every attempt.

use crate::error::{ClientError, Result};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

/// File content attached to a multipart request
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`. Left to the server to sniff when `None`.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, keeping its file name
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ClientError::Storage(format!("failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

#[derive(Debug, Clone)]
enum FormField {
    Text { name: String, value: String },
    File { name: String, file: UploadFile },
}

/// Ordered multipart form fields
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// Add a text field only when `value` is present
    pub fn text_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadFile) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file,
        });
        self
    }

    /// Add every file under the same field name
    pub fn files(self, name: &str, files: impl IntoIterator<Item = UploadFile>) -> Self {
        files
            .into_iter()
            .fold(self, |form, file| form.file(name, file))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for field in &self.fields {
            form = match field {
                FormField::Text { name, value } => form.text(name.clone(), value.clone()),
                FormField::File { name, file } => {
                    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
                    if let Some(mime) = &file.mime {
                        part = part.mime_str(mime)?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Request body variants
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A request against the admin API, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Whether the bearer token and the refresh/retry logic apply
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Send without credentials, for endpoints that issue them
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Attach the body to a builder. Called once per attempt.
    pub(crate) fn apply_body(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        })
    }
}

/// Position of a send in the retry sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    /// Already refreshed and resent once after a 401
    Retried,
}
