//! Tour admin API client
//!
//! A Rust client for the tourism content admin API (places, events, articles, tours,
//! uploads, promo codes, users), with bearer authentication, pre-emptive token refresh,
//! single-flight refresh coalescing and a one-shot retry on 401.

pub mod api_client;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod resources;
pub mod session;
pub mod token;
pub mod token_store;
pub mod types;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use request::{ApiRequest, MultipartForm, UploadFile};
pub use resources::UploadKind;
pub use session::SessionManager;
pub use token::{REFRESH_THRESHOLD, is_near_expiry};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::AuthTokens;
