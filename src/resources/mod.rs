//! Typed facades over the admin API endpoints
//!
//! Each facade borrows the [`ApiClient`](crate::ApiClient) and maps one method to one
//! endpoint. All authentication, refresh and retry behaviour comes from the client.

mod articles;
mod auth;
mod events;
mod iap;
mod places;
mod promos;
mod tours;
mod uploads;
mod users;

pub use articles::Articles;
pub use auth::Auth;
pub use events::Events;
pub use iap::Iap;
pub use places::Places;
pub use promos::Promos;
pub use tours::Tours;
pub use uploads::{UploadKind, Uploads};
pub use users::{AdminUsers, Users};
