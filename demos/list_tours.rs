//! List tours and promo codes with stored admin credentials
//!
//! Usage:
//!   ADMIN_EMAIL=... ADMIN_PASSWORD=... cargo run --example list_tours
//!
//! Credentials are cached in `CREDENTIALS_FILE` (default `./credentials.json`), so later
//! runs skip the login.

use std::sync::Arc;
use tour_admin_client::models::LoginRequest;
use tour_admin_client::{ApiClient, FileTokenStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials_path = std::env::var("CREDENTIALS_FILE")
        .unwrap_or_else(|_| "credentials.json".to_string());

    let store = Arc::new(FileTokenStore::open(&credentials_path)?);
    let client = ApiClient::from_env(store)?;
    println!("API: {}", client.config().base_url);

    if !client.is_logged_in() {
        let email = std::env::var("ADMIN_EMAIL")?;
        let password = std::env::var("ADMIN_PASSWORD")?;
        client.auth().login(&LoginRequest { email, password }).await?;
        println!("✓ Logged in, credentials saved to {credentials_path}");
    }

    let me = match client.users().get_me().await {
        Ok(me) => me,
        Err(e) if e.is_session_expired() => {
            println!("! Session expired, log in again");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Signed in as {} <{}>", me.full_name, me.email);
    println!();

    let tours = client.tours().get_all().await?;
    println!("Tours ({}):", tours.len());
    for tour in &tours {
        println!("  - [{}] {} ({})", tour.id, tour.title, tour.duration);
    }
    println!();

    let promos = client.promos().get_all().await?;
    println!("Promo codes ({}):", promos.len());
    for promo in &promos {
        println!(
            "  - {} {}/{} active={} expires {}",
            promo.code, promo.current_activations, promo.max_activations, promo.active, promo.expiry_date
        );
    }

    Ok(())
}
