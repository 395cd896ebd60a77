//! paystack-checkout HTTP Server
//!
//! Axum-based server rendering the payment form and forwarding submissions
//! to Paystack: one-time payments redirect to the hosted checkout page,
//! recurring payments create a plan and open the inline checkout widget.

mod config;
mod error;
mod handlers;
mod outcome;
mod pages;
mod state;

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::PaystackClient;

use crate::config::AppConfig;
use crate::handlers::{create_payment, health_check, not_found, payment_page};
use crate::pages::Pages;
use crate::state::{AppState, CheckoutSettings};

/// Build the application router
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // Payment form
        .route("/", get(payment_page).post(create_payment))

        // Health
        .route("/health", get(health_check))

        // Static assets
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))

        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    if config.public_key.is_none() {
        tracing::warn!("⚠ Paystack public key not configured - inline checkout disabled");
        tracing::warn!("  Set PAYSTACK_PUBLIC_KEY in .env or Paystack:PublicKey in appsettings.json");
    }

    // One pooled HTTP client for all gateway calls
    let http = reqwest::Client::builder()
        .user_agent(concat!("paystack-checkout/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let paystack = PaystackClient::with_http_client(http, config.paystack())?;
    tracing::info!(
        base_url = %paystack.config().base_url,
        currency = %paystack.config().currency,
        "✓ Paystack configured"
    );

    let state = AppState::new(
        Arc::new(paystack),
        Pages::new()?,
        CheckoutSettings {
            public_key: config.public_key.clone(),
            currency: config.currency.clone(),
        },
    );

    let app = router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 paystack-checkout running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /        - Payment form");
    tracing::info!("  POST /        - Create payment");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("  GET  /static  - Static assets ({})", config.static_dir.display());
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
