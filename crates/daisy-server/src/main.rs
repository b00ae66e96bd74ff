//! Daisy integration server
//!
//! Axum-based server exposing the Daisy SDK to a browser front-end: plan
//! listing, subscription lookup, agreement submission and one-time-payment
//! invoices. Credentials never leave this process.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daisy_payments::{PaymentsClient, SubscriptionClient};
use daisy_runtime::{Credentials, DaisyConfig};

use crate::handlers::{
    create_invoice, get_manager, get_receipts, get_subscription, health_check, list_plans,
    list_subscriptions, submit_subscription,
};
use crate::state::AppState;

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

    let config = DaisyConfig::from_env();
    let subscriptions = Arc::new(SubscriptionClient::connect(Credentials::from_env()?, &config)?);

    // Verify the manager is reachable with these credentials
    match subscriptions.fetch_manager().await {
        Ok(manager) => {
            tracing::info!("✓ Connected to Daisy manager {}", manager.name);
            for plan in &manager.plans {
                tracing::info!(
                    "  Plan: {} ({:?}, on-chain: {})",
                    plan.name,
                    plan.state,
                    plan.on_chain_id.as_deref().unwrap_or("-")
                );
            }
        }
        Err(e) => {
            tracing::warn!("⚠ Daisy manager not reachable: {}", e);
            tracing::warn!("  Check DAISY_ID, DAISY_SECRET_KEY and DAISY_API_URL");
        }
    }

    // One-time payments use their own credential pair
    let payments = match Credentials::from_env_vars("DAISY_PAYMENTS_ID", "DAISY_PAYMENTS_SECRET_KEY") {
        Ok(credentials) => {
            tracing::info!("✓ Payments configured");
            Some(Arc::new(PaymentsClient::connect(credentials, &config)?))
        }
        Err(_) => {
            tracing::warn!("⚠ Payments not configured - invoices disabled");
            tracing::warn!("  Set DAISY_PAYMENTS_ID and DAISY_PAYMENTS_SECRET_KEY in .env");
            None
        }
    };

    let app = build_router(AppState {
        subscriptions,
        payments,
    });

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("daisy-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                     - Health check");
    tracing::info!("  GET  /api/manager                - Subscription manager");
    tracing::info!("  GET  /api/plans                  - Plans");
    tracing::info!("  GET  /api/subscriptions          - List subscriptions (?account=)");
    tracing::info!("  POST /api/subscriptions          - Submit signed agreement");
    tracing::info!("  GET  /api/subscription           - Lookup (?id= | ?subscriptionHash=)");
    tracing::info!("  GET  /api/subscription/receipts  - Receipts");
    tracing::info!("  POST /api/invoices               - Create one-time-payment invoice");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes, CORS and tracing layers over the shared state
pub(crate) fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/manager", get(get_manager))
        .route("/api/plans", get(list_plans))
        .route(
            "/api/subscriptions",
            get(list_subscriptions).post(submit_subscription),
        )
        .route("/api/subscription", get(get_subscription))
        .route("/api/subscription/receipts", get(get_receipts))
        .route("/api/invoices", post(create_invoice))
        // Static files (browser front-end)
        .fallback_service(ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
