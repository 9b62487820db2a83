//! # HTTP server
//!
//! One axum router for the Telegram and Stripe webhooks, the sales pages, the admin panel
//! and the content API. Handlers get everything through [`AppState`].

mod admin;
mod api;
mod error;
mod pages;
mod templates;
mod webhooks;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use storage::Database;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use templates::Templates;
pub use webhooks::TELEGRAM_SECRET_HEADER;

use crate::chain::HandlerChain;
use crate::config::ConfigStore;
use crate::content::ContentEngine;
use crate::monitoring::HealthMonitor;
use crate::payments::StripeClient;
use crate::plugins::PluginManager;
use crate::updates::UpdateManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ConfigStore,
    pub plugins: Arc<PluginManager>,
    pub updates: Arc<UpdateManager>,
    pub health: Arc<HealthMonitor>,
    pub content: Arc<ContentEngine>,
    pub templates: Arc<Templates>,
    /// `None` when no bot token is configured; the Telegram webhook then answers 503.
    pub chain: Option<HandlerChain>,
    pub stripe: Option<StripeClient>,
    pub stripe_webhook_secret: Option<String>,
    pub telegram_webhook_secret: Option<String>,
    /// `None` leaves `/admin` open.
    pub admin_token: Option<String>,
    /// Absolute URL the server is reachable at, for Stripe redirect URLs.
    pub public_base_url: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/telegram-webhook", post(webhooks::telegram_webhook))
        .route("/stripe-webhook", post(webhooks::stripe_webhook))
        .route("/empire", get(pages::empire))
        .route("/pricing", get(pages::pricing))
        .route("/checkout/:product", get(pages::checkout))
        .route("/checkout/:product/session", post(pages::create_checkout_session))
        .route("/payment-dashboard", get(pages::payment_dashboard))
        .route("/payment-success", get(pages::payment_success))
        .route("/payment-analytics", get(pages::payment_analytics))
        .nest("/admin", admin::router(state.clone()))
        .route("/api/content-suggestions", post(api::content_suggestions))
        .route("/api/optimize-content", post(api::optimize_content))
        .route("/api/content-performance/:id", get(api::content_performance))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serves until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}
