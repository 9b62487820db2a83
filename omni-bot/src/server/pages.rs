//! Public pages: banner, health, sales funnel and payment pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use minijinja::context;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::payments::{find_product, PaymentError, PRODUCTS};

pub async fn index() -> &'static str {
    "🧠 OMNICore_Bot: LIVE - Self-Evolving System Active"
}

/// 200 when every check passes, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let status = state.health.get_system_status().await;
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}

#[derive(Serialize)]
struct EmpireStats {
    total_revenue: f64,
    payments: i64,
    active_customers: i64,
}

pub async fn empire(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let metrics = state.db.metrics();
    let epoch = DateTime::<Utc>::default();
    let stats = EmpireStats {
        total_revenue: metrics.sum_since("payments.revenue_usd", epoch).await?,
        payments: metrics.count_since("payments.completed", epoch).await?,
        active_customers: state.db.user_states().count().await?,
    };
    state
        .templates
        .render("empire.html", context! { stats => stats, products => PRODUCTS })
}

pub async fn pricing(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state
        .templates
        .render("pricing.html", context! { products => PRODUCTS })
}

/// Unknown products go back to the landing page.
pub async fn checkout(
    State(state): State<AppState>,
    Path(product): Path<String>,
) -> Result<Response, ApiError> {
    let Some(product) = find_product(&product) else {
        return Ok(Redirect::to("/empire").into_response());
    };
    let html = state.templates.render(
        "checkout.html",
        context! { product => product, stripe_enabled => state.stripe.is_some() },
    )?;
    Ok(html.into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: Option<String>,
    pub session_id: String,
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Path(product): Path<String>,
    body: Option<Json<CheckoutRequest>>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let product = find_product(&product).ok_or(PaymentError::UnknownProduct(product))?;
    let stripe = state.stripe.as_ref().ok_or(PaymentError::NotConfigured)?;
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let session = stripe
        .create_checkout_session(product, request.email.as_deref(), &state.public_base_url)
        .await?;
    Ok(Json(CheckoutResponse {
        checkout_url: session.url,
        session_id: session.id,
    }))
}

#[derive(Serialize)]
struct RevenueSummary {
    revenue_24h: f64,
    revenue_30d: f64,
    payments_30d: i64,
}

pub async fn payment_dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let metrics = state.db.metrics();
    let now = Utc::now();
    let summary = RevenueSummary {
        revenue_24h: metrics
            .sum_since("payments.revenue_usd", now - Duration::hours(24))
            .await?,
        revenue_30d: metrics
            .sum_since("payments.revenue_usd", now - Duration::days(30))
            .await?,
        payments_30d: metrics
            .count_since("payments.completed", now - Duration::days(30))
            .await?,
    };
    state.templates.render(
        "payment_dashboard.html",
        context! {
            summary => summary,
            products => PRODUCTS,
            stripe_enabled => state.stripe.is_some(),
        },
    )
}

#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Result<Html<String>, ApiError> {
    let access_code = query.session_id.as_deref().map(|id| {
        let short: String = id.chars().take(8).collect();
        format!("PAID_{}", short.to_uppercase())
    });
    state.templates.render(
        "payment_success.html",
        context! { session_id => query.session_id, access_code => access_code },
    )
}

#[derive(Debug, Serialize)]
pub struct PaymentAnalytics {
    pub total_revenue: f64,
    pub payment_count: i64,
    pub average_payment: f64,
}

pub async fn payment_analytics(
    State(state): State<AppState>,
) -> Result<Json<PaymentAnalytics>, ApiError> {
    let metrics = state.db.metrics();
    let epoch = DateTime::<Utc>::default();
    let total_revenue = metrics.sum_since("payments.revenue_usd", epoch).await?;
    let payment_count = metrics.count_since("payments.completed", epoch).await?;
    let average_payment = if payment_count > 0 {
        total_revenue / payment_count as f64
    } else {
        0.0
    };
    let round = |v: f64| (v * 100.0).round() / 100.0;
    Ok(Json(PaymentAnalytics {
        total_revenue: round(total_revenue),
        payment_count,
        average_payment: round(average_payment),
    }))
}
