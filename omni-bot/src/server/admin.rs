//! Admin panel under `/admin`. When an admin token is configured every route requires it,
//! as `Authorization: Bearer <token>` or `?token=<token>`.

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use minijinja::context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use super::{ApiError, AppState};
use crate::monitoring::{alerts_for, Alert, SystemStatus};
use crate::updates::{UpdateCheck, UpdateOutcome};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/plugins", get(plugins_page))
        .route("/plugins/:name/toggle", post(toggle_plugin))
        .route("/plugins/:name/reload", post(reload_plugin))
        .route("/updates", get(updates_page))
        .route("/updates/check", post(check_updates))
        .route("/updates/apply", post(apply_update))
        .route("/updates/rollback/:id", post(rollback_update))
        .route("/config", get(config_page))
        .route("/config/update", post(update_config))
        .route("/api/metrics", get(api_metrics))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

impl TokenQuery {
    /// `?token=…` to append to links and form actions, or empty.
    fn suffix(&self) -> String {
        self.token
            .as_deref()
            .map(|t| {
                let encoded: String = url::form_urlencoded::byte_serialize(t.as_bytes()).collect();
                format!("?token={}", encoded)
            })
            .unwrap_or_default()
    }
}

async fn require_admin(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let Some(ref expected) = state.admin_token else {
        return next.run(request).await;
    };
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let authorized = bearer == Some(expected.as_str())
        || query.token.as_deref() == Some(expected.as_str());
    if !authorized {
        warn!(path = %request.uri().path(), "Rejected admin request");
        return ApiError::unauthorized().into_response();
    }
    next.run(request).await
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    let repo = state.db.plugins();
    let plugin_count = repo.count().await?;
    let enabled_plugins = repo.count_enabled().await?;
    let recent_updates = state.db.update_history().recent(5).await?;
    let recent_metrics = state.db.metrics().recent(50).await?;
    let version = state.updates.current_version().await;

    state.templates.render(
        "admin/dashboard.html",
        context! {
            plugin_count => plugin_count,
            enabled_plugins => enabled_plugins,
            loaded_plugins => state.plugins.get_active_plugins().await.len(),
            recent_updates => recent_updates,
            recent_metrics => recent_metrics,
            version => version,
            token => query.suffix(),
        },
    )
}

async fn plugins_page(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    let plugins = state.plugins.list_plugins().await?;
    let commands = state.plugins.get_plugin_commands().await;
    state.templates.render(
        "admin/plugins.html",
        context! { plugins => plugins, commands => commands, token => query.suffix() },
    )
}

async fn toggle_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let enabled = state.plugins.toggle_plugin(&name).await?;
    let action = if enabled { "enabled" } else { "disabled" };
    info!(plugin = %name, action, "Plugin toggled from admin panel");
    Ok(Json(json!({ "status": "success", "action": action })))
}

async fn reload_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    state.plugins.reload_plugin(&name).await?;
    Ok(Json(json!({ "status": "success" })))
}

async fn updates_page(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    let history = state.updates.get_update_history(20).await?;
    let backups = {
        let manager = state.updates.backups().clone();
        tokio::task::spawn_blocking(move || manager.list_backups())
            .await
            .map_err(|e| ApiError::internal("Backup listing failed", e))??
    };
    let version = state.updates.current_version().await;
    state.templates.render(
        "admin/updates.html",
        context! {
            history => history,
            backups => backups,
            version => version,
            token => query.suffix(),
        },
    )
}

async fn check_updates(State(state): State<AppState>) -> Result<Json<UpdateCheck>, ApiError> {
    Ok(Json(state.updates.check_for_updates().await?))
}

/// The attempt runs in its own task so a dropped request cannot interrupt backup or restore.
async fn apply_update(State(state): State<AppState>) -> Result<Json<UpdateOutcome>, ApiError> {
    let updates = state.updates.clone();
    let outcome = tokio::spawn(async move { updates.perform_update().await })
        .await
        .map_err(|e| ApiError::internal("Update task failed", e))??;
    Ok(Json(outcome))
}

async fn rollback_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, ApiError> {
    let updates = state.updates.clone();
    tokio::spawn(async move { updates.rollback_update(id).await })
        .await
        .map_err(|e| ApiError::internal("Rollback task failed", e))??;
    Ok(Json(json!({ "status": "success" })))
}

async fn config_page(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, ApiError> {
    let entries = state.config.list().await?;
    state.templates.render(
        "admin/config.html",
        context! { entries => entries, token => query.suffix() },
    )
}

#[derive(Debug, Deserialize)]
pub struct ConfigForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Upserts one entry and redirects back to the config page.
async fn update_config(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Form(form): Form<ConfigForm>,
) -> Result<Response, ApiError> {
    state.config.set(&form.key, &form.value).await?;
    Ok(Redirect::to(&format!("/admin/config{}", query.suffix())).into_response())
}

#[derive(Serialize)]
struct MetricsResponse {
    #[serde(flatten)]
    status: SystemStatus,
    alerts: Vec<Alert>,
}

async fn api_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let status = state.health.get_system_status().await;
    let alerts = alerts_for(&status);
    Json(MetricsResponse { status, alerts })
}
