//! Content API.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::content::{ContentSuggestion, OptimizationReport, PerformanceReport, SuggestionRequest};

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub suggestions: Vec<ContentSuggestion>,
}

pub async fn content_suggestions(
    State(state): State<AppState>,
    body: Option<Json<SuggestionRequest>>,
) -> Json<SuggestionsResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    Json(SuggestionsResponse {
        success: true,
        suggestions: state.content.suggestions(&request),
    })
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_goal")]
    pub goal: String,
}

fn default_content_type() -> String {
    "social_media".to_string()
}

fn default_goal() -> String {
    "engagement".to_string()
}

pub async fn optimize_content(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationReport>, ApiError> {
    let report = state
        .content
        .optimize(&request.content, &request.content_type, &request.goal)?;
    Ok(Json(report))
}

pub async fn content_performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<PerformanceReport> {
    Json(state.content.performance(&id))
}
