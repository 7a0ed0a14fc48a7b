//! Operator routes: content reload and prompt templates.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use parlo_content::ReloadReport;
use std::sync::Arc;

use crate::auth::ContentToken;
use crate::error::{AppError, Result};
use crate::handlers;
use crate::AppState;

/// Create admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/content/reload", post(reload))
        .route("/admin/prompts/{id}", get(get_prompt))
}

/// POST /admin/content/reload - Rebuild the library from disk.
async fn reload(
    State(state): State<AppState>,
    _token: ContentToken,
) -> Result<Json<ReloadReport>> {
    let report = handlers::handle_reload(Arc::clone(&state.coordinator)).await?;
    Ok(Json(report))
}

/// GET /admin/prompts/{id} - Serve a cached prompt template.
async fn get_prompt(
    State(state): State<AppState>,
    _token: ContentToken,
    Path(id): Path<String>,
) -> Result<String> {
    state
        .prompts
        .get(&id)
        .map(|text| text.as_str().to_owned())
        .ok_or_else(|| AppError::NotFound(format!("prompt {id}")))
}
