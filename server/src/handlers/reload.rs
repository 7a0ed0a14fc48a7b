//! Operator reload handler.

use crate::error::{AppError, Result};
use parlo_content::{ReloadCoordinator, ReloadReport};
use std::sync::Arc;

/// Run one reload cycle off the async runtime.
///
/// The pipeline walks the filesystem synchronously, so it runs on the
/// blocking pool. A reload already in flight surfaces as a conflict; a bad
/// content root as service-unavailable (both via the error mapping).
pub async fn handle_reload(coordinator: Arc<ReloadCoordinator>) -> Result<ReloadReport> {
    let report = tokio::task::spawn_blocking(move || coordinator.reload())
        .await
        .map_err(|e| AppError::Internal(format!("reload task failed: {e}")))??;

    tracing::info!(
        books = report.books_loaded,
        courses = report.courses_loaded,
        decks = report.decks_loaded,
        errors = report.errors.len(),
        "operator reload complete"
    );
    Ok(report)
}
