//! HTTP route definitions.

mod admin;
mod cloud;
mod health;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(cloud::routes())
        .merge(admin::routes())
}
