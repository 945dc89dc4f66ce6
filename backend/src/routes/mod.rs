//! Route definitions for the forage maize prediction server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/options", get(handlers::get_options))
        .route(
            "/sites/:site/scenarios/:scenario",
            get(handlers::get_scenario_features),
        )
        .route("/features", post(handlers::build_features))
        .route("/predict", post(handlers::predict))
        .nest("/sessions", session_routes())
}

/// Per-session prediction routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:session_id/predict", post(handlers::predict_in_session))
}
