//! HTTP handlers for per-session prediction state

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::PredictionRequest;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::session::SessionState;
use crate::AppState;

/// Open a new session
pub async fn create_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<SessionState>)> {
    let session = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Get the last prediction, features and error of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionState>> {
    let session = state.sessions.get(session_id)?;
    Ok(Json(session))
}

/// Close a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Predict within a session. A failure is stored on the session and
/// returned; the previously shown prediction is left in place.
pub async fn predict_in_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<SessionState>> {
    // Unknown sessions fail before any work is done
    state.sessions.get(session_id)?;

    match state.prediction.predict(&request) {
        Ok(outcome) => {
            let session = state.sessions.record_success(session_id, &outcome)?;
            Ok(Json(session))
        }
        Err(err) => {
            state.sessions.record_failure(session_id, err.to_string())?;
            Err(err)
        }
    }
}
