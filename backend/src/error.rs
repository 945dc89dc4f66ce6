//! Error handling for the forage maize prediction server
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ForageError;
use thiserror::Error;
use uuid::Uuid;

use crate::external::predictor::PredictorError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    // Feature pipeline errors
    #[error(transparent)]
    Forage(#[from] ForageError),

    // Predictor errors
    #[error(transparent)]
    Predictor(#[from] PredictorError),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Status code and body for this error
    pub fn detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: format!("Datos no válidos: {}", msg),
                    field: None,
                },
            ),
            AppError::Forage(ForageError::SiteNotFound(site)) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "SITE_NOT_FOUND".to_string(),
                    message_en: format!("No historical data for site {}", site),
                    message_es: format!("No hay datos históricos para la localidad {}", site),
                    field: Some("site".to_string()),
                },
            ),
            AppError::Forage(ForageError::InvalidCategory { field, value }) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_CATEGORY".to_string(),
                    message_en: format!("Unknown {} '{}'", field, value),
                    message_es: format!("Valor desconocido para {}: '{}'", field, value),
                    field: Some(field.to_string()),
                },
            ),
            AppError::Forage(ForageError::InvalidDayOfYear { field, value }) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_DAY_OF_YEAR".to_string(),
                    message_en: format!("Day of year {} is outside 1-366", value),
                    message_es: format!("El día del año {} está fuera del rango 1-366", value),
                    field: Some(field.to_string()),
                },
            ),
            AppError::Forage(ForageError::UndefinedAggregate { field }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "UNDEFINED_AGGREGATE".to_string(),
                    message_en: format!("Historical {} data is missing for this site", field),
                    message_es: format!(
                        "Faltan datos históricos de {} para esta localidad",
                        field
                    ),
                    field: Some(field.to_string()),
                },
            ),
            AppError::Forage(ForageError::SchemaMismatch(msg))
            | AppError::Predictor(PredictorError::SchemaMismatch(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "SCHEMA_MISMATCH".to_string(),
                    message_en: format!("Prediction input does not match the model: {}", msg),
                    message_es: format!("Los datos de entrada no coinciden con el modelo: {}", msg),
                    field: None,
                },
            ),
            AppError::Predictor(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "PREDICTION_FAILED".to_string(),
                    message_en: format!("Prediction failed: {}", err),
                    message_es: format!("Error en la predicción: {}", err),
                    field: None,
                },
            ),
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "SESSION_NOT_FOUND".to_string(),
                    message_en: format!("Session {} not found", id),
                    message_es: format!("No se encontró la sesión {}", id),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.detail();

        // Request-level failures are expected; only server faults are errors
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
