//! HTTP handlers for feature derivation and prediction endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{FeatureRecord, PredictionRequest, ScenarioFeatures, WeatherScenario};

use crate::error::AppResult;
use crate::services::prediction::{FormOptions, PredictionOutcome};
use crate::AppState;

/// Choices for the input form
pub async fn get_options(State(state): State<AppState>) -> Json<FormOptions> {
    Json(state.prediction.options())
}

/// Weather and soil features for a site under a scenario
pub async fn get_scenario_features(
    State(state): State<AppState>,
    Path((site, scenario)): Path<(String, String)>,
) -> AppResult<Json<ScenarioFeatures>> {
    let scenario: WeatherScenario = scenario.parse()?;
    let features = state.prediction.resolve(&site, scenario)?;
    Ok(Json(features))
}

/// Preview the feature row that would be sent to the predictors
pub async fn build_features(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<FeatureRecord>> {
    let record = state.prediction.features(&request)?;
    Ok(Json(record))
}

/// Stateless prediction
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<PredictionOutcome>> {
    let outcome = state.prediction.predict(&request)?;
    Ok(Json(outcome))
}
