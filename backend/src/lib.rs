//! Forage maize yield prediction server
//!
//! Predicts dry matter, energy (UFL) and crude protein yields of forage
//! maize in north-west Spain from a site, a cultivar, sowing and harvest
//! dates and a weather scenario.

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{load_reference_csv, PredictorSet};
use services::{PredictionService, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prediction: PredictionService,
    pub sessions: SessionStore,
}

impl AppState {
    /// Load the reference dataset and the three predictors. Any failure here
    /// is fatal: the server never starts with missing data or models.
    pub fn load(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Loading reference dataset from {}", config.data.reference_path);
        let reference = load_reference_csv(&config.data.reference_path)?;
        tracing::info!(
            "Reference dataset loaded: {} rows, {} sites",
            reference.len(),
            reference.sites().len()
        );

        let schema = config.feature_schema();
        if schema.site_categories.is_empty() {
            anyhow::bail!("schema.site_categories must list the sites the models were trained on");
        }
        for site in reference.sites() {
            if !schema.site_categories.contains(&site) {
                tracing::warn!("Site {} is in the dataset but not in the feature schema", site);
            }
        }

        let predictors = PredictorSet::load(&config.models).context("loading predictor artifacts")?;
        let elevations = config.elevation_table();
        tracing::info!("{} site elevations configured", elevations.len());

        let prediction = PredictionService::new(
            Arc::new(reference),
            Arc::new(schema),
            Arc::new(elevations),
            predictors,
        );
        let sessions = SessionStore::new(config.session.ttl_seconds);

        Ok(Self {
            config: Arc::new(config),
            prediction,
            sessions,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Forage Maize Prediction in NW of Spain API v1.0"
}
