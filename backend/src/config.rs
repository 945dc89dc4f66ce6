//! Configuration management for the forage maize prediction server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FORAGE_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{CategorySet, ElevationTable, FeatureSchema};
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Reference dataset location
    pub data: DataConfig,

    /// Predictor artifact locations
    pub models: ModelsConfig,

    /// Closed category sets of the feature schema
    pub schema: SchemaConfig,

    /// Site elevations. A list rather than a table: the config crate
    /// lowercases table keys, and site names are case-sensitive.
    #[serde(default)]
    pub elevations: Vec<SiteElevation>,

    /// Per-session state
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// CSV export of the historical site-year spreadsheet
    pub reference_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    pub dry_matter_path: String,
    pub energy_path: String,
    pub protein_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchemaConfig {
    /// Site labels in the order the predictors were trained with
    pub site_categories: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteElevation {
    pub site: String,
    pub metres: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Idle sessions older than this are purged
    pub ttl_seconds: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FORAGE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8501)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data.reference_path", "data/reference.csv")?
            .set_default("models.dry_matter_path", "models/dm_model.json")?
            .set_default("models.energy_path", "models/ufl_model.json")?
            .set_default("models.protein_path", "models/cp_model.json")?
            .set_default("session.ttl_seconds", 3600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FORAGE_ prefix)
            .add_source(
                Environment::with_prefix("FORAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn feature_schema(&self) -> FeatureSchema {
        FeatureSchema::new(CategorySet::new(self.schema.site_categories.iter().cloned()))
    }

    pub fn elevation_table(&self) -> ElevationTable {
        ElevationTable::new(
            self.elevations
                .iter()
                .map(|e| (e.site.clone(), e.metres))
                .collect::<HashMap<_, _>>(),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            host: "0.0.0.0".to_string(),
        }
    }
}
