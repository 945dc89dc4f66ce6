//! Fixtures shared by the backend integration tests

#![allow(dead_code)]

use forage_server::config::{
    Config, DataConfig, ModelsConfig, SchemaConfig, ServerConfig, SessionConfig, SiteElevation,
};
use forage_server::external::predictor::{
    Predictor, PredictorError, PredictorSet, TreeEnsembleModel, TreeNode,
};
use forage_server::services::{PredictionService, SessionStore};
use forage_server::AppState;
use shared::{
    CategorySet, Cultivar, ElevationTable, FeatureRecord, FeatureSchema, HistoricalRecord,
    PredictionRequest, ReferenceData, YieldTarget, FEATURE_COLUMNS,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const SITES: [&str; 3] = ["Barcia", "Mabegondo", "Pontevedra"];

pub fn record(
    site: &str,
    tmin: f64,
    tmax: f64,
    precipitation: f64,
    radiation: f64,
) -> HistoricalRecord {
    HistoricalRecord {
        site: site.to_string(),
        cultivar: None,
        tmin_celsius: tmin,
        tmax_celsius: tmax,
        precipitation_mm: precipitation,
        radiation_mj_m2_day: radiation,
        water_holding_capacity_mm: 150.0,
        carbon_percent: 3.0,
        ph: 5.6,
        anthesis_doy: 205.0,
    }
}

pub fn reference() -> ReferenceData {
    ReferenceData::new(vec![
        record("Barcia", 10.0, 20.0, 1.0, 12.0),
        record("Barcia", 12.0, 23.0, 3.0, 15.0),
        record("Barcia", 14.0, 26.0, 5.0, 18.0),
        record("Mabegondo", 11.0, 22.0, 2.0, 16.0),
        // In the dataset but not in the schema
        record("Lugo", 9.0, 21.0, 2.0, 14.0),
    ])
}

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(CategorySet::new(SITES))
}

pub fn elevations() -> ElevationTable {
    ElevationTable::new(HashMap::from([("Barcia".to_string(), 70.0)]))
}

/// Tree model whose output depends on the growing season and the cultivar
pub fn tree_model(target: YieldTarget, base_score: f64) -> TreeEnsembleModel {
    TreeEnsembleModel {
        target,
        feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        site_categories: CategorySet::new(SITES),
        cultivar_categories: CategorySet::new(Cultivar::ALL.iter().map(Cultivar::label)),
        base_score,
        trees: vec![
            TreeNode::NumericSplit {
                feature: 13,
                threshold: 110.0,
                left: Box::new(TreeNode::Leaf { value: -1000.0 }),
                right: Box::new(TreeNode::Leaf { value: 500.0 }),
            },
            TreeNode::CategoricalSplit {
                feature: 1,
                categories: vec![0],
                left: Box::new(TreeNode::Leaf { value: 123.456 }),
                right: Box::new(TreeNode::Leaf { value: 0.0 }),
            },
        ],
    }
}

/// Predictor that rejects every record
pub struct RejectingPredictor(pub YieldTarget);

impl Predictor for RejectingPredictor {
    fn target(&self) -> YieldTarget {
        self.0
    }

    fn predict(&self, _record: &FeatureRecord) -> Result<f64, PredictorError> {
        Err(PredictorError::SchemaMismatch("rejected by test predictor".to_string()))
    }
}

pub fn tree_predictors() -> PredictorSet {
    PredictorSet::new(
        Arc::new(tree_model(YieldTarget::DryMatter, 17000.0)),
        Arc::new(tree_model(YieldTarget::Energy, 15000.0)),
        Arc::new(tree_model(YieldTarget::CrudeProtein, 1200.0)),
    )
}

pub fn service_with(predictors: PredictorSet) -> PredictionService {
    PredictionService::new(
        Arc::new(reference()),
        Arc::new(schema()),
        Arc::new(elevations()),
        predictors,
    )
}

pub fn config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        data: DataConfig {
            reference_path: format!("{}/data/reference.csv", env!("CARGO_MANIFEST_DIR")),
        },
        models: ModelsConfig {
            dry_matter_path: format!("{}/models/dm_model.json", env!("CARGO_MANIFEST_DIR")),
            energy_path: format!("{}/models/ufl_model.json", env!("CARGO_MANIFEST_DIR")),
            protein_path: format!("{}/models/cp_model.json", env!("CARGO_MANIFEST_DIR")),
        },
        schema: SchemaConfig {
            site_categories: vec![
                "Barcia".to_string(),
                "Mabegondo".to_string(),
                "Pontevedra".to_string(),
                "Xinzo".to_string(),
            ],
        },
        elevations: vec![SiteElevation {
            site: "Barcia".to_string(),
            metres: 70.0,
        }],
        session: SessionConfig { ttl_seconds: 3600 },
    }
}

pub fn state_with(predictors: PredictorSet) -> AppState {
    AppState {
        config: Arc::new(config()),
        prediction: service_with(predictors),
        sessions: SessionStore::new(3600),
    }
}

pub fn request(
    site: &str,
    cultivar: &str,
    sowing: &str,
    harvest: &str,
    scenario: &str,
) -> PredictionRequest {
    PredictionRequest {
        site: site.to_string(),
        cultivar: cultivar.to_string(),
        sowing: sowing.to_string(),
        harvest: harvest.to_string(),
        scenario: scenario.to_string(),
    }
}

pub fn barcia_request() -> PredictionRequest {
    request("Barcia", "A200", "Mid-May", "Early-Sept", "Average")
}
