//! Prediction service: scenario resolution, feature assembly and the three
//! predictor calls for a single request

use serde::Serialize;
use shared::{
    build_feature_record, resolve, round_prediction, Cultivar, ElevationTable, FeatureInput,
    FeatureRecord, FeatureSchema, FormOption, HarvestDate, ParsedRequest, PredictionRequest,
    PredictionResult, ReferenceData, ScenarioFeatures, SowingDate, WeatherScenario, YieldTarget,
};
use std::sync::Arc;
use validator::Validate;

use crate::error::AppResult;
use crate::external::predictor::{PredictorError, PredictorSet};

/// Read-only pipeline shared by every session
#[derive(Clone)]
pub struct PredictionService {
    reference: Arc<ReferenceData>,
    schema: Arc<FeatureSchema>,
    elevations: Arc<ElevationTable>,
    predictors: PredictorSet,
}

/// Features and predictions produced for one request
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub features: FeatureRecord,
    pub result: PredictionResult,
}

/// Choices offered by the input form
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub sites: Vec<String>,
    pub cultivars: Vec<FormOption>,
    pub sowing_dates: Vec<FormOption>,
    pub harvest_dates: Vec<FormOption>,
    pub scenarios: Vec<FormOption>,
}

impl PredictionService {
    pub fn new(
        reference: Arc<ReferenceData>,
        schema: Arc<FeatureSchema>,
        elevations: Arc<ElevationTable>,
        predictors: PredictorSet,
    ) -> Self {
        Self {
            reference,
            schema,
            elevations,
            predictors,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Form choices. Sites come from the reference dataset.
    pub fn options(&self) -> FormOptions {
        let plain = |label: &str| FormOption {
            label: label.to_string(),
            day_of_year: None,
        };
        FormOptions {
            sites: self.reference.sites(),
            cultivars: Cultivar::ALL.iter().map(|c| plain(c.label())).collect(),
            sowing_dates: SowingDate::ALL
                .iter()
                .map(|d| FormOption {
                    label: d.label().to_string(),
                    day_of_year: Some(d.day_of_year()),
                })
                .collect(),
            harvest_dates: HarvestDate::ALL
                .iter()
                .map(|d| FormOption {
                    label: d.label().to_string(),
                    day_of_year: Some(d.day_of_year()),
                })
                .collect(),
            scenarios: WeatherScenario::ALL.iter().map(|s| plain(s.label())).collect(),
        }
    }

    /// Weather and soil features for a site under a scenario
    pub fn resolve(&self, site: &str, scenario: WeatherScenario) -> AppResult<ScenarioFeatures> {
        Ok(resolve(&self.reference, site, scenario)?)
    }

    /// Build the feature row without running the predictors
    pub fn features(&self, request: &PredictionRequest) -> AppResult<FeatureRecord> {
        request.validate()?;
        let parsed = request.parse()?;
        self.assemble(&parsed)
    }

    fn assemble(&self, request: &ParsedRequest) -> AppResult<FeatureRecord> {
        let weather = resolve(&self.reference, &request.site, request.scenario)?;
        if self.elevations.get(&request.site).is_none() {
            tracing::debug!("No elevation for site {}, using 0 m", request.site);
        }
        let input = FeatureInput {
            site: &request.site,
            cultivar: request.cultivar.label(),
            sowing_doy: request.sowing.day_of_year(),
            harvest_doy: request.harvest.day_of_year(),
        };
        if shared::is_inverted_season(input.sowing_doy, input.harvest_doy) {
            tracing::warn!(
                "Harvest day {} precedes sowing day {}; growing season will be negative",
                input.harvest_doy,
                input.sowing_doy
            );
        }
        let record = build_feature_record(&self.schema, &self.elevations, &input, &weather)?;
        tracing::debug!(
            site = %request.site,
            scenario = %request.scenario,
            cultivar = %request.cultivar,
            "Assembled feature record"
        );
        Ok(record)
    }

    /// Run the full pipeline for one request
    pub fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionOutcome> {
        let features = self.features(request)?;
        let result = self.run_predictors(&features)?;
        Ok(PredictionOutcome { features, result })
    }

    /// Call the three predictors on the same record, rounding each output to
    /// two decimals
    pub fn run_predictors(&self, features: &FeatureRecord) -> AppResult<PredictionResult> {
        let mut rounded = Vec::with_capacity(YieldTarget::ALL.len());
        for target in YieldTarget::ALL {
            let raw = self.predictors.get(target).predict(features)?;
            let value = round_prediction(raw).ok_or(PredictorError::NonFinite)?;
            tracing::debug!("{} prediction: {} {}", target, value, target.unit());
            rounded.push(value);
        }
        Ok(PredictionResult {
            dry_matter_kg_ha: rounded[0],
            energy_ufl_ha: rounded[1],
            crude_protein_kg_ha: rounded[2],
        })
    }
}
