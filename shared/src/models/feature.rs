//! Feature vector builder.
//!
//! The predictors are positional: they read the record as an ordered row and
//! the column names and order below are exactly the ones they were trained
//! on. Categorical columns are encoded against closed category sets fixed at
//! schema definition, never against the values present in a request.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ForageError, ForageResult};
use crate::models::request::Cultivar;
use crate::models::scenario::ScenarioFeatures;
use crate::types::CategorySet;
use crate::validation::validate_day_of_year;

pub const FEATURE_COUNT: usize = 14;

/// Canonical column names in predictor order
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Site",
    "Cultivar",
    "Elevation(m)",
    "Radiacion(Mj/m2day)",
    "Precipitation(mm)",
    "Tmax(ºC)",
    "Tmin(ºC)",
    "WHC(mm)",
    "C(%)",
    "ph",
    "SowingDate(doy)",
    "AnthesisDate(doy)",
    "HarvestDate(doy)",
    "GrowingSeason(day)",
];

/// Column names plus the closed category sets of the two categorical columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSchema {
    pub site_categories: CategorySet,
    pub cultivar_categories: CategorySet,
}

impl FeatureSchema {
    /// Schema with the given site categories and the fixed cultivar set
    pub fn new(site_categories: CategorySet) -> Self {
        Self {
            site_categories,
            cultivar_categories: CategorySet::new(Cultivar::ALL.iter().map(Cultivar::label)),
        }
    }
}

/// Static site elevation lookup. Unknown sites read as 0 m.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ElevationTable {
    metres: HashMap<String, f64>,
}

impl ElevationTable {
    pub fn new(metres: HashMap<String, f64>) -> Self {
        Self { metres }
    }

    pub fn get(&self, site: &str) -> Option<f64> {
        self.metres.get(site).copied()
    }

    pub fn elevation_or_zero(&self, site: &str) -> f64 {
        self.get(site).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.metres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metres.is_empty()
    }
}

/// One cell of the feature row
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FeatureValue {
    Category { label: String, code: u32 },
    Number(f64),
}

impl FeatureValue {
    /// Positional numeric value: categories read as their code
    pub fn as_f64(&self) -> f64 {
        match self {
            FeatureValue::Category { code, .. } => *code as f64,
            FeatureValue::Number(v) => *v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: &'static str,
    pub value: FeatureValue,
}

/// A single prediction row with the canonical 14 columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<FeatureColumn>,
}

impl FeatureRecord {
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.value.as_f64()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.value)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Category { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(column.name, &column.value)?;
        }
        map.end()
    }
}

/// Direct user inputs to the builder
#[derive(Debug, Clone, Copy)]
pub struct FeatureInput<'a> {
    pub site: &'a str,
    pub cultivar: &'a str,
    pub sowing_doy: i32,
    pub harvest_doy: i32,
}

/// Assemble the prediction row.
///
/// The growing season is `harvest - sowing` and may be negative. Unknown
/// sites get elevation 0 but must still belong to the site category set.
pub fn build_feature_record(
    schema: &FeatureSchema,
    elevations: &ElevationTable,
    input: &FeatureInput<'_>,
    weather: &ScenarioFeatures,
) -> ForageResult<FeatureRecord> {
    let site_code = schema
        .site_categories
        .encode(input.site)
        .ok_or_else(|| ForageError::InvalidCategory {
            field: "site",
            value: input.site.to_string(),
        })?;
    let cultivar_code = schema
        .cultivar_categories
        .encode(input.cultivar)
        .ok_or_else(|| ForageError::InvalidCategory {
            field: "cultivar",
            value: input.cultivar.to_string(),
        })?;
    validate_day_of_year("sowing", input.sowing_doy)?;
    validate_day_of_year("harvest", input.harvest_doy)?;

    let required = [
        ("radiation", weather.radiation),
        ("precipitation", weather.precipitation),
        ("tmax", weather.tmax),
        ("tmin", weather.tmin),
        ("water_holding_capacity", weather.water_holding_capacity),
        ("carbon", weather.carbon_percent),
        ("ph", weather.ph),
        ("anthesis_doy", weather.anthesis_doy),
    ];
    if let Some(&(field, _)) = required.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ForageError::UndefinedAggregate { field });
    }

    let growing_season_days = input.harvest_doy - input.sowing_doy;
    let values = [
        FeatureValue::Category {
            label: input.site.to_string(),
            code: site_code,
        },
        FeatureValue::Category {
            label: input.cultivar.to_string(),
            code: cultivar_code,
        },
        FeatureValue::Number(elevations.elevation_or_zero(input.site)),
        FeatureValue::Number(weather.radiation),
        FeatureValue::Number(weather.precipitation),
        FeatureValue::Number(weather.tmax),
        FeatureValue::Number(weather.tmin),
        FeatureValue::Number(weather.water_holding_capacity),
        FeatureValue::Number(weather.carbon_percent),
        FeatureValue::Number(weather.ph),
        FeatureValue::Number(input.sowing_doy as f64),
        FeatureValue::Number(weather.anthesis_doy),
        FeatureValue::Number(input.harvest_doy as f64),
        FeatureValue::Number(growing_season_days as f64),
    ];

    let columns = FEATURE_COLUMNS
        .iter()
        .zip(values)
        .map(|(&name, value)| FeatureColumn { name, value })
        .collect();
    Ok(FeatureRecord { columns })
}
