//! Historical site-year observations used to derive weather and soil features

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One observed row of the reference dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    #[serde(rename = "Site")]
    pub site: String,
    #[serde(rename = "Cultivar", default)]
    pub cultivar: Option<String>,
    #[serde(rename = "Tmin(ºC)")]
    pub tmin_celsius: f64,
    #[serde(rename = "Tmax(ºC)")]
    pub tmax_celsius: f64,
    #[serde(rename = "Precipitation(mm)")]
    pub precipitation_mm: f64,
    #[serde(rename = "Radiation(Mj/m2day)")]
    pub radiation_mj_m2_day: f64,
    #[serde(rename = "WHC(mm)")]
    pub water_holding_capacity_mm: f64,
    #[serde(rename = "C(%)")]
    pub carbon_percent: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(rename = "AnthesisDate(doy)")]
    pub anthesis_doy: f64,
}

/// Read-only reference table, loaded once and shared for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    records: Vec<HistoricalRecord>,
}

impl ReferenceData {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Rows whose site matches exactly
    pub fn records_for_site<'a>(
        &'a self,
        site: &'a str,
    ) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records.iter().filter(move |r| r.site == site)
    }

    pub fn contains_site(&self, site: &str) -> bool {
        self.records.iter().any(|r| r.site == site)
    }

    /// Distinct site names in sorted order (the site selector's options)
    pub fn sites(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.site.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
