//! Scenario resolver: turns a site and a weather scenario into the weather
//! and soil features of the prediction row

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ForageError, ForageResult};
use crate::models::reference::{HistoricalRecord, ReferenceData};

/// Weather year assumed for the prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherScenario {
    #[serde(alias = "Good Year", alias = "good")]
    Good,
    #[serde(alias = "Average Year", alias = "average")]
    Average,
    #[serde(alias = "Bad Year", alias = "bad")]
    Bad,
}

impl WeatherScenario {
    pub const ALL: [WeatherScenario; 3] = [
        WeatherScenario::Good,
        WeatherScenario::Average,
        WeatherScenario::Bad,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherScenario::Good => "Good",
            WeatherScenario::Average => "Average",
            WeatherScenario::Bad => "Bad",
        }
    }

    /// Statistic picked for each weather variable.
    ///
    /// Precipitation takes the minimum in both the Good and the Bad year.
    pub fn policy(&self) -> SelectionPolicy {
        match self {
            WeatherScenario::Good => SelectionPolicy {
                radiation: Statistic::Max,
                precipitation: Statistic::Min,
                tmin: Statistic::Max,
                tmax: Statistic::Min,
            },
            WeatherScenario::Bad => SelectionPolicy {
                radiation: Statistic::Min,
                precipitation: Statistic::Min,
                tmin: Statistic::Min,
                tmax: Statistic::Max,
            },
            WeatherScenario::Average => SelectionPolicy {
                radiation: Statistic::Mean,
                precipitation: Statistic::Mean,
                tmin: Statistic::Mean,
                tmax: Statistic::Mean,
            },
        }
    }
}

impl std::fmt::Display for WeatherScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeatherScenario {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let word = lowered.strip_suffix(" year").unwrap_or(&lowered);
        match word {
            "good" => Ok(WeatherScenario::Good),
            "average" => Ok(WeatherScenario::Average),
            "bad" => Ok(WeatherScenario::Bad),
            _ => Err(ForageError::InvalidCategory {
                field: "scenario",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Min,
    Mean,
    Max,
}

/// Which statistic each weather variable takes under a scenario
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub radiation: Statistic,
    pub precipitation: Statistic,
    pub tmin: Statistic,
    pub tmax: Statistic,
}

/// Min, mean and max of one column over a site's rows
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Non-finite values are skipped; a column with no finite value left has
    /// no defined aggregate.
    pub fn over<I>(values: I, field: &'static str) -> ForageResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return Err(ForageError::UndefinedAggregate { field });
        }
        Ok(Self {
            min,
            mean: sum / count as f64,
            max,
        })
    }

    pub fn select(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Min => self.min,
            Statistic::Mean => self.mean,
            Statistic::Max => self.max,
        }
    }
}

/// All aggregates the resolver needs for one site
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SiteAggregates {
    pub tmin: ColumnStats,
    pub tmax: ColumnStats,
    pub precipitation: ColumnStats,
    pub radiation: ColumnStats,
    pub water_holding_capacity: ColumnStats,
    pub carbon: ColumnStats,
    pub ph: ColumnStats,
    pub anthesis_doy: ColumnStats,
}

impl SiteAggregates {
    pub fn from_records(records: &[&HistoricalRecord]) -> ForageResult<Self> {
        let column = |f: fn(&HistoricalRecord) -> f64, field| {
            ColumnStats::over(records.iter().map(|r| f(r)), field)
        };
        Ok(Self {
            tmin: column(|r| r.tmin_celsius, "tmin")?,
            tmax: column(|r| r.tmax_celsius, "tmax")?,
            precipitation: column(|r| r.precipitation_mm, "precipitation")?,
            radiation: column(|r| r.radiation_mj_m2_day, "radiation")?,
            water_holding_capacity: column(
                |r| r.water_holding_capacity_mm,
                "water_holding_capacity",
            )?,
            carbon: column(|r| r.carbon_percent, "carbon")?,
            ph: column(|r| r.ph, "ph")?,
            anthesis_doy: column(|r| r.anthesis_doy, "anthesis_doy")?,
        })
    }
}

/// Resolver output: scenario-selected weather plus unconditional soil and
/// phenology means
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioFeatures {
    pub radiation: f64,
    pub precipitation: f64,
    pub tmax: f64,
    pub tmin: f64,
    pub water_holding_capacity: f64,
    pub carbon_percent: f64,
    pub ph: f64,
    pub anthesis_doy: f64,
}

impl ScenarioFeatures {
    pub fn from_aggregates(aggregates: &SiteAggregates, scenario: WeatherScenario) -> Self {
        let policy = scenario.policy();
        Self {
            radiation: aggregates.radiation.select(policy.radiation),
            precipitation: aggregates.precipitation.select(policy.precipitation),
            tmax: aggregates.tmax.select(policy.tmax),
            tmin: aggregates.tmin.select(policy.tmin),
            water_holding_capacity: aggregates.water_holding_capacity.mean,
            carbon_percent: aggregates.carbon.mean,
            ph: aggregates.ph.mean,
            anthesis_doy: aggregates.anthesis_doy.mean,
        }
    }
}

/// Derive the features for `site` under `scenario`.
///
/// A site without rows is an error, never a zero-filled record.
pub fn resolve(
    data: &ReferenceData,
    site: &str,
    scenario: WeatherScenario,
) -> ForageResult<ScenarioFeatures> {
    let rows: Vec<&HistoricalRecord> = data.records_for_site(site).collect();
    if rows.is_empty() {
        return Err(ForageError::SiteNotFound(site.to_string()));
    }
    let aggregates = SiteAggregates::from_records(&rows)?;
    Ok(ScenarioFeatures::from_aggregates(&aggregates, scenario))
}
