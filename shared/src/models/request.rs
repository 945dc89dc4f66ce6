//! Form vocabulary: cultivars, sowing and harvest buckets, and the raw
//! prediction request submitted by the user

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::error::{ForageError, ForageResult};
use crate::models::scenario::WeatherScenario;

/// Maize cultivars the predictors were trained on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Cultivar {
    A200,
    A300,
    A400,
    G200,
    G300,
    G400,
}

impl Cultivar {
    /// Canonical order of the cultivar category set
    pub const ALL: [Cultivar; 6] = [
        Cultivar::A200,
        Cultivar::A300,
        Cultivar::A400,
        Cultivar::G200,
        Cultivar::G300,
        Cultivar::G400,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Cultivar::A200 => "A200",
            Cultivar::A300 => "A300",
            Cultivar::A400 => "A400",
            Cultivar::G200 => "G200",
            Cultivar::G300 => "G300",
            Cultivar::G400 => "G400",
        }
    }
}

impl std::fmt::Display for Cultivar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cultivar {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cultivar::ALL
            .into_iter()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| ForageError::InvalidCategory {
                field: "cultivar",
                value: s.to_string(),
            })
    }
}

/// Normalise a bucket label so "Early June", "early-june" and "Early-June"
/// compare equal
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Sowing date bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SowingDate {
    #[serde(rename = "Mid-May")]
    MidMay,
    #[serde(rename = "End-May")]
    EndMay,
    #[serde(rename = "Early-June")]
    EarlyJune,
}

impl SowingDate {
    pub const ALL: [SowingDate; 3] = [
        SowingDate::MidMay,
        SowingDate::EndMay,
        SowingDate::EarlyJune,
    ];

    pub fn day_of_year(&self) -> i32 {
        match self {
            SowingDate::MidMay => 133,
            SowingDate::EndMay => 151,
            SowingDate::EarlyJune => 167,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SowingDate::MidMay => "Mid-May",
            SowingDate::EndMay => "End-May",
            SowingDate::EarlyJune => "Early-June",
        }
    }
}

impl FromStr for SowingDate {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        SowingDate::ALL
            .into_iter()
            .find(|d| normalize_label(d.label()) == wanted)
            .ok_or_else(|| ForageError::InvalidCategory {
                field: "sowing",
                value: s.to_string(),
            })
    }
}

/// Harvest date bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HarvestDate {
    #[serde(rename = "Early-Sept")]
    EarlySept,
    #[serde(rename = "Mid-Sept")]
    MidSept,
    #[serde(rename = "Late-Sept")]
    LateSept,
}

impl HarvestDate {
    pub const ALL: [HarvestDate; 3] = [
        HarvestDate::EarlySept,
        HarvestDate::MidSept,
        HarvestDate::LateSept,
    ];

    pub fn day_of_year(&self) -> i32 {
        match self {
            HarvestDate::EarlySept => 250,
            HarvestDate::MidSept => 264,
            HarvestDate::LateSept => 287,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HarvestDate::EarlySept => "Early-Sept",
            HarvestDate::MidSept => "Mid-Sept",
            HarvestDate::LateSept => "Late-Sept",
        }
    }
}

impl FromStr for HarvestDate {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        HarvestDate::ALL
            .into_iter()
            .find(|d| normalize_label(d.label()) == wanted)
            .ok_or_else(|| ForageError::InvalidCategory {
                field: "harvest",
                value: s.to_string(),
            })
    }
}

/// Prediction request as submitted by the form. Every field is a free-form
/// label; closed-set membership is checked by [`PredictionRequest::parse`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictionRequest {
    #[validate(length(min = 1, max = 100))]
    pub site: String,
    #[validate(length(min = 1))]
    pub cultivar: String,
    #[validate(length(min = 1))]
    pub sowing: String,
    #[validate(length(min = 1))]
    pub harvest: String,
    #[validate(length(min = 1))]
    pub scenario: String,
}

/// A request whose categorical labels have all been resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub site: String,
    pub cultivar: Cultivar,
    pub sowing: SowingDate,
    pub harvest: HarvestDate,
    pub scenario: WeatherScenario,
}

impl PredictionRequest {
    pub fn parse(&self) -> ForageResult<ParsedRequest> {
        Ok(ParsedRequest {
            site: self.site.trim().to_string(),
            cultivar: self.cultivar.parse()?,
            sowing: self.sowing.parse()?,
            harvest: self.harvest.parse()?,
            scenario: self.scenario.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_days_of_year() {
        assert_eq!(SowingDate::MidMay.day_of_year(), 133);
        assert_eq!(SowingDate::EndMay.day_of_year(), 151);
        assert_eq!(SowingDate::EarlyJune.day_of_year(), 167);
        assert_eq!(HarvestDate::EarlySept.day_of_year(), 250);
        assert_eq!(HarvestDate::MidSept.day_of_year(), 264);
        assert_eq!(HarvestDate::LateSept.day_of_year(), 287);
    }

    #[test]
    fn test_bucket_labels_are_lenient() {
        assert_eq!("Early June".parse::<SowingDate>().unwrap(), SowingDate::EarlyJune);
        assert_eq!("early-june".parse::<SowingDate>().unwrap(), SowingDate::EarlyJune);
        assert_eq!("Mid Sept".parse::<HarvestDate>().unwrap(), HarvestDate::MidSept);
    }

    #[test]
    fn test_unknown_cultivar_is_invalid_category() {
        let err = "B500".parse::<Cultivar>().unwrap_err();
        assert_eq!(
            err,
            ForageError::InvalidCategory {
                field: "cultivar",
                value: "B500".to_string()
            }
        );
    }

    #[test]
    fn test_parse_full_request() {
        let request = PredictionRequest {
            site: "Barcia".to_string(),
            cultivar: "A200".to_string(),
            sowing: "Mid-May".to_string(),
            harvest: "Early-Sept".to_string(),
            scenario: "Average Year".to_string(),
        };
        let parsed = request.parse().unwrap();
        assert_eq!(parsed.cultivar, Cultivar::A200);
        assert_eq!(parsed.sowing, SowingDate::MidMay);
        assert_eq!(parsed.harvest, HarvestDate::EarlySept);
        assert_eq!(parsed.scenario, WeatherScenario::Average);
    }

    #[test]
    fn test_empty_site_fails_validation() {
        let request = PredictionRequest {
            site: String::new(),
            cultivar: "A200".to_string(),
            sowing: "Mid-May".to_string(),
            harvest: "Early-Sept".to_string(),
            scenario: "Good".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
