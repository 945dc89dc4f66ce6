//! Prediction outputs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity estimated by one of the three predictors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum YieldTarget {
    /// Dry matter, kg DM/ha
    DryMatter,
    /// Net energy, UFL/ha
    Energy,
    /// Crude protein, kg CP/ha
    CrudeProtein,
}

impl YieldTarget {
    pub const ALL: [YieldTarget; 3] = [
        YieldTarget::DryMatter,
        YieldTarget::Energy,
        YieldTarget::CrudeProtein,
    ];

    pub fn unit(&self) -> &'static str {
        match self {
            YieldTarget::DryMatter => "kg DM/ha",
            YieldTarget::Energy => "UFL/ha",
            YieldTarget::CrudeProtein => "kg CP/ha",
        }
    }
}

impl std::fmt::Display for YieldTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YieldTarget::DryMatter => write!(f, "Dry Matter"),
            YieldTarget::Energy => write!(f, "UFL"),
            YieldTarget::CrudeProtein => write!(f, "Crude Protein"),
        }
    }
}

/// Round a raw model output to two decimals. The exact binary value is
/// rounded, so 2.675 (stored just below) becomes 2.67. Non-finite input
/// has no decimal representation.
pub fn round_prediction(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(2))
}

/// The three yield estimates for one request, rounded to two decimals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub dry_matter_kg_ha: Decimal,
    pub energy_ufl_ha: Decimal,
    pub crude_protein_kg_ha: Decimal,
}

impl PredictionResult {
    pub fn get(&self, target: YieldTarget) -> Decimal {
        match target {
            YieldTarget::DryMatter => self.dry_matter_kg_ha,
            YieldTarget::Energy => self.energy_ufl_ha,
            YieldTarget::CrudeProtein => self.crude_protein_kg_ha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(
            round_prediction(18234.5678),
            Some(Decimal::from_str("18234.57").unwrap())
        );
        assert_eq!(round_prediction(1.0), Some(Decimal::from_str("1.00").unwrap()));
        // 2.675 is stored as 2.67499999...
        assert_eq!(round_prediction(2.675), Some(Decimal::from_str("2.67").unwrap()));
    }

    #[test]
    fn test_non_finite_cannot_be_rounded() {
        assert_eq!(round_prediction(f64::NAN), None);
        assert_eq!(round_prediction(f64::INFINITY), None);
    }

    #[test]
    fn test_units() {
        assert_eq!(YieldTarget::DryMatter.unit(), "kg DM/ha");
        assert_eq!(YieldTarget::Energy.unit(), "UFL/ha");
        assert_eq!(YieldTarget::CrudeProtein.unit(), "kg CP/ha");
    }
}
