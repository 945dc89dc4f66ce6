//! WebAssembly module for the forage maize prediction form
//!
//! Provides client-side computation for:
//! - Sowing/harvest bucket lookup
//! - Growing season length
//! - Cultivar validation
//! - Scenario features over a downloaded set of historical records

use shared::{
    resolve, Cultivar, ForageError, HarvestDate, HistoricalRecord, ReferenceData, ScenarioFeatures,
    SowingDate, WeatherScenario,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn to_js_error(err: ForageError) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.to_string())
}

/// Day of year for a sowing bucket label ("Mid-May", "End-May", "Early-June")
#[wasm_bindgen]
pub fn sowing_day_of_year(label: &str) -> Result<i32, JsValue> {
    label
        .parse::<SowingDate>()
        .map(|d| d.day_of_year())
        .map_err(to_js_error)
}

/// Day of year for a harvest bucket label ("Early-Sept", "Mid-Sept", "Late-Sept")
#[wasm_bindgen]
pub fn harvest_day_of_year(label: &str) -> Result<i32, JsValue> {
    label
        .parse::<HarvestDate>()
        .map(|d| d.day_of_year())
        .map_err(to_js_error)
}

/// Harvest minus sowing day. Negative when harvest precedes sowing.
#[wasm_bindgen]
pub fn growing_season_days(sowing_doy: i32, harvest_doy: i32) -> i32 {
    harvest_doy - sowing_doy
}

#[wasm_bindgen]
pub fn is_known_cultivar(label: &str) -> bool {
    label.parse::<Cultivar>().is_ok()
}

/// Cultivar labels in category order
#[wasm_bindgen]
pub fn cultivar_options() -> js_sys::Array {
    Cultivar::ALL
        .iter()
        .map(|c| JsValue::from_str(c.label()))
        .collect()
}

fn scenario_features_json(
    records_json: &str,
    site: &str,
    scenario: &str,
) -> Result<String, String> {
    let records: Vec<HistoricalRecord> =
        serde_json::from_str(records_json).map_err(|e| format!("Invalid records JSON: {}", e))?;
    let scenario: WeatherScenario = scenario.parse().map_err(|e: ForageError| e.to_string())?;
    let features: ScenarioFeatures =
        resolve(&ReferenceData::new(records), site, scenario).map_err(|e| e.to_string())?;
    serde_json::to_string(&features).map_err(|e| e.to_string())
}

/// Resolve scenario features from a JSON array of historical records
#[wasm_bindgen]
pub fn resolve_scenario(records_json: &str, site: &str, scenario: &str) -> Result<String, JsValue> {
    scenario_features_json(records_json, site, scenario).map_err(|msg| {
        web_sys::console::error_1(&JsValue::from_str(&msg));
        JsValue::from_str(&msg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"[
        {"Site": "Barcia", "Tmin(ºC)": 10.0, "Tmax(ºC)": 20.0, "Precipitation(mm)": 1.0,
         "Radiation(Mj/m2day)": 12.0, "WHC(mm)": 150.0, "C(%)": 3.0, "pH": 5.6,
         "AnthesisDate(doy)": 205.0},
        {"Site": "Barcia", "Tmin(ºC)": 14.0, "Tmax(ºC)": 26.0, "Precipitation(mm)": 5.0,
         "Radiation(Mj/m2day)": 18.0, "WHC(mm)": 150.0, "C(%)": 3.0, "pH": 5.6,
         "AnthesisDate(doy)": 205.0}
    ]"#;

    #[test]
    fn test_growing_season_days() {
        assert_eq!(growing_season_days(133, 250), 117);
        assert_eq!(growing_season_days(287, 133), -154);
    }

    #[test]
    fn test_is_known_cultivar() {
        assert!(is_known_cultivar("G300"));
        assert!(!is_known_cultivar("G500"));
    }

    #[test]
    fn test_scenario_features_json() {
        let json = scenario_features_json(RECORDS, "Barcia", "Good Year").unwrap();
        let features: ScenarioFeatures = serde_json::from_str(&json).unwrap();
        assert_eq!(features.radiation, 18.0);
        assert_eq!(features.precipitation, 1.0);
        assert_eq!(features.tmax, 20.0);
    }

    #[test]
    fn test_scenario_features_json_unknown_site() {
        let err = scenario_features_json(RECORDS, "Lugo", "Good").unwrap_err();
        assert!(err.contains("Lugo"));
    }
}
