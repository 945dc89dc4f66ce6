//! Validation helpers for user-supplied form values

use crate::error::{ForageError, ForageResult};
use crate::models::Cultivar;

pub const MIN_DAY_OF_YEAR: i32 = 1;
pub const MAX_DAY_OF_YEAR: i32 = 366;

/// Day of year must lie in 1..=366 (leap years included)
pub fn validate_day_of_year(field: &'static str, value: i32) -> ForageResult<()> {
    if (MIN_DAY_OF_YEAR..=MAX_DAY_OF_YEAR).contains(&value) {
        Ok(())
    } else {
        Err(ForageError::InvalidDayOfYear { field, value })
    }
}

/// Check a cultivar label against the fixed cultivar set
pub fn validate_cultivar(label: &str) -> ForageResult<Cultivar> {
    label.parse()
}

/// Harvest before sowing is accepted by the builder; callers can use this to
/// warn about it.
pub fn is_inverted_season(sowing_doy: i32, harvest_doy: i32) -> bool {
    harvest_doy < sowing_doy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_year_bounds() {
        assert!(validate_day_of_year("sowing", 1).is_ok());
        assert!(validate_day_of_year("sowing", 366).is_ok());
        assert!(validate_day_of_year("sowing", 0).is_err());
        assert!(validate_day_of_year("harvest", 367).is_err());
        assert!(validate_day_of_year("harvest", -5).is_err());
    }

    #[test]
    fn test_validate_cultivar() {
        for label in ["A200", "A300", "A400", "G200", "G300", "G400"] {
            assert!(validate_cultivar(label).is_ok());
        }
        assert!(validate_cultivar("A500").is_err());
        assert!(validate_cultivar("").is_err());
    }

    #[test]
    fn test_inverted_season() {
        assert!(is_inverted_season(287, 133));
        assert!(!is_inverted_season(133, 250));
    }
}
