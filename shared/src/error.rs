//! Domain errors raised by the resolver and the feature builder

use thiserror::Error;

/// Errors produced while deriving features for a prediction request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForageError {
    /// The site has no rows in the reference dataset
    #[error("No historical records for site '{0}'")]
    SiteNotFound(String),

    /// A categorical value outside its closed category set
    #[error("Unknown {field} category '{value}'")]
    InvalidCategory { field: &'static str, value: String },

    #[error("Day of year {value} for {field} is outside 1..=366")]
    InvalidDayOfYear { field: &'static str, value: i32 },

    /// A historical aggregate could not be computed (e.g. NaN in the column)
    #[error("Aggregate for {field} is undefined")]
    UndefinedAggregate { field: &'static str },

    /// The assembled record does not match the schema a consumer expects
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),
}

pub type ForageResult<T> = Result<T, ForageError>;
