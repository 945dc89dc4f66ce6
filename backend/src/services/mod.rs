//! Business logic services for the forage maize prediction server

pub mod prediction;
pub mod session;

pub use prediction::{FormOptions, PredictionOutcome, PredictionService};
pub use session::{SessionState, SessionStore};
