//! Collaborators loaded at startup: the reference dataset and the predictors

pub mod predictor;
pub mod reference;

pub use predictor::{Predictor, PredictorError, PredictorSet, TreeEnsembleModel};
pub use reference::{load_reference_csv, read_reference_csv};
