//! Shared types and models for forage maize yield prediction
//!
//! This crate holds the pure feature pipeline (scenario resolution and
//! feature row assembly) shared by the backend and the WASM form helpers.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
