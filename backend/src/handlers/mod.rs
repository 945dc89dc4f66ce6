//! HTTP handlers

pub mod health;
pub mod prediction;
pub mod session;

pub use health::*;
pub use prediction::*;
pub use session::*;
