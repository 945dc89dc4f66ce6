//! Domain models for forage maize yield prediction

mod feature;
mod prediction;
mod reference;
mod request;
mod scenario;

pub use feature::*;
pub use prediction::*;
pub use reference::*;
pub use request::*;
pub use scenario::*;
