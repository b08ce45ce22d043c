//! Forward model used by the fit engine.
//!
//! Kept as a small, pure type so fitting and curve resampling share exactly the
//! same discretization.

pub mod model;

pub use model::*;
