//! Curve fitting.
//!
//! Responsibilities:
//!
//! - Levenberg-Marquardt fit of `(To, k)` for a single dataset (`fitter`)
//! - independent, parallel fits across materials plus curve resampling (`batch`)

pub mod batch;
pub mod fitter;

pub use batch::*;
pub use fitter::*;
