//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - physical inputs (`PhysicalParameters`, `MeasurementPoint`, `Dataset`)
//! - run configuration (`MonteCarloConfig`, `CheckpointGrid`, `FitOptions`, `CurveSpec`)
//! - outputs (`MonteCarloResult`, `SyntheticSeries`, `FitResult`, `MaterialFit`, `FitFile`)

pub mod types;

pub use types::*;
