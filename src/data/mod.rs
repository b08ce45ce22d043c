//! Input data: measured lab datasets and simulated series.
//!
//! - `experiment`: the recorded cooling curves per environment and material
//! - `montecarlo`: noise propagation from temperature to time
//! - `sample`: simulated series over a checkpoint grid

pub mod experiment;
pub mod montecarlo;
pub mod sample;

pub use experiment::measured_dataset;
pub use montecarlo::estimate_time;
pub use sample::synthesize_series;
