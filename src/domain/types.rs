//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during simulation and fitting
//! - exported to JSON/CSV
//! - reloaded later for reporting

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CoolingError;

/// Smallest uncertainty accepted as a fit weight divisor.
pub const MIN_SIGMA: f64 = 1e-9;

/// Ambient temperature, initial temperature and cooling-rate constant.
///
/// Construction enforces `k > 0` and `To > Ta`; the log argument of the
/// analytic inverse is undefined otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    ambient: f64,
    initial: f64,
    rate: f64,
}

impl PhysicalParameters {
    pub fn new(ambient: f64, initial: f64, rate: f64) -> Result<Self, CoolingError> {
        if !(ambient.is_finite() && initial.is_finite() && rate.is_finite()) {
            return Err(CoolingError::InvalidParameters(format!(
                "parameters must be finite (Ta={ambient}, To={initial}, k={rate})"
            )));
        }
        if rate <= 0.0 {
            return Err(CoolingError::InvalidParameters(format!(
                "cooling constant must be > 0, got k={rate}"
            )));
        }
        if initial <= ambient {
            return Err(CoolingError::InvalidParameters(format!(
                "initial temperature must exceed ambient (To={initial}, Ta={ambient})"
            )));
        }
        Ok(Self {
            ambient,
            initial,
            rate,
        })
    }

    /// `Ta` in °C.
    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    /// `To` in °C.
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// `k` in 1/s.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// One `(time, temperature)` observation with uncertainties on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub time: f64,
    pub temperature: f64,
    pub sigma_time: f64,
    pub sigma_temperature: f64,
}

impl MeasurementPoint {
    pub fn new(
        time: f64,
        temperature: f64,
        sigma_time: f64,
        sigma_temperature: f64,
    ) -> Result<Self, CoolingError> {
        if !(time.is_finite() && temperature.is_finite()) {
            return Err(CoolingError::InvalidMeasurement(format!(
                "non-finite point (t={time}, T={temperature})"
            )));
        }
        for (name, sigma) in [("sigma_time", sigma_time), ("sigma_temperature", sigma_temperature)] {
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(CoolingError::InvalidMeasurement(format!(
                    "{name} must be finite and >= 0, got {sigma}"
                )));
            }
        }
        Ok(Self {
            time,
            temperature,
            sigma_time,
            sigma_temperature,
        })
    }

    /// Temperature uncertainty as used for fit weighting (floored at [`MIN_SIGMA`]).
    pub fn weight_sigma(&self) -> f64 {
        self.sigma_temperature.max(MIN_SIGMA)
    }

    /// Time uncertainty floored at [`MIN_SIGMA`].
    pub fn effective_sigma_time(&self) -> f64 {
        self.sigma_time.max(MIN_SIGMA)
    }
}

/// Ordered measurements for one physical sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub points: Vec<MeasurementPoint>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, points: Vec<MeasurementPoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Build a dataset from parallel columns, validating every point.
    pub fn from_columns(
        label: impl Into<String>,
        time: &[f64],
        temperature: &[f64],
        sigma_time: &[f64],
        sigma_temperature: &[f64],
    ) -> Result<Self, CoolingError> {
        let n = time.len();
        if temperature.len() != n || sigma_time.len() != n || sigma_temperature.len() != n {
            return Err(CoolingError::InvalidMeasurement(format!(
                "column lengths differ (time={n}, temperature={}, sigma_time={}, sigma_temperature={})",
                temperature.len(),
                sigma_time.len(),
                sigma_temperature.len()
            )));
        }
        let points = (0..n)
            .map(|i| MeasurementPoint::new(time[i], temperature[i], sigma_time[i], sigma_temperature[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(label, points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Monte Carlo settings for a synthesized series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Draws per checkpoint.
    pub sample_count: usize,
    /// Instrument temperature uncertainty (°C).
    pub sigma_temperature: f64,
    /// Instrument-level time uncertainty (s), used when the sample RMS is smaller.
    pub sigma_time_floor: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            sample_count: 1000,
            sigma_temperature: 2.0,
            // Settling time of the multimeter.
            sigma_time_floor: 30.0,
        }
    }
}

/// Output of one Monte Carlo estimation at a single checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub mean_time: f64,
    pub time_uncertainty: f64,
    /// Draws that contributed to the statistics.
    pub sample_count: usize,
    /// Draws discarded because they crossed the ambient temperature.
    pub rejected: usize,
}

/// Nominal temperature checkpoints `start + step * i` for `i < count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointGrid {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl Default for CheckpointGrid {
    fn default() -> Self {
        Self {
            start: 30.0,
            step: 5.0,
            count: 10,
        }
    }
}

impl CheckpointGrid {
    pub fn temperatures(&self) -> Vec<f64> {
        (0..self.count)
            .map(|i| self.start + self.step * i as f64)
            .collect()
    }
}

/// A synthesized checkpoint: the simulated measurement plus its noiseless reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticPoint {
    pub point: MeasurementPoint,
    /// Analytic inverse time of the checkpoint itself (may be negative above `To`).
    pub nominal_time: f64,
    pub monte_carlo: MonteCarloResult,
}

/// A full simulated series over a checkpoint grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSeries {
    pub params: PhysicalParameters,
    pub config: MonteCarloConfig,
    pub seed: u64,
    pub points: Vec<SyntheticPoint>,
}

impl SyntheticSeries {
    /// The simulated measurements as a dataset (insertion order preserved).
    pub fn to_dataset(&self, label: impl Into<String>) -> Dataset {
        Dataset::new(label, self.points.iter().map(|p| p.point).collect())
    }
}

/// Levenberg-Marquardt settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// RK4 step of the forward model (s).
    pub step: f64,
    pub max_iterations: usize,
    pub initial_lambda: f64,
    /// Relative chi-square change regarded as converged.
    pub ftol: f64,
    /// Relative parameter change regarded as converged.
    pub xtol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            step: 0.1,
            max_iterations: 200,
            initial_lambda: 1e-3,
            ftol: 1e-12,
            xtol: 1e-10,
        }
    }
}

/// Output of one fit over one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub to_hat: f64,
    pub k_hat: f64,
    /// Covariance of `(To, k)`, inverse of the Gauss-Newton Hessian approximation.
    pub covariance: [[f64; 2]; 2],
    pub chi_square: f64,
    pub dof: usize,
    pub iterations: usize,
}

impl FitResult {
    /// One-sigma errors `(σ_To, σ_k)`.
    pub fn std_errors(&self) -> (f64, f64) {
        (
            self.covariance[0][0].max(0.0).sqrt(),
            self.covariance[1][1].max(0.0).sqrt(),
        )
    }

    /// `chi² / dof`, or `None` for a saturated fit.
    pub fn reduced_chi_square(&self) -> Option<f64> {
        if self.dof == 0 {
            None
        } else {
            Some(self.chi_square / self.dof as f64)
        }
    }
}

/// How to resample a fitted curve for overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    pub t_max: f64,
    pub points: usize,
}

impl Default for CurveSpec {
    fn default() -> Self {
        Self {
            t_max: 3000.0,
            points: 101,
        }
    }
}

/// Dense samples of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub time: Vec<f64>,
    pub temperature: Vec<f64>,
}

/// Container material of the water sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Plastic,
    Ceramic,
    Glass,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Plastic, Material::Ceramic, Material::Glass];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Material::Plastic => "Water-Plastic",
            Material::Ceramic => "Water-Ceramic",
            Material::Glass => "Water-Glass",
        }
    }

    /// Heat capacity annotated in the experiment write-up, J/(kg·K).
    pub fn heat_capacity(self) -> f64 {
        match self {
            Material::Plastic => 0.55,
            Material::Ceramic => 1.05,
            Material::Glass => 0.84,
        }
    }
}

/// Where the samples cooled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Room,
    Fridge,
}

impl Environment {
    pub fn display_name(self) -> &'static str {
        match self {
            Environment::Room => "room",
            Environment::Fridge => "fridge",
        }
    }

    /// Ambient temperature `Ta` (°C).
    pub fn ambient(self) -> f64 {
        match self {
            Environment::Room => 20.0,
            Environment::Fridge => -8.0,
        }
    }

    /// Reported parameters used as the starting point of every fit.
    pub fn reported_params(self) -> Result<PhysicalParameters, CoolingError> {
        PhysicalParameters::new(self.ambient(), 74.0, 0.000764)
    }
}

/// Fit output for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialFit {
    pub material: Material,
    pub dataset: Dataset,
    pub fit: FitResult,
    pub curve: CurveGrid,
}

/// A saved set of fits (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub environment: Environment,
    pub ambient: f64,
    pub options: FitOptions,
    pub fits: Vec<MaterialFit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_reject_initial_below_ambient() {
        let err = PhysicalParameters::new(20.0, 10.0, 0.001).unwrap_err();
        assert!(matches!(err, CoolingError::InvalidParameters(_)));
    }

    #[test]
    fn params_reject_non_positive_rate() {
        assert!(matches!(
            PhysicalParameters::new(20.0, 74.0, 0.0),
            Err(CoolingError::InvalidParameters(_))
        ));
        assert!(matches!(
            PhysicalParameters::new(20.0, 74.0, -1e-3),
            Err(CoolingError::InvalidParameters(_))
        ));
        assert!(PhysicalParameters::new(20.0, 74.0, 0.000764).is_ok());
    }

    #[test]
    fn measurement_rejects_negative_sigma() {
        assert!(MeasurementPoint::new(0.0, 74.0, -1.0, 1.0).is_err());
        assert!(MeasurementPoint::new(0.0, 74.0, 1.0, f64::NAN).is_err());
        let p = MeasurementPoint::new(0.0, 74.0, 0.0, 0.0).unwrap();
        assert_eq!(p.weight_sigma(), MIN_SIGMA);
        assert_eq!(p.effective_sigma_time(), MIN_SIGMA);
    }

    #[test]
    fn dataset_from_columns_checks_lengths() {
        let err = Dataset::from_columns("x", &[0.0, 1.0], &[74.0], &[1.0, 1.0], &[1.0, 1.0]);
        assert!(matches!(err, Err(CoolingError::InvalidMeasurement(_))));
    }

    #[test]
    fn checkpoint_grid_matches_default_experiment() {
        let temps = CheckpointGrid::default().temperatures();
        assert_eq!(temps.len(), 10);
        assert_eq!(temps[0], 30.0);
        assert_eq!(temps[9], 75.0);
    }
}
