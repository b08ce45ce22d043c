//! Shared experiment workflow used by the CLI handlers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parameters -> Monte Carlo series -> fit of the series -> catalog fits
//!
//! Handlers can then focus on presentation (printing and exports).

use tracing::info;

use crate::data::synthesize_series;
use crate::domain::{
    CheckpointGrid, CurveSpec, Environment, FitFile, FitOptions, FitResult, Material,
    MonteCarloConfig, PhysicalParameters, SyntheticSeries,
};
use crate::error::AppError;
use crate::fit::{fit_dataset, fit_environment};
use crate::io::build_fit_file;

/// All computed outputs of a single `cooling run`.
#[derive(Debug, Clone)]
pub struct ExperimentOutput {
    pub series: SyntheticSeries,
    /// Fit of the synthesized series, started from the parameters that generated it.
    pub series_fit: FitResult,
    pub catalog: FitFile,
}

/// Synthesize a measurement series.
pub fn run_simulation(
    params: &PhysicalParameters,
    grid: &CheckpointGrid,
    config: &MonteCarloConfig,
    seed: u64,
) -> Result<SyntheticSeries, AppError> {
    Ok(synthesize_series(params, grid, config, seed)?)
}

/// Fit the catalog datasets of `materials` in `env`.
pub fn run_fits(
    env: Environment,
    materials: &[Material],
    opts: &FitOptions,
    curve: &CurveSpec,
) -> Result<FitFile, AppError> {
    let fits = fit_environment(env, materials, opts, curve)?;
    Ok(build_fit_file(env, opts, fits))
}

/// Simulate with the reported room parameters, fit that series, then fit the
/// measured room datasets.
pub fn run_experiment(
    grid: &CheckpointGrid,
    config: &MonteCarloConfig,
    seed: u64,
    opts: &FitOptions,
    curve: &CurveSpec,
) -> Result<ExperimentOutput, AppError> {
    let env = Environment::Room;
    let params = env.reported_params()?;

    let series = run_simulation(&params, grid, config, seed)?;
    let series_fit = fit_dataset(&series.to_dataset("simulated"), &params, opts)?;
    info!(
        to_hat = series_fit.to_hat,
        k_hat = series_fit.k_hat,
        chi_square = series_fit.chi_square,
        "simulated series fitted"
    );

    let catalog = run_fits(env, &Material::ALL, opts, curve)?;

    Ok(ExperimentOutput {
        series,
        series_fit,
        catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_recovers_generating_rate() {
        let config = MonteCarloConfig {
            sample_count: 400,
            ..MonteCarloConfig::default()
        };
        let out = run_experiment(
            &CheckpointGrid::default(),
            &config,
            7,
            &FitOptions::default(),
            &CurveSpec { t_max: 3000.0, points: 31 },
        )
        .unwrap();

        assert_eq!(out.series.points.len(), 10);
        // Ten points with σt ≳ 30 s: the fitted rate stays in the right ballpark.
        let rel = (out.series_fit.k_hat - 0.000764).abs() / 0.000764;
        assert!(rel < 0.5, "k_hat = {}", out.series_fit.k_hat);
        assert_eq!(out.catalog.fits.len(), 3);
        assert_eq!(out.catalog.environment, Environment::Room);
    }

    #[test]
    fn invalid_sample_count_maps_to_input_exit_code() {
        let params = Environment::Room.reported_params().unwrap();
        let config = MonteCarloConfig {
            sample_count: 0,
            ..MonteCarloConfig::default()
        };
        let err = run_simulation(&params, &CheckpointGrid::default(), &config, 1).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
