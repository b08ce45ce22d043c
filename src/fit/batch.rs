//! Fit every material of an environment.
//!
//! Each material goes through its own, independent fit-engine invocation; no
//! state is shared between them, so they run in parallel. Output order
//! follows the input order regardless of scheduling.

use rayon::prelude::*;
use tracing::info;

use crate::data::measured_dataset;
use crate::domain::{CurveSpec, Environment, FitOptions, Material, MaterialFit};
use crate::error::CoolingError;
use crate::fit::fitter::fit_dataset;
use crate::models::CoolingModel;

/// Fit the measured datasets of `materials` in `env`.
///
/// The first failure (in material order) is returned; a failed fit is never
/// replaced by a default.
pub fn fit_environment(
    env: Environment,
    materials: &[Material],
    opts: &FitOptions,
    curve: &CurveSpec,
) -> Result<Vec<MaterialFit>, CoolingError> {
    let start = env.reported_params()?;
    let model = CoolingModel::new(start.ambient(), opts.step)?;

    let results: Vec<Result<MaterialFit, CoolingError>> = materials
        .par_iter()
        .map(|&material| {
            let dataset = measured_dataset(env, material)?;
            let fit = fit_dataset(&dataset, &start, opts)?;
            info!(
                material = material.display_name(),
                environment = env.display_name(),
                to_hat = fit.to_hat,
                k_hat = fit.k_hat,
                chi_square = fit.chi_square,
                iterations = fit.iterations,
                "fit converged"
            );
            let curve = model.sample_curve(fit.to_hat, fit.k_hat, curve);
            Ok(MaterialFit {
                material,
                dataset,
                fit,
                curve,
            })
        })
        .collect();

    results.into_iter().collect()
}
