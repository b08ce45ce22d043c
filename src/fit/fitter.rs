//! Nonlinear least-squares fit of `(To, k)` against the RK4 trajectory.
//!
//! Given:
//! - times `t_i` (independent axis)
//! - observed temperatures `T_i` with uncertainties `σT_i`
//! - `Ta` held fixed
//!
//! we minimize
//!
//! ```text
//! χ²(To, k) = Σ ((T_i - model(t_i; To, k)) / σT_i)²
//! ```
//!
//! with Levenberg-Marquardt. Time uncertainties do not enter the weights:
//! the experiment treats time as exact for fitting and only displays `σt`.
//!
//! The Jacobian is taken by central differences; `model` is linear in `To`
//! so that column is exact up to rounding.

use nalgebra::{DMatrix, DVector, Vector2};
use tracing::debug;

use crate::domain::{Dataset, FitOptions, FitResult, PhysicalParameters};
use crate::error::CoolingError;
use crate::math::{invert, is_singular, normal_equations, solve_damped};
use crate::models::CoolingModel;

/// Relative finite-difference step for the Jacobian.
const FD_REL_STEP: f64 = 1e-6;
/// Cosine between residuals and Jacobian columns regarded as orthogonal.
const GTOL: f64 = 1e-10;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;

/// Fit `(To, k)` to `dataset`, starting from `initial` and holding its `Ta` fixed.
///
/// No retries are attempted: on failure the caller decides whether to restart
/// from perturbed parameters or surface the error.
pub fn fit_dataset(
    dataset: &Dataset,
    initial: &PhysicalParameters,
    opts: &FitOptions,
) -> Result<FitResult, CoolingError> {
    validate_options(opts)?;
    check_identifiable(dataset)?;

    let problem = Problem::new(dataset, CoolingModel::new(initial.ambient(), opts.step)?);

    let mut p = Vector2::new(initial.initial(), initial.rate());
    let mut r = problem.residuals(&p).ok_or_else(|| {
        CoolingError::FitConvergence(format!(
            "non-finite residuals at the starting point (To={}, k={})",
            p[0], p[1]
        ))
    })?;
    let mut chi2 = r.norm_squared();
    let mut lambda = opts.initial_lambda;
    let mut iterations = 0usize;
    let mut converged = chi2 == 0.0;

    while !converged {
        if iterations >= opts.max_iterations {
            return Err(CoolingError::FitConvergence(format!(
                "{} exceeded {} iterations (chi2={chi2:.6e}, To={:.6}, k={:.6e})",
                dataset.label, opts.max_iterations, p[0], p[1]
            )));
        }
        iterations += 1;

        let jac = problem.jacobian(&p);
        let (jtj, jtr) = normal_equations(&jac, &r);
        if is_singular(&jtj) {
            return Err(CoolingError::FitConvergence(format!(
                "singular Jacobian for {} at To={:.6}, k={:.6e}",
                dataset.label, p[0], p[1]
            )));
        }
        if gradient_vanishes(&jtj, &jtr, chi2) {
            break;
        }

        // Inner loop: raise damping until a step lowers χ².
        loop {
            let accepted = solve_damped(&jtj, &jtr, lambda).and_then(|step| {
                let trial = p + step;
                let r_trial = problem.residuals(&trial)?;
                let chi2_trial = r_trial.norm_squared();
                (chi2_trial < chi2).then_some((step, trial, r_trial, chi2_trial))
            });

            match accepted {
                Some((step, trial, r_trial, chi2_trial)) => {
                    let decrease = chi2 - chi2_trial;
                    let small_step = (0..2).all(|j| step[j].abs() <= opts.xtol * (trial[j].abs() + opts.xtol));
                    converged = decrease <= opts.ftol * chi2 || small_step || chi2_trial == 0.0;
                    p = trial;
                    r = r_trial;
                    chi2 = chi2_trial;
                    lambda = (lambda / 10.0).max(LAMBDA_MIN);
                    debug!(iteration = iterations, chi2, to = p[0], k = p[1], lambda, "LM step accepted");
                    break;
                }
                None => {
                    lambda *= 10.0;
                    if lambda > LAMBDA_MAX {
                        // No descent direction left at machine precision.
                        converged = true;
                        break;
                    }
                }
            }
        }
    }

    let (to_hat, k_hat) = (p[0], p[1]);
    if !(to_hat.is_finite() && k_hat.is_finite()) || k_hat <= 0.0 {
        return Err(CoolingError::FitConvergence(format!(
            "unphysical optimum for {} (To={to_hat}, k={k_hat})",
            dataset.label
        )));
    }

    let jac = problem.jacobian(&p);
    let (jtj, _) = normal_equations(&jac, &r);
    let cov = invert(&jtj).ok_or_else(|| {
        CoolingError::FitConvergence(format!("singular Hessian at the optimum for {}", dataset.label))
    })?;

    Ok(FitResult {
        to_hat,
        k_hat,
        covariance: [[cov[(0, 0)], cov[(0, 1)]], [cov[(1, 0)], cov[(1, 1)]]],
        chi_square: chi2,
        dof: dataset.len() - 2,
        iterations,
    })
}

fn validate_options(opts: &FitOptions) -> Result<(), CoolingError> {
    if opts.max_iterations == 0 {
        return Err(CoolingError::InvalidConfig("max_iterations must be > 0".into()));
    }
    if !(opts.initial_lambda.is_finite() && opts.initial_lambda > 0.0) {
        return Err(CoolingError::InvalidConfig(format!(
            "initial_lambda must be finite and > 0, got {}",
            opts.initial_lambda
        )));
    }
    if !(opts.ftol >= 0.0 && opts.xtol >= 0.0) {
        return Err(CoolingError::InvalidConfig("tolerances must be >= 0".into()));
    }
    Ok(())
}

/// Two parameters need at least two distinct times and a temperature that changes.
fn check_identifiable(dataset: &Dataset) -> Result<(), CoolingError> {
    if dataset.len() < 2 {
        return Err(CoolingError::FitConvergence(format!(
            "{} has {} point(s); at least 2 are needed for (To, k)",
            dataset.label,
            dataset.len()
        )));
    }
    let distinct = |values: Vec<f64>| {
        let mut v = values;
        v.sort_by(f64::total_cmp);
        v.dedup();
        v.len()
    };
    if distinct(dataset.points.iter().map(|p| p.time).collect()) < 2 {
        return Err(CoolingError::FitConvergence(format!(
            "{} has fewer than 2 distinct times",
            dataset.label
        )));
    }
    if distinct(dataset.points.iter().map(|p| p.temperature).collect()) < 2 {
        return Err(CoolingError::FitConvergence(format!(
            "{} has a single distinct temperature",
            dataset.label
        )));
    }
    Ok(())
}

/// MINPACK-style orthogonality test between residuals and every Jacobian column.
fn gradient_vanishes(jtj: &nalgebra::Matrix2<f64>, jtr: &Vector2<f64>, chi2: f64) -> bool {
    (0..2).all(|j| {
        let denom = (jtj[(j, j)] * chi2).sqrt();
        denom > 0.0 && jtr[j].abs() / denom <= GTOL
    })
}

struct Problem {
    model: CoolingModel,
    times: Vec<f64>,
    observed: Vec<f64>,
    sigmas: Vec<f64>,
}

impl Problem {
    fn new(dataset: &Dataset, model: CoolingModel) -> Self {
        Self {
            model,
            times: dataset.points.iter().map(|p| p.time).collect(),
            observed: dataset.points.iter().map(|p| p.temperature).collect(),
            sigmas: dataset.points.iter().map(|p| p.weight_sigma()).collect(),
        }
    }

    /// Weighted residuals `(T_i - m_i) / σ_i`, or `None` if any is not finite.
    fn residuals(&self, p: &Vector2<f64>) -> Option<DVector<f64>> {
        let predicted = self.model.predict_many(&self.times, p[0], p[1]);
        let r = DVector::from_iterator(
            self.times.len(),
            (0..self.times.len()).map(|i| (self.observed[i] - predicted[i]) / self.sigmas[i]),
        );
        r.iter().all(|v| v.is_finite()).then_some(r)
    }

    /// `∂m_i/∂p_j / σ_i` by central differences.
    fn jacobian(&self, p: &Vector2<f64>) -> DMatrix<f64> {
        let n = self.times.len();
        let mut jac = DMatrix::<f64>::zeros(n, 2);
        for j in 0..2 {
            let h = FD_REL_STEP * p[j].abs().max(f64::EPSILON);
            let mut hi = *p;
            let mut lo = *p;
            hi[j] += h;
            lo[j] -= h;
            let m_hi = self.model.predict_many(&self.times, hi[0], hi[1]);
            let m_lo = self.model.predict_many(&self.times, lo[0], lo[1]);
            let width = hi[j] - lo[j];
            for i in 0..n {
                jac[(i, j)] = (m_hi[i] - m_lo[i]) / width / self.sigmas[i];
            }
        }
        jac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::measured_dataset;
    use crate::domain::{Environment, Material, MeasurementPoint};

    fn noiseless(ambient: f64, to: f64, k: f64) -> Dataset {
        let model = CoolingModel::new(ambient, 0.1).unwrap();
        let points = (0..=10)
            .map(|i| {
                let t = 200.0 * i as f64;
                MeasurementPoint::new(t, model.predict(t, to, k), 1.0, 1.0).unwrap()
            })
            .collect();
        Dataset::new("noiseless", points)
    }

    #[test]
    fn recovers_parameters_from_noiseless_data() {
        let ds = noiseless(20.0, 74.0, 0.000764);
        let start = PhysicalParameters::new(20.0, 70.0, 0.0009).unwrap();
        let fit = fit_dataset(&ds, &start, &FitOptions::default()).unwrap();
        assert!((fit.to_hat - 74.0).abs() / 74.0 < 0.01, "To={}", fit.to_hat);
        assert!((fit.k_hat - 0.000764).abs() / 0.000764 < 0.01, "k={}", fit.k_hat);
        assert!(fit.chi_square < 1e-6);
        assert_eq!(fit.dof, 9);
        let (s_to, s_k) = fit.std_errors();
        assert!(s_to > 0.0 && s_k > 0.0);
    }

    #[test]
    fn starting_at_truth_converges_immediately() {
        let ds = noiseless(20.0, 74.0, 0.000764);
        let start = PhysicalParameters::new(20.0, 74.0, 0.000764).unwrap();
        let fit = fit_dataset(&ds, &start, &FitOptions::default()).unwrap();
        assert_eq!(fit.to_hat, 74.0);
        assert_eq!(fit.k_hat, 0.000764);
    }

    #[test]
    fn constant_temperature_is_not_identifiable() {
        let points = (0..5)
            .map(|i| MeasurementPoint::new(100.0 * i as f64, 50.0, 1.0, 1.0).unwrap())
            .collect();
        let ds = Dataset::new("flat", points);
        let start = PhysicalParameters::new(20.0, 74.0, 0.000764).unwrap();
        let err = fit_dataset(&ds, &start, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, CoolingError::FitConvergence(_)));
    }

    #[test]
    fn single_time_is_not_identifiable() {
        let points = vec![
            MeasurementPoint::new(300.0, 60.0, 1.0, 1.0).unwrap(),
            MeasurementPoint::new(300.0, 58.0, 1.0, 1.0).unwrap(),
        ];
        let ds = Dataset::new("stacked", points);
        let start = PhysicalParameters::new(20.0, 74.0, 0.000764).unwrap();
        assert!(matches!(
            fit_dataset(&ds, &start, &FitOptions::default()),
            Err(CoolingError::FitConvergence(_))
        ));
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let ds = noiseless(20.0, 74.0, 0.000764);
        let start = PhysicalParameters::new(20.0, 60.0, 0.002).unwrap();
        let opts = FitOptions { max_iterations: 1, ..FitOptions::default() };
        assert!(matches!(
            fit_dataset(&ds, &start, &opts),
            Err(CoolingError::FitConvergence(_))
        ));
    }

    #[test]
    fn measured_room_plastic_fits_sensibly() {
        let ds = measured_dataset(Environment::Room, Material::Plastic).unwrap();
        let start = Environment::Room.reported_params().unwrap();
        let fit = fit_dataset(&ds, &start, &FitOptions::default()).unwrap();
        assert!(fit.k_hat > 3e-4 && fit.k_hat < 2e-3, "k={}", fit.k_hat);
        assert!((fit.to_hat - 74.0).abs() < 10.0, "To={}", fit.to_hat);
        assert_eq!(fit.dof, 8);
    }

    #[test]
    fn time_uncertainty_does_not_change_the_fit() {
        let ds = measured_dataset(Environment::Room, Material::Glass).unwrap();
        let mut wide = ds.clone();
        for p in &mut wide.points {
            p.sigma_time = 100.0;
        }
        let start = Environment::Room.reported_params().unwrap();
        let a = fit_dataset(&ds, &start, &FitOptions::default()).unwrap();
        let b = fit_dataset(&wide, &start, &FitOptions::default()).unwrap();
        assert_eq!(a, b);
    }
}
