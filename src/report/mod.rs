//! Reporting utilities: residuals and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;

use crate::domain::{Dataset, FitOptions, FitResult, MeasurementPoint};
use crate::error::CoolingError;
use crate::models::CoolingModel;

/// A measured point against the fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResidual {
    pub point: MeasurementPoint,
    pub fitted: f64,
    pub residual: f64,
    /// `residual / σT`.
    pub pull: f64,
}

/// Compute fitted values and residuals for each point of a fitted dataset.
pub fn compute_residuals(
    dataset: &Dataset,
    fit: &FitResult,
    ambient: f64,
    opts: &FitOptions,
) -> Result<Vec<PointResidual>, CoolingError> {
    let model = CoolingModel::new(ambient, opts.step)?;
    let times: Vec<f64> = dataset.points.iter().map(|p| p.time).collect();
    let fitted = model.predict_many(&times, fit.to_hat, fit.k_hat);

    let mut out = Vec::with_capacity(dataset.len());
    for (p, y_fit) in dataset.points.iter().zip(fitted) {
        if !y_fit.is_finite() {
            return Err(CoolingError::FitConvergence(
                "non-finite model prediction during residual computation".into(),
            ));
        }
        let residual = p.temperature - y_fit;
        out.push(PointResidual {
            point: *p,
            fitted: y_fit,
            residual,
            pull: residual / p.weight_sigma(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_pulls_sum_to_chi_square() {
        let model = CoolingModel::new(20.0, 0.1).unwrap();
        let points = vec![
            MeasurementPoint::new(0.0, 75.0, 1.0, 2.0).unwrap(),
            MeasurementPoint::new(500.0, model.predict(500.0, 74.0, 0.001) - 1.0, 1.0, 0.5).unwrap(),
        ];
        let ds = Dataset::new("two", points);
        let fit = FitResult {
            to_hat: 74.0,
            k_hat: 0.001,
            covariance: [[0.0; 2]; 2],
            chi_square: 0.0,
            dof: 0,
            iterations: 0,
        };
        let res = compute_residuals(&ds, &fit, 20.0, &FitOptions::default()).unwrap();
        assert!((res[0].residual - 1.0).abs() < 1e-12);
        assert!((res[0].pull - 0.5).abs() < 1e-12);
        assert!((res[1].pull + 2.0).abs() < 1e-9);
        let chi2: f64 = res.iter().map(|r| r.pull * r.pull).sum();
        assert!((chi2 - 4.25).abs() < 1e-8);
    }
}
