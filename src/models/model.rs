//! Forward model of the fit: the RK4 trajectory of the cooling law.
//!
//! `model(t; To, k) = RK4(f = -k (T - Ta), x0 = 0, y0 = To, h, x_target = t)`
//!
//! The fitter relies on two primitive operations:
//! - predict the temperature at a batch of times for given `(To, k)`
//! - resample the fitted curve densely for overlays

use crate::domain::{CurveGrid, CurveSpec};
use crate::error::CoolingError;
use crate::math::{CoolingDerivative, Rk4Integrator};

/// RK4 forward model with `Ta` held fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingModel {
    ambient: f64,
    integrator: Rk4Integrator,
}

impl CoolingModel {
    pub fn new(ambient: f64, step: f64) -> Result<Self, CoolingError> {
        if !ambient.is_finite() {
            return Err(CoolingError::InvalidConfig(format!(
                "ambient temperature must be finite, got {ambient}"
            )));
        }
        Ok(Self {
            ambient,
            integrator: Rk4Integrator::new(step)?,
        })
    }

    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    /// Temperature at a single time.
    pub fn predict(&self, t: f64, initial: f64, rate: f64) -> f64 {
        let f = CoolingDerivative::new(self.ambient, rate);
        self.integrator.integrate(|x, y| f.eval(x, y), 0.0, initial, t)
    }

    /// Temperatures at many times (single RK4 sweep).
    pub fn predict_many(&self, times: &[f64], initial: f64, rate: f64) -> Vec<f64> {
        let f = CoolingDerivative::new(self.ambient, rate);
        self.integrator
            .integrate_many(|x, y| f.eval(x, y), 0.0, initial, times)
    }

    /// Evenly spaced samples of the model over `[0, spec.t_max]`.
    pub fn sample_curve(&self, initial: f64, rate: f64, spec: &CurveSpec) -> CurveGrid {
        let n = spec.points.max(2);
        let t_max = if spec.t_max.is_finite() && spec.t_max > 0.0 {
            spec.t_max
        } else {
            CurveSpec::default().t_max
        };
        let time: Vec<f64> = (0..n)
            .map(|i| t_max * i as f64 / (n as f64 - 1.0))
            .collect();
        let temperature = self.predict_many(&time, initial, rate);
        CurveGrid { time, temperature }
    }
}
