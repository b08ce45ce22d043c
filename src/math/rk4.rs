//! Fixed-step classical Runge-Kutta integration of `dy/dx = f(x, y)`.
//!
//! Only whole steps are taken: `n = floor((x_target - x0) / h)`. The remainder
//! interval `x0 + n·h .. x_target` is not integrated. The fit engine is
//! calibrated against exactly this discretization (with `h = 0.1`), so the
//! remainder must not be "fixed" here.

use crate::error::CoolingError;

/// Advance `y` by one RK4 step of size `h` from `x`.
#[inline]
pub fn rk4_step<F>(f: &F, x: f64, y: f64, h: f64) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let k1 = h * f(x, y);
    let k2 = h * f(x + 0.5 * h, y + 0.5 * k1);
    let k3 = h * f(x + 0.5 * h, y + 0.5 * k2);
    let k4 = h * f(x + h, y + k3);
    y + (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
}

/// Fixed-step RK4 integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rk4Integrator {
    step: f64,
}

impl Rk4Integrator {
    pub fn new(step: f64) -> Result<Self, CoolingError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(CoolingError::InvalidConfig(format!(
                "RK4 step must be finite and > 0, got {step}"
            )));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of whole steps between `x0` and `x_target` (zero when `x_target <= x0`).
    pub fn step_count(&self, x0: f64, x_target: f64) -> u64 {
        let n = ((x_target - x0) / self.step).floor();
        if n.is_finite() && n > 0.0 { n as u64 } else { 0 }
    }

    /// Integrate from `(x0, y0)` up to `x_target`.
    pub fn integrate<F>(&self, f: F, x0: f64, y0: f64, x_target: f64) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        let h = self.step;
        let mut x = x0;
        let mut y = y0;
        for _ in 0..self.step_count(x0, x_target) {
            y = rk4_step(&f, x, y, h);
            x += h;
        }
        y
    }

    /// Evaluate several targets in one forward sweep.
    ///
    /// Each output is bit-identical to a separate [`Rk4Integrator::integrate`]
    /// call for that target; targets may come in any order.
    pub fn integrate_many<F>(&self, f: F, x0: f64, y0: f64, targets: &[f64]) -> Vec<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        let counts: Vec<u64> = targets.iter().map(|&t| self.step_count(x0, t)).collect();
        let mut order: Vec<usize> = (0..targets.len()).collect();
        order.sort_by_key(|&i| counts[i]);

        let h = self.step;
        let mut out = vec![y0; targets.len()];
        let mut x = x0;
        let mut y = y0;
        let mut done = 0u64;
        for i in order {
            while done < counts[i] {
                y = rk4_step(&f, x, y, h);
                x += h;
                done += 1;
            }
            out[i] = y;
        }
        out
    }
}
