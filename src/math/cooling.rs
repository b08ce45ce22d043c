//! Newton's law of cooling: `dT/dt = -k (T - Ta)`.
//!
//! - [`CoolingDerivative`] is the right-hand side fed to the RK4 integrator.
//! - [`temperature_at`] is the closed-form trajectory.
//! - [`time_for_temperature`] inverts the closed form:
//!   `t = -ln((T - Ta) / (To - Ta)) / k`.

use crate::domain::PhysicalParameters;
use crate::error::CoolingError;

/// Right-hand side of the cooling law for a fixed ambient and rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingDerivative {
    pub ambient: f64,
    pub rate: f64,
}

impl CoolingDerivative {
    pub fn new(ambient: f64, rate: f64) -> Self {
        Self { ambient, rate }
    }

    /// `dT/dt` at temperature `temp`; the law does not depend on `t`.
    #[inline]
    pub fn eval(&self, _t: f64, temp: f64) -> f64 {
        -self.rate * (temp - self.ambient)
    }
}

impl From<&PhysicalParameters> for CoolingDerivative {
    fn from(params: &PhysicalParameters) -> Self {
        Self::new(params.ambient(), params.rate())
    }
}

/// Closed-form temperature `Ta + (To - Ta) e^{-k t}`.
pub fn temperature_at(t: f64, params: &PhysicalParameters) -> f64 {
    params.ambient() + (params.initial() - params.ambient()) * (-params.rate() * t).exp()
}

/// Time at which the closed-form trajectory reaches `temp`.
///
/// Temperatures above `To` give negative times. Fails with
/// [`CoolingError::Domain`] when `temp` is at or past the ambient temperature.
pub fn time_for_temperature(temp: f64, params: &PhysicalParameters) -> Result<f64, CoolingError> {
    let ratio = (temp - params.ambient()) / (params.initial() - params.ambient());
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(CoolingError::Domain(format!(
            "T={temp} is not above ambient Ta={} (log argument {ratio})",
            params.ambient()
        )));
    }
    Ok(-ratio.ln() / params.rate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PhysicalParameters {
        PhysicalParameters::new(20.0, 74.0, 0.000764).unwrap()
    }

    #[test]
    fn inverse_round_trips_closed_form() {
        let p = params();
        for &t in &[0.0, 1.0, 61.0, 500.0, 2000.0, 5000.0] {
            let back = time_for_temperature(temperature_at(t, &p), &p).unwrap();
            assert!((back - t).abs() < 1e-6 * t.max(1.0), "t={t}, back={back}");
        }
    }

    #[test]
    fn initial_temperature_maps_to_zero_time() {
        let p = params();
        assert_eq!(time_for_temperature(74.0, &p).unwrap(), 0.0);
    }

    #[test]
    fn above_initial_gives_negative_time() {
        let t = time_for_temperature(75.0, &params()).unwrap();
        assert!(t < 0.0);
    }

    #[test]
    fn ambient_or_below_is_domain_error() {
        let p = params();
        assert!(matches!(time_for_temperature(20.0, &p), Err(CoolingError::Domain(_))));
        assert!(matches!(time_for_temperature(15.0, &p), Err(CoolingError::Domain(_))));
    }

    #[test]
    fn derivative_points_toward_ambient() {
        let d = CoolingDerivative::from(&params());
        assert!(d.eval(0.0, 74.0) < 0.0);
        assert_eq!(d.eval(0.0, 20.0), 0.0);
        assert!(d.eval(0.0, 10.0) > 0.0);
    }
}
