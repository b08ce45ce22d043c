//! Monte Carlo propagation of temperature noise into a time estimate.
//!
//! Each draw samples a temperature from `N(target, σ_T)`, maps it through the
//! analytic inverse, and feeds the resulting time into a running accumulator.
//! Draws that land at or past the ambient temperature have no inverse and are
//! discarded (they do not fail the estimate).

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::domain::{MonteCarloResult, PhysicalParameters};
use crate::error::CoolingError;
use crate::math::{RunningStats, time_for_temperature};

/// Estimate the time to reach `target` and its uncertainty.
///
/// Policy on the aggregated statistics:
/// - a negative mean time is clamped to `0`
/// - an RMS that does not exceed `time_floor` is replaced by `time_floor`
pub fn estimate_time<R: Rng + ?Sized>(
    target: f64,
    params: &PhysicalParameters,
    sigma_temperature: f64,
    sample_count: usize,
    time_floor: f64,
    rng: &mut R,
) -> Result<MonteCarloResult, CoolingError> {
    if sample_count == 0 {
        return Err(CoolingError::InvalidConfig("Monte Carlo sample count must be > 0".into()));
    }
    if !(time_floor.is_finite() && time_floor >= 0.0) {
        return Err(CoolingError::InvalidConfig(format!(
            "time uncertainty floor must be finite and >= 0, got {time_floor}"
        )));
    }
    let normal = Normal::new(target, sigma_temperature)
        .map_err(|e| CoolingError::InvalidConfig(format!("temperature noise distribution: {e}")))?;

    let mut stats = RunningStats::new();
    let mut rejected = 0usize;
    for _ in 0..sample_count {
        let draw = normal.sample(&mut *rng);
        match time_for_temperature(draw, params) {
            Ok(t) => stats.push(t),
            Err(_) => rejected += 1,
        }
    }

    let (Some(mean), Some(rms)) = (stats.mean(), stats.rms()) else {
        return Err(CoolingError::Domain(format!(
            "all {sample_count} draws around T={target} crossed ambient Ta={}",
            params.ambient()
        )));
    };

    Ok(MonteCarloResult {
        mean_time: mean.max(0.0),
        time_uncertainty: if rms > time_floor { rms } else { time_floor },
        sample_count: stats.count(),
        rejected,
    })
}
