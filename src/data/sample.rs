//! Simulated measurement series over a grid of temperature checkpoints.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::data::montecarlo::estimate_time;
use crate::domain::{
    CheckpointGrid, MeasurementPoint, MonteCarloConfig, PhysicalParameters, SyntheticPoint,
    SyntheticSeries,
};
use crate::error::CoolingError;
use crate::math::time_for_temperature;

/// Synthesize one noisy time measurement per checkpoint.
///
/// A single RNG seeded from `seed` is shared across the checkpoints in grid
/// order, so the whole series is reproducible from `(params, grid, config, seed)`.
pub fn synthesize_series(
    params: &PhysicalParameters,
    grid: &CheckpointGrid,
    config: &MonteCarloConfig,
    seed: u64,
) -> Result<SyntheticSeries, CoolingError> {
    if grid.count == 0 {
        return Err(CoolingError::InvalidConfig("checkpoint count must be > 0".into()));
    }
    if !(grid.start.is_finite() && grid.step.is_finite()) {
        return Err(CoolingError::InvalidConfig("checkpoint grid must be finite".into()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(grid.count);
    let mut rejected_total = 0usize;

    for temperature in grid.temperatures() {
        let nominal_time = time_for_temperature(temperature, params)?;
        let mc = estimate_time(
            temperature,
            params,
            config.sigma_temperature,
            config.sample_count,
            config.sigma_time_floor,
            &mut rng,
        )?;
        rejected_total += mc.rejected;
        debug!(
            temperature,
            nominal_time,
            mean_time = mc.mean_time,
            time_uncertainty = mc.time_uncertainty,
            "checkpoint synthesized"
        );

        let point = MeasurementPoint::new(
            mc.mean_time,
            temperature,
            mc.time_uncertainty,
            config.sigma_temperature,
        )?;
        points.push(SyntheticPoint {
            point,
            nominal_time,
            monte_carlo: mc,
        });
    }

    if rejected_total > 0 {
        warn!(rejected_total, "Monte Carlo draws crossed the ambient temperature and were discarded");
    }
    info!(points = points.len(), seed, "synthesized series");

    Ok(SyntheticSeries {
        params: *params,
        config: *config,
        seed,
        points,
    })
}
