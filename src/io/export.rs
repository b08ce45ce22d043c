//! Export a simulated series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::SyntheticSeries;
use crate::error::AppError;

/// Write one row per checkpoint.
pub fn write_series_csv(path: &Path, series: &SyntheticSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(
        out,
        "temperature_c,time_s,sigma_time_s,sigma_temperature_c,nominal_time_s,draws_used,draws_rejected"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write series CSV header: {e}")))?;

    for sp in &series.points {
        let p = &sp.point;
        writeln!(
            out,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{},{}",
            p.temperature,
            p.time,
            p.sigma_time,
            p.sigma_temperature,
            sp.nominal_time,
            sp.monte_carlo.sample_count,
            sp.monte_carlo.rejected,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write series CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series CSV: {e}")))?;
    Ok(())
}
