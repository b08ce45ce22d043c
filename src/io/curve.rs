//! Read/write fit JSON files.
//!
//! A fit file is the portable representation of one environment's fits:
//! - fitted `(To, k)`, covariance and χ² per material
//! - the measured dataset each fit was made on
//! - a precomputed curve grid for quick plotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Local;

use crate::domain::{Environment, FitFile, FitOptions, MaterialFit};
use crate::error::AppError;

/// Assemble a fit file stamped with the current local time.
pub fn build_fit_file(env: Environment, options: &FitOptions, fits: Vec<MaterialFit>) -> FitFile {
    FitFile {
        tool: "cooling".to_string(),
        generated_at: Local::now(),
        environment: env,
        ambient: env.ambient(),
        options: *options,
        fits,
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit_file: &FitFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), fit_file)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit_file: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveSpec, Material};
    use crate::fit::fit_environment;

    #[test]
    fn fit_file_round_trips() {
        let opts = FitOptions::default();
        let fits = fit_environment(
            Environment::Room,
            &[Material::Ceramic],
            &opts,
            &CurveSpec { t_max: 2500.0, points: 11 },
        )
        .unwrap();
        let written = build_fit_file(Environment::Room, &opts, fits);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fits.json");
        write_fit_json(&path, &written).unwrap();
        let read = read_fit_json(&path).unwrap();

        assert_eq!(read.environment, Environment::Room);
        assert_eq!(read.ambient, 20.0);
        assert_eq!(read.fits.len(), 1);
        let (a, b) = (&written.fits[0].fit, &read.fits[0].fit);
        assert!((a.to_hat - b.to_hat).abs() <= 1e-12 * a.to_hat.abs());
        assert!((a.k_hat - b.k_hat).abs() <= 1e-12 * a.k_hat.abs());
        assert_eq!(read.fits[0].curve.time.len(), 11);
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_fit_json(Path::new("/nonexistent/fits.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
