//! Error types.
//!
//! Two layers:
//!
//! - [`CoolingError`]: typed failures of the numerical core (integrator,
//!   inverse, Monte Carlo, fit engine). Callers can match on the kind.
//! - [`AppError`]: what the binary reports, carrying a process exit code.
//!
//! Every `CoolingError` converts into an `AppError` so pipeline code can use `?`.

use thiserror::Error;

/// Failures raised by the numerical core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoolingError {
    /// The log argument of the analytic inverse is zero, negative or not finite
    /// (the temperature reached or crossed the ambient temperature).
    #[error("domain error: {0}")]
    Domain(String),

    /// Physical parameters violate `k > 0` or `To > Ta`.
    #[error("invalid physical parameters: {0}")]
    InvalidParameters(String),

    /// A measurement point carries a negative or non-finite value.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Numerical configuration is unusable (step size, sample count, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The minimizer did not reach a trustworthy stationary point.
    #[error("fit did not converge: {0}")]
    FitConvergence(String),
}

impl CoolingError {
    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            CoolingError::InvalidParameters(_)
            | CoolingError::InvalidMeasurement(_)
            | CoolingError::InvalidConfig(_) => 2,
            CoolingError::Domain(_) => 3,
            CoolingError::FitConvergence(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CoolingError> for AppError {
    fn from(err: CoolingError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
