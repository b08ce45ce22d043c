//! Command-line parsing for the cooling experiment.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numerical code. Handlers live in `app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{
    CheckpointGrid, CurveSpec, Environment, FitOptions, Material, MonteCarloConfig,
    PhysicalParameters,
};
use crate::error::CoolingError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cooling", version, about = "Newton's law of cooling: RK4, Monte Carlo and LM fits")]
pub struct Cli {
    /// Log verbosity (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "COOLING_LOG_LEVEL", default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synthesize a noisy measurement series with Monte Carlo time estimates.
    Simulate(SimulateArgs),
    /// Fit the measured datasets of one environment.
    Fit(FitArgs),
    /// Simulate with the reported room parameters, fit the series, then fit the room catalog.
    Run(RunArgs),
    /// Print the summary of a previously exported fit file.
    Show(ShowArgs),
}

/// Physical parameters and Monte Carlo settings of a synthesized series.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Ambient temperature Ta (°C).
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pub ambient: f64,

    /// Initial temperature To (°C).
    #[arg(long, default_value_t = 74.0)]
    pub initial: f64,

    /// Cooling constant k (1/s).
    #[arg(long, default_value_t = 0.000764)]
    pub rate: f64,

    #[command(flatten)]
    pub monte_carlo: MonteCarloArgs,

    /// Export the series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Monte Carlo knobs shared by `simulate` and `run`.
#[derive(Debug, Parser, Clone)]
pub struct MonteCarloArgs {
    /// Draws per checkpoint.
    #[arg(short = 'n', long, env = "COOLING_SAMPLES", default_value_t = 1000)]
    pub samples: usize,

    /// Temperature uncertainty of a draw (°C).
    #[arg(long, default_value_t = 2.0)]
    pub sigma_temperature: f64,

    /// Lower bound on the reported time uncertainty (s).
    #[arg(long, default_value_t = 30.0)]
    pub sigma_time_floor: f64,

    /// First temperature checkpoint (°C).
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub t_start: f64,

    /// Spacing between checkpoints (°C).
    #[arg(long, default_value_t = 5.0)]
    pub t_step: f64,

    /// Number of checkpoints.
    #[arg(long, default_value_t = 10)]
    pub points: usize,

    /// Random seed for the whole series.
    #[arg(long, env = "COOLING_SEED", default_value_t = 42)]
    pub seed: u64,
}

impl MonteCarloArgs {
    pub fn config(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            sample_count: self.samples,
            sigma_temperature: self.sigma_temperature,
            sigma_time_floor: self.sigma_time_floor,
        }
    }

    pub fn grid(&self) -> CheckpointGrid {
        CheckpointGrid {
            start: self.t_start,
            step: self.t_step,
            count: self.points,
        }
    }
}

/// Which catalog material(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MaterialChoice {
    Plastic,
    Ceramic,
    Glass,
    All,
}

impl MaterialChoice {
    pub fn materials(self) -> Vec<Material> {
        match self {
            MaterialChoice::Plastic => vec![Material::Plastic],
            MaterialChoice::Ceramic => vec![Material::Ceramic],
            MaterialChoice::Glass => vec![Material::Glass],
            MaterialChoice::All => Material::ALL.to_vec(),
        }
    }
}

/// Fit engine knobs shared by `fit` and `run`.
#[derive(Debug, Parser, Clone)]
pub struct FitEngineArgs {
    /// RK4 step of the forward model (s).
    #[arg(long, default_value_t = 0.1)]
    pub step: f64,

    /// Levenberg-Marquardt iteration cap.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// End of the resampled fit curve (s).
    #[arg(long, default_value_t = 3000.0)]
    pub curve_max: f64,

    /// Number of points of the resampled fit curve.
    #[arg(long, default_value_t = 101)]
    pub curve_points: usize,
}

impl FitEngineArgs {
    pub fn options(&self) -> FitOptions {
        FitOptions {
            step: self.step,
            max_iterations: self.max_iterations,
            ..FitOptions::default()
        }
    }

    pub fn curve(&self) -> CurveSpec {
        CurveSpec {
            t_max: self.curve_max,
            points: self.curve_points,
        }
    }
}

/// Options for fitting the measured datasets.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Where the samples cooled.
    #[arg(short = 'e', long, value_enum, default_value_t = Environment::Room)]
    pub environment: Environment,

    /// Material to fit.
    #[arg(short = 'm', long, value_enum, default_value_t = MaterialChoice::All)]
    pub material: MaterialChoice,

    #[command(flatten)]
    pub engine: FitEngineArgs,

    /// Print per-point residuals of every fit.
    #[arg(long)]
    pub residuals: bool,

    /// Export fits (parameters + curve grids) to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for the full experiment.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub monte_carlo: MonteCarloArgs,

    #[command(flatten)]
    pub engine: FitEngineArgs,

    /// Export the synthesized series to CSV.
    #[arg(long)]
    pub export_series: Option<PathBuf>,

    /// Export the catalog fits to JSON.
    #[arg(long)]
    pub export_fits: Option<PathBuf>,
}

/// Options for printing a saved fit file.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Fit JSON file produced by `cooling fit --export`.
    #[arg(long, value_name = "JSON")]
    pub fits: PathBuf,

    /// Also print per-point residuals.
    #[arg(long)]
    pub residuals: bool,
}

impl SimulateArgs {
    pub fn params(&self) -> Result<PhysicalParameters, CoolingError> {
        PhysicalParameters::new(self.ambient, self.initial, self.rate)
    }
}
