//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - runs the simulation and/or fits
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, FitArgs, RunArgs, ShowArgs, SimulateArgs};
use crate::domain::FitFile;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `cooling` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; flags and the process environment still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Fit(args) => handle_fit(args),
        Command::Run(args) => handle_run(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let params = args.params()?;
    let series = pipeline::run_simulation(
        &params,
        &args.monte_carlo.grid(),
        &args.monte_carlo.config(),
        args.monte_carlo.seed,
    )?;

    println!("{}", crate::report::format_series(&series));

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &series)?;
        info!(path = %path.display(), "series exported");
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let fit_file = pipeline::run_fits(
        args.environment,
        &args.material.materials(),
        &args.engine.options(),
        &args.engine.curve(),
    )?;

    println!("{}", crate::report::format_fit_summary(&fit_file));
    if args.residuals {
        print_residuals(&fit_file)?;
    }

    if let Some(path) = &args.export {
        crate::io::write_fit_json(path, &fit_file)?;
        info!(path = %path.display(), "fits exported");
    }
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let out = pipeline::run_experiment(
        &args.monte_carlo.grid(),
        &args.monte_carlo.config(),
        args.monte_carlo.seed,
        &args.engine.options(),
        &args.engine.curve(),
    )?;

    println!("{}", crate::report::format_series(&out.series));
    let (s_to, s_k) = out.series_fit.std_errors();
    println!(
        "Simulated series fit: To={:.3} ± {:.3}°C  k={:.4e} ± {:.1e}/s  chi2={:.3} (dof {})\n",
        out.series_fit.to_hat,
        s_to,
        out.series_fit.k_hat,
        s_k,
        out.series_fit.chi_square,
        out.series_fit.dof,
    );
    println!("{}", crate::report::format_fit_summary(&out.catalog));

    if let Some(path) = &args.export_series {
        crate::io::write_series_csv(path, &out.series)?;
    }
    if let Some(path) = &args.export_fits {
        crate::io::write_fit_json(path, &out.catalog)?;
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let fit_file = crate::io::read_fit_json(&args.fits)?;

    println!("{}", crate::report::format_fit_summary(&fit_file));
    if args.residuals {
        print_residuals(&fit_file)?;
    }
    Ok(())
}

fn print_residuals(fit_file: &FitFile) -> Result<(), AppError> {
    for mf in &fit_file.fits {
        let residuals =
            crate::report::compute_residuals(&mf.dataset, &mf.fit, fit_file.ambient, &fit_file.options)?;
        println!("{}", crate::report::format_residuals(&mf.dataset.label, &residuals));
    }
    Ok(())
}
