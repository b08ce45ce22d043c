//! `newton-cooling` library crate.
//!
//! The binary (`cooling`) is a thin wrapper around this library so that:
//!
//! - the integrator, Monte Carlo estimator and fit engine are testable without
//!   spawning processes
//! - the numerical core can be reused without the CLI

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
