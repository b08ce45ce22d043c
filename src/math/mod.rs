//! Mathematical utilities: the cooling law, RK4, running statistics and the
//! small linear algebra behind the least-squares step.

pub mod cooling;
pub mod ols;
pub mod rk4;
pub mod stats;

pub use cooling::*;
pub use ols::*;
pub use rk4::*;
pub use stats::*;
