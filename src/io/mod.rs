//! Input/output helpers.
//!
//! - simulated series export (CSV) (`export`)
//! - fit JSON read/write (`curve`)

pub mod curve;
pub mod export;

pub use curve::*;
pub use export::*;
