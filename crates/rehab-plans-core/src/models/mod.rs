//! Domain models for the rehab plan store.

mod plan;
mod stats;

pub use plan::*;
pub use stats::*;
