//! Common utilities for integration tests

#![allow(dead_code, unused_imports)]

pub mod mock_solvers;
pub mod test_helpers;
pub mod waveforms;

// Re-export commonly used items
pub use mock_solvers::{CancellingSolver, OhmicSolver};
pub use test_helpers::{
    cottrell_current,
    randles_sevcik_peak,
    relative_error,
};
pub use waveforms::{potential_step, sweep};
