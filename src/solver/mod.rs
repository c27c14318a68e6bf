//! Numerical solver
//!
//! This module turns a scenario (experiment + waveform) into currents and
//! concentration profiles with the explicit finite-difference method.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Experiment (cell, solution, kinetics)
//!    - Waveform (applied potential)
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Stability ratio λ
//!    - Profile history to keep
//!    - Divergence safeguard and progress interval
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - `ExplicitSolver`: forward-time centred-space scheme
//!
//! # Module Organization
//!
//! - **`grid`**: normalized space-time discretization (`Grid`)
//! - **`stepper`**: one FTCS step for both species (`DiffusionStepper`)
//! - **`driver`**: the full run, denormalization and the double layer (`ExplicitSolver`)
//! - **`result`**: physical-unit output (`SimulationResult`)
//! - **`batch`**: independent runs over many scenarios (`BatchRunner`)
//! - **`traits`**: `Solver`, `SolverConfiguration`, `ProfileHistory`, `StepProgress`
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  Experiment  │   │   Waveform   │
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!        ┌────────▼────────┐
//!        │    Scenario     │ ← WHAT to solve
//!        └────────┬────────┘
//!        ┌────────▼─────────────┐
//!        │ Solver Configuration │ ← HOW to solve
//!        └────────┬─────────────┘
//!        ┌────────▼────────┐
//!        │ Grid → Stepper  │ ← The method
//!        │   (× nT steps)  │
//!        └────────┬────────┘
//!        ┌────────▼──────────┐
//!        │ Simulation Result │ ← i(t), x, c_R(x,t), c_O(x,t)
//!        └───────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use echem_rs::models::{Experiment, Kinetics};
//! use echem_rs::physics::Waveform;
//! use echem_rs::solver::{ExplicitSolver, Scenario, Solver, SolverConfiguration};
//!
//! // Linear sweep from −0.3 V to 0.3 V at 0.1 V/s
//! let samples = 300;
//! let time: Vec<f64> = (0..samples).map(|k| 6.0 * k as f64 / (samples - 1) as f64).collect();
//! let potential: Vec<f64> = time.iter().map(|t| -0.3 + 0.1 * t).collect();
//! let waveform = Waveform::new(time, potential)?;
//!
//! let experiment = Experiment::default().with_kinetics(Kinetics::butler_volmer(1e-2, 0.5));
//! let scenario = Scenario::new(experiment, waveform);
//!
//! let result = ExplicitSolver::new().solve(&scenario, &SolverConfiguration::default())?;
//! println!("peak current: {:e} A at {} V", result.peak_current().1, result.peak_potential());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error Handling
//!
//! Solvers return `Result<SimulationResult, SimulationError>`:
//!
//! - configuration problems (stability ratio, kinetics parameters, missing
//!   bulk species, too coarse a grid) are rejected before anything is
//!   allocated
//! - numerical divergence aborts the run with the offending step, species
//!   and node

// =================================================================================================
// Module Declarations
// =================================================================================================
mod batch;
mod driver;
mod grid;
mod result;
mod scenario;
mod stepper;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Profiles shorter than the threshold are stepped sequentially: for a few
// hundred nodes Rayon's dispatch costs more than the stencil itself.
//
// The threshold lives in an AtomicUsize so benchmarks and tests can change it
// at runtime. Relaxed ordering is enough, the value is a performance hint and
// both code paths give identical results.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of distance nodes above which the stencil runs in parallel
const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// [`apply_stencil`] updates profiles with at most this many nodes
/// sequentially, and switches to Rayon above it, but only when the crate is
/// compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use echem_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use echem_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(8192);
/// assert_eq!(parallel_threshold(), 8192);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use batch::{BatchOutcome, BatchRunner, CancellationToken};
pub use driver::ExplicitSolver;
pub use grid::{Grid, DEFAULT_STABILITY_RATIO, DISTANCE_EXTENT};
pub use result::SimulationResult;
pub use scenario::Scenario;
pub use stepper::{apply_stencil, DiffusionStepper};
pub use traits::{ProfileHistory, Solver, SolverConfiguration, StepProgress};

// =================================================================================================
// Tests
// =================================================================================================
