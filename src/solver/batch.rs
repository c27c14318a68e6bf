//! Batches of independent runs
//!
//! Multi-scan-rate studies, sampled-current voltammetry and parameter sweeps
//! all boil down to solving many scenarios that share nothing. Each run owns
//! its concentration layers, so runs can be executed in any order and, with
//! the `parallel` feature, on Rayon's thread pool. Results always come back
//! in input order.
//!
//! # Cancellation
//!
//! A [`CancellationToken`] is checked before each run starts. Runs already
//! in progress finish normally; every run that had not started reports
//! [`SimulationError::Cancelled`].
//!
//! # Example
//!
//! ```rust
//! use echem_rs::models::Experiment;
//! use echem_rs::physics::Waveform;
//! use echem_rs::solver::{BatchRunner, ExplicitSolver, SolverConfiguration};
//!
//! let waveforms: Vec<Waveform> = [0.1, 0.3, 0.5]
//!     .iter()
//!     .map(|&e| {
//!         let time = (0..50).map(|k| k as f64 * 0.02).collect();
//!         Waveform::new(time, vec![e; 50]).unwrap()
//!     })
//!     .collect();
//!
//! let runner = BatchRunner::new(ExplicitSolver::new(), SolverConfiguration::default());
//! let outcome = runner.run_waveforms(&Experiment::default(), waveforms);
//!
//! assert_eq!(outcome.len(), 3);
//! assert_eq!(outcome.completed(), 3);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::Experiment;
use crate::physics::Waveform;
use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration};
use crate::SimulationError;

// =================================================================================================
// Cancellation
// =================================================================================================

/// Shared flag that stops a batch between runs
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every run that has not started yet
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

// =================================================================================================
// Batch Runner
// =================================================================================================

/// Runs many scenarios with one solver and one configuration
pub struct BatchRunner<S: Solver> {
    solver: S,
    config: SolverConfiguration,
    token: CancellationToken,
}

impl<S: Solver> BatchRunner<S> {
    pub fn new(solver: S, config: SolverConfiguration) -> Self {
        Self {
            solver,
            config,
            token: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Token controlling this runner
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Solve every scenario, results in input order
    pub fn run(&self, scenarios: &[Scenario]) -> BatchOutcome {
        log::info!(
            "batch of {} runs with {}",
            scenarios.len(),
            self.solver.name()
        );

        #[cfg(feature = "parallel")]
        let results: Vec<_> = scenarios
            .par_iter()
            .enumerate()
            .map(|(index, scenario)| self.run_one(index, scenario))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = scenarios
            .iter()
            .enumerate()
            .map(|(index, scenario)| self.run_one(index, scenario))
            .collect();

        let outcome = BatchOutcome { results };
        let cancelled = outcome.cancelled();
        if cancelled > 0 {
            log::warn!("batch cancelled: {} of {} runs skipped", cancelled, outcome.len());
        }
        outcome
    }

    /// Solve one experiment under each waveform
    pub fn run_waveforms(&self, experiment: &Experiment, waveforms: Vec<Waveform>) -> BatchOutcome {
        let scenarios: Vec<Scenario> = waveforms
            .into_iter()
            .map(|waveform| Scenario::new(experiment.clone(), waveform))
            .collect();
        self.run(&scenarios)
    }

    fn run_one(&self, index: usize, scenario: &Scenario) -> Result<SimulationResult, SimulationError> {
        if self.token.is_cancelled() {
            return Err(SimulationError::Cancelled { index });
        }
        let result = self.solver.solve(scenario, &self.config);
        if let Err(err) = &result {
            log::debug!("run {} failed: {}", index, err);
        }
        result
    }
}

// =================================================================================================
// Batch Outcome
// =================================================================================================

/// Per-run results of a batch, in input order
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<Result<SimulationResult, SimulationError>>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of successful runs
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of runs skipped by cancellation
    pub fn cancelled(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Err(SimulationError::Cancelled { .. })))
            .count()
    }

    /// All results, or the first error in input order
    pub fn into_results(self) -> Result<Vec<SimulationResult>, SimulationError> {
        self.results.into_iter().collect()
    }

    /// Largest current of each run \[A\], `None` for failed runs
    pub fn peak_currents(&self) -> Vec<Option<f64>> {
        self.results
            .iter()
            .map(|r| r.as_ref().ok().map(|result| result.peak_current().1))
            .collect()
    }

    /// Current of each run at the sample closest to `sample_time` \[A\]
    ///
    /// This is how a sampled-current voltammogram is assembled from a batch
    /// of potential steps.
    pub fn sampled_currents(&self, sample_time: f64) -> Vec<Option<f64>> {
        self.results
            .iter()
            .map(|r| r.as_ref().ok().map(|result| result.current_at_time(sample_time)))
            .collect()
    }

    /// Currents as an nT × runs matrix
    ///
    /// `None` unless every run succeeded with the same number of samples.
    pub fn current_matrix(&self) -> Option<DMatrix<f64>> {
        let results: Vec<&SimulationResult> = self.results.iter().map(|r| r.as_ref().ok()).collect::<Option<_>>()?;
        let rows = results.first()?.len();
        if results.iter().any(|result| result.len() != rows) {
            return None;
        }
        Some(DMatrix::from_fn(rows, results.len(), |k, run| results[run].current[k]))
    }
}
