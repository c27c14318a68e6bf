//! Solver trait and configuration types
//!
//! # Design Philosophy
//!
//! - `Scenario` says WHAT to simulate (experiment + waveform)
//! - `SolverConfiguration` says HOW (stability ratio, history, safeguards)
//! - `Solver` is the method, independent of both
//!
//! Any number of solvers can run the same scenario, and one solver can run
//! any number of scenarios, concurrently if needed: solvers are `Send + Sync`
//! and never keep state between runs.

use std::fmt;

use crate::solver::grid::DEFAULT_STABILITY_RATIO;
use crate::solver::{Scenario, SimulationResult};
use crate::{ConfigurationError, SimulationError};

// =================================================================================================
// Profile History
// =================================================================================================

/// Which concentration layers are copied into the result
///
/// During the run only two layers are alive. This setting only controls how
/// many of them the caller gets back.
///
/// # Examples
///
/// ```rust
/// use echem_rs::solver::ProfileHistory;
///
/// assert_eq!(ProfileHistory::Full.recorded_steps(4), vec![0, 1, 2, 3]);
/// assert_eq!(ProfileHistory::Every(2).recorded_steps(6), vec![0, 2, 4, 5]);
/// assert_eq!(ProfileHistory::FinalOnly.recorded_steps(6), vec![5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileHistory {
    /// Every time layer (nX × nT matrices)
    #[default]
    Full,

    /// Every n-th layer, plus the last one
    Every(usize),

    /// Only the last layer
    FinalOnly,
}

impl ProfileHistory {
    /// True if layer `step` of a run with `total` layers is recorded
    pub fn records(&self, step: usize, total: usize) -> bool {
        let last = step + 1 == total;
        match self {
            ProfileHistory::Full => true,
            ProfileHistory::Every(stride) => last || step % (*stride).max(1) == 0,
            ProfileHistory::FinalOnly => last,
        }
    }

    /// Indices of recorded layers, in increasing order
    pub fn recorded_steps(&self, total: usize) -> Vec<usize> {
        (0..total).filter(|&step| self.records(step, total)).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            ProfileHistory::Every(0) => Err(ConfigurationError::InvalidParameter {
                name: "profile_history stride",
                value: 0.0,
                reason: "stride must be at least 1",
            }),
            _ => Ok(()),
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Numerical settings of a run
///
/// # Examples
///
/// ```rust
/// use echem_rs::solver::{ProfileHistory, SolverConfiguration};
///
/// let config = SolverConfiguration::default()
///     .with_profile_history(ProfileHistory::FinalOnly)
///     .with_progress_interval(500);
///
/// config.validate().unwrap();
/// assert_eq!(config.stability_ratio, 0.45);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfiguration {
    /// λ = dT/dX², in (0, 0.5)
    pub stability_ratio: f64,

    /// Layers kept in the result
    pub profile_history: ProfileHistory,

    /// A concentration larger than this multiple of the largest normalized
    /// bulk value (scaled by the diffusion ratio) aborts the run
    pub divergence_factor: f64,

    /// Steps between two progress reports
    pub progress_interval: usize,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            stability_ratio: DEFAULT_STABILITY_RATIO,
            profile_history: ProfileHistory::Full,
            divergence_factor: 10.0,
            progress_interval: 1000,
        }
    }
}

impl SolverConfiguration {
    /// Default configuration with another stability ratio
    pub fn with_stability_ratio(mut self, stability_ratio: f64) -> Self {
        self.stability_ratio = stability_ratio;
        self
    }

    pub fn with_profile_history(mut self, profile_history: ProfileHistory) -> Self {
        self.profile_history = profile_history;
        self
    }

    pub fn with_divergence_factor(mut self, divergence_factor: f64) -> Self {
        self.divergence_factor = divergence_factor;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::StabilityRatio`] unless 0 < λ < 0.5
    /// - [`ConfigurationError::InvalidParameter`] for a divergence factor
    ///   not above 1, a zero progress interval or a zero history stride
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.stability_ratio > 0.0 && self.stability_ratio < 0.5) {
            return Err(ConfigurationError::StabilityRatio(self.stability_ratio));
        }
        if !(self.divergence_factor > 1.0) {
            return Err(ConfigurationError::InvalidParameter {
                name: "divergence_factor",
                value: self.divergence_factor,
                reason: "must be greater than 1",
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "progress_interval",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        self.profile_history.validate()
    }
}

// =================================================================================================
// Progress reporting
// =================================================================================================

/// Progress of a running simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    /// Last completed time step
    pub step: usize,
    /// Index of the final time step (nT − 1)
    pub total: usize,
}

impl StepProgress {
    /// Completed fraction in \[0, 1\]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 1.0 } else { self.step as f64 / self.total as f64 }
    }

    pub fn is_complete(&self) -> bool {
        self.step >= self.total
    }
}

impl fmt::Display for StepProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} steps complete", self.step, self.total)
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method turning a scenario into a simulation result
///
/// Implementors provide [`Solver::solve_with_progress`]; [`Solver::solve`]
/// is the same run without observer.
pub trait Solver: Send + Sync {
    /// Run the scenario, reporting progress along the way
    ///
    /// The callback is purely an observer: results are identical whether or
    /// not it does anything.
    fn solve_with_progress(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
        progress: &mut dyn FnMut(StepProgress),
    ) -> Result<SimulationResult, SimulationError>;

    /// Run the scenario
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult, SimulationError> {
        self.solve_with_progress(scenario, config, &mut |_| {})
    }

    /// Human-readable name, stored in result metadata
    fn name(&self) -> &str;
}
