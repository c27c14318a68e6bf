//! Simulation scenario definition
//!
//! A scenario combines an experiment with the waveform applied to it.
use crate::models::Experiment;
use crate::physics::Waveform;
use crate::ConfigurationError;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Experiment (cell, solution, kinetics)
/// - Waveform (applied potential over time)
///
/// # Design
///
/// The same scenario can be solved with different configurations.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust
/// use echem_rs::models::Experiment;
/// use echem_rs::physics::Waveform;
/// use echem_rs::solver::Scenario;
///
/// let waveform = Waveform::new(vec![0.0, 0.1, 0.2, 0.3], vec![0.5; 4]).unwrap();
/// let scenario = Scenario::new(Experiment::default(), waveform);
///
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.time_steps(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Cell, solution and kinetics
    pub experiment: Experiment,

    /// Applied potential
    pub waveform: Waveform,
}

impl Scenario {
    /// Create a scenario
    pub fn new(experiment: Experiment, waveform: Waveform) -> Self {
        Self {
            experiment,
            waveform,
        }
    }

    /// Verifying scenario content
    ///
    /// The waveform is valid by construction, so this checks the experiment.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.experiment.validate()
    }

    /// nT
    pub fn time_steps(&self) -> usize {
        self.waveform.len()
    }

    /// Diffusion layer thickness δ = √(D_R·t_total) \[cm\]
    pub fn diffusion_layer_thickness(&self) -> f64 {
        (self.experiment.diffusion_reduced * self.waveform.duration()).sqrt()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
