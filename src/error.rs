//! Error types
//!
//! Two layers of failure are distinguished:
//!
//! - [`ConfigurationError`]: something about the inputs is wrong. These are
//!   raised by the various `validate()` methods, always before any
//!   concentration grid is allocated.
//! - [`SimulationError`]: anything that stops a run. Configuration errors
//!   convert into it through `?`, and the time-marching loop adds numerical
//!   divergence. Batch runs add cancellation.
//!
//! No error is recovered inside the crate. Retrying with other parameters is
//! the caller's decision.

use thiserror::Error;

use crate::physics::Species;

/// Invalid input detected before a run starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Waveform has fewer samples than the stencil needs
    #[error("waveform must contain at least {minimum} samples, got {actual}")]
    WaveformTooShort { minimum: usize, actual: usize },

    /// Time and potential arrays differ in length
    #[error("time and potential arrays differ in length ({time} vs {potential})")]
    LengthMismatch { time: usize, potential: usize },

    /// Time samples must strictly increase
    #[error("time must be strictly increasing (sample {index}: {previous} -> {current})")]
    NonIncreasingTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// NaN or infinite waveform sample
    #[error("non-finite {quantity} sample at index {index}")]
    NonFiniteSample { quantity: &'static str, index: usize },

    /// Unevenly sampled waveform given to a solver that needs a fixed dT
    #[error(
        "waveform time step at sample {index} is {step} s, expected {expected} s \
         (the explicit solver needs evenly spaced samples)"
    )]
    NonUniformWaveform { index: usize, step: f64, expected: f64 },

    /// Stability ratio outside (0, 0.5)
    #[error("stability ratio must lie in (0, 0.5) for the explicit stencil, got {0}")]
    StabilityRatio(f64),

    /// Grid has no interior node
    #[error("grid needs at least 3 distance nodes, got {distance_steps} (time steps: {time_steps})")]
    GridTooCoarse {
        distance_steps: usize,
        time_steps: usize,
    },

    /// Neither species has a positive bulk concentration
    #[error("at least one bulk concentration must be strictly positive")]
    NoBulkSpecies,

    /// Generic out-of-range parameter
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Rate-based kinetics without a usable rate constant
    #[error("{policy} kinetics requires a positive finite rate constant, got {value}")]
    RateConstant { policy: &'static str, value: f64 },

    /// Transfer coefficient outside (0, 1)
    #[error("{policy} kinetics requires a transfer coefficient in (0, 1), got {value}")]
    TransferCoefficient { policy: &'static str, value: f64 },

    /// Only one of capacitance and resistance was given
    #[error(
        "double-layer circuit needs both capacitance and resistance \
         (capacitance = {capacitance}, resistance = {resistance})"
    )]
    IncompleteCircuit { capacitance: f64, resistance: f64 },
}

/// Failure of a simulation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Rejected configuration
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A concentration left its physically sane range
    #[error(
        "numerical divergence at step {step}: {species} concentration at node {node} is {value} \
         (check stability ratio and diffusion coefficient ratio)"
    )]
    Divergence {
        step: usize,
        species: Species,
        node: usize,
        value: f64,
    },

    /// Batch run skipped after cancellation
    #[error("run {index} was cancelled before it started")]
    Cancelled { index: usize },
}

impl SimulationError {
    /// Step index at which a divergence was detected
    pub fn divergence_step(&self) -> Option<usize> {
        match self {
            SimulationError::Divergence { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// True for errors raised before any computation
    pub fn is_configuration(&self) -> bool {
        matches!(self, SimulationError::Configuration(_))
    }
}
