//! Potential-time waveforms
//!
//! A waveform is the only time-dependent input of a run: an ordered list of
//! (time, potential) samples. How it was built (sweeps, steps, pulses,
//! concatenations) is the caller's business; this type only guarantees the
//! invariants the solver relies on.
//!
//! # Invariants
//!
//! - time and potential have the same length, at least [`MIN_SAMPLES`]
//! - every sample is finite
//! - time is strictly increasing (uniform or not; the explicit solver
//!   only runs uniformly sampled waveforms)
//!
//! The first time defines t = 0 for normalization and the span
//! `t_last − t_first` is the normalization horizon.
//!
//! # Example
//!
//! ```rust
//! use echem_rs::physics::Waveform;
//!
//! let time = vec![0.0, 0.5, 1.0, 1.5];
//! let potential = vec![-0.2, -0.1, 0.0, 0.1];
//! let waveform = Waveform::new(time, potential).unwrap();
//!
//! assert_eq!(waveform.len(), 4);
//! assert_eq!(waveform.duration(), 1.5);
//! ```

use nalgebra::DVector;

use crate::ConfigurationError;

/// Smallest waveform the stencil can run on
pub const MIN_SAMPLES: usize = 3;

/// Validated potential-time waveform
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    time: DVector<f64>,
    potential: DVector<f64>,
}

impl Waveform {
    /// Build a waveform from time \[s\] and potential \[V\] samples
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when one of the invariants listed in
    /// the module documentation does not hold.
    pub fn new(time: Vec<f64>, potential: Vec<f64>) -> Result<Self, ConfigurationError> {
        Self::from_vectors(DVector::from_vec(time), DVector::from_vec(potential))
    }

    /// Same as [`Waveform::new`] for nalgebra vectors
    pub fn from_vectors(
        time: DVector<f64>,
        potential: DVector<f64>,
    ) -> Result<Self, ConfigurationError> {
        if time.len() != potential.len() {
            return Err(ConfigurationError::LengthMismatch {
                time: time.len(),
                potential: potential.len(),
            });
        }
        if time.len() < MIN_SAMPLES {
            return Err(ConfigurationError::WaveformTooShort {
                minimum: MIN_SAMPLES,
                actual: time.len(),
            });
        }
        if let Some(index) = time.iter().position(|t| !t.is_finite()) {
            return Err(ConfigurationError::NonFiniteSample { quantity: "time", index });
        }
        if let Some(index) = potential.iter().position(|e| !e.is_finite()) {
            return Err(ConfigurationError::NonFiniteSample { quantity: "potential", index });
        }
        for index in 1..time.len() {
            if time[index] <= time[index - 1] {
                return Err(ConfigurationError::NonIncreasingTime {
                    index,
                    previous: time[index - 1],
                    current: time[index],
                });
            }
        }

        Ok(Self { time, potential })
    }

    /// Number of samples (nT)
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false: a valid waveform holds at least three samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time samples \[s\]
    pub fn time(&self) -> &DVector<f64> {
        &self.time
    }

    /// Potential samples \[V\]
    pub fn potential(&self) -> &DVector<f64> {
        &self.potential
    }

    /// First time sample \[s\]
    pub fn start(&self) -> f64 {
        self.time[0]
    }

    /// Normalization horizon t_last − t_first \[s\]
    pub fn duration(&self) -> f64 {
        self.time[self.time.len() - 1] - self.time[0]
    }

    /// Time elapsed between sample `k - 1` and sample `k`
    ///
    /// Returns 0 for `k == 0`.
    pub fn step_duration(&self, k: usize) -> f64 {
        if k == 0 { 0.0 } else { self.time[k] - self.time[k - 1] }
    }

    /// True when consecutive time steps differ by less than `tolerance` (relative)
    pub fn is_uniform(&self, tolerance: f64) -> bool {
        self.first_irregular_step(tolerance).is_none()
    }

    /// First sample `k` whose step `t[k] − t[k−1]` differs from the first
    /// step by more than `tolerance` (relative)
    pub fn first_irregular_step(&self, tolerance: f64) -> Option<usize> {
        let reference = self.step_duration(1);
        (2..self.len()).find(|&k| (self.step_duration(k) - reference).abs() > tolerance * reference)
    }
}
