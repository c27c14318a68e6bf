//! Normalized space-time grid
//!
//! # Mathematical Background
//!
//! Time is normalized by the run duration, so each of the nT waveform samples
//! advances the normalized time by
//!
//! ```text
//! dT = 1 / nT
//! ```
//!
//! The distance step follows from the stability ratio λ = dT/dX²:
//!
//! ```text
//! dX   = √(dT / λ)
//! Xmax = 6·√(nT·λ)
//! nX   = ⌊Xmax / dX⌋
//! ```
//!
//! Six normalized units is six diffusion-layer thicknesses, far enough for
//! the outer node to behave like the undisturbed bulk over the whole run.
//!
//! # Stability
//!
//! The explicit stencil is stable for λ < 0.5. [`Grid::build`] itself accepts
//! any positive ratio so the unstable regime can be studied; the solver
//! enforces the bound through
//! [`SolverConfiguration::validate`](crate::solver::SolverConfiguration::validate).
//!
//! # Example
//!
//! ```rust
//! use echem_rs::solver::Grid;
//!
//! let grid = Grid::build(1000, 0.45).unwrap();
//! assert_eq!(grid.time_steps, 1000);
//! assert!(grid.distance_steps >= 3);
//! assert!((grid.dx * grid.dx * grid.stability_ratio - grid.dt).abs() < 1e-15);
//! ```

use nalgebra::DVector;

use crate::physics::waveform::MIN_SAMPLES;
use crate::physics::Waveform;
use crate::ConfigurationError;

/// Stability ratio used unless configured otherwise
pub const DEFAULT_STABILITY_RATIO: f64 = 0.45;

/// Normalized distance covered by the grid, in diffusion-layer thicknesses
pub const DISTANCE_EXTENT: f64 = 6.0;

/// Discretization of one run, fixed once built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// λ = dT/dX²
    pub stability_ratio: f64,
    /// nT, one per waveform sample
    pub time_steps: usize,
    /// Normalized time step dT
    pub dt: f64,
    /// Normalized domain length Xmax
    pub x_max: f64,
    /// Normalized distance step dX
    pub dx: f64,
    /// nX, number of distance nodes
    pub distance_steps: usize,
}

impl Grid {
    /// Derive the grid from the number of time steps and the stability ratio
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::WaveformTooShort`] for fewer than 3 time steps
    /// - [`ConfigurationError::InvalidParameter`] for a non-positive ratio
    /// - [`ConfigurationError::GridTooCoarse`] when nX < 3 (no interior node)
    pub fn build(time_steps: usize, stability_ratio: f64) -> Result<Self, ConfigurationError> {
        if time_steps < MIN_SAMPLES {
            return Err(ConfigurationError::WaveformTooShort {
                minimum: MIN_SAMPLES,
                actual: time_steps,
            });
        }
        if !stability_ratio.is_finite() || stability_ratio <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "stability_ratio",
                value: stability_ratio,
                reason: "must be strictly positive",
            });
        }

        let steps = time_steps as f64;
        let dt = 1.0 / steps;
        let x_max = DISTANCE_EXTENT * (steps * stability_ratio).sqrt();
        let dx = (dt / stability_ratio).sqrt();
        let distance_steps = (x_max / dx).floor() as usize;

        if distance_steps < 3 {
            return Err(ConfigurationError::GridTooCoarse {
                distance_steps,
                time_steps,
            });
        }

        Ok(Self {
            stability_ratio,
            time_steps,
            dt,
            x_max,
            dx,
            distance_steps,
        })
    }

    /// Grid with one time step per waveform sample
    pub fn from_waveform(waveform: &Waveform, stability_ratio: f64) -> Result<Self, ConfigurationError> {
        Self::build(waveform.len(), stability_ratio)
    }

    /// Normalized position of every node, i·dX
    pub fn normalized_distances(&self) -> DVector<f64> {
        DVector::from_fn(self.distance_steps, |i, _| i as f64 * self.dx)
    }

    /// Physical position of every node \[cm\] for a layer thickness δ \[cm\]
    pub fn distances(&self, delta: f64) -> DVector<f64> {
        self.normalized_distances() * delta
    }
}
