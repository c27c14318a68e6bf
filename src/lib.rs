//! echem-rs: Electrochemical Voltammetry Simulation
//!
//! Simulates the current response of an electrode to a time-varying applied
//! potential by solving one-dimensional diffusion of an oxidized (O) and a
//! reduced (R) species with an explicit finite-difference scheme. The
//! electrode surface is coupled to the solution through a choice of
//! kinetics (Nernst, irreversible or Butler-Volmer), optionally behind a
//! double-layer capacitance and an uncompensated resistance.
//!
//! # Architecture
//!
//! echem-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - The experiment and the waveform say what is measured
//!    - The solver and its configuration say how it is computed
//!
//! 2. **Checked Inputs, Typed Failures**
//!    - Every input is validated before any grid is allocated
//!    - Runs fail with a [`SimulationError`], never with a panic
//!
//! # Quick Start
//!
//! ```rust
//! use echem_rs::prelude::*;
//!
//! # fn main() -> Result<(), SimulationError> {
//! // 1. Potential step to +0.5 V, sampled 100 times over 10 s
//! let time: Vec<f64> = (0..100).map(|k| 10.0 * k as f64 / 99.0).collect();
//! let waveform = Waveform::new(time, vec![0.5; 100])?;
//!
//! // 2. 5 mM of the reduced species, reversible electron transfer
//! let experiment = Experiment::default()
//!     .with_bulk_concentrations(0.0, 5e-6)
//!     .with_kinetics(Kinetics::Nernst);
//! let scenario = Scenario::new(experiment, waveform);
//!
//! // 3. Run simulation
//! let result = ExplicitSolver::new().solve(&scenario, &SolverConfiguration::default())?;
//!
//! // 4. Access results
//! println!("current after 5 s: {:e} A", result.current_at_time(5.0));
//! assert_eq!(result.len(), 100);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: constants, waveforms and concentration profiles
//! - [`models`]: experiment description, electrode kinetics, double layer
//! - [`solver`]: grid, stencil, simulation driver and batch runs
//! - [`error`]: configuration and simulation errors
//!
//! # Features
//!
//! - `parallel` (default): Rayon for long profiles and for batch runs

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub use error::{ConfigurationError, SimulationError};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use echem_rs::prelude::*;
    //! ```
    pub use crate::error::{ConfigurationError, SimulationError};
    pub use crate::models::{BulkScaling,
                            DoubleLayer,
                            Experiment,
                            Kinetics,
                            ReactionDirection};
    pub use crate::physics::{PhysicalConstants,
                             Species,
                             Waveform};
    pub use crate::solver::{BatchRunner,
                            ExplicitSolver,
                            ProfileHistory,
                            Scenario,
                            SimulationResult,
                            Solver,
                            SolverConfiguration};
}
