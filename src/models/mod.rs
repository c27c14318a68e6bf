//! Electrochemical models
//!
//! Everything that describes the experiment rather than the numerical
//! method:
//!
//! ## [`Kinetics`]: electrode rate law
//!
//! Nernstian, irreversible or Butler-Volmer electron transfer. Bound to a
//! grid with [`Kinetics::bind`], it yields the [`ElectrodeBoundary`] that
//! sets the surface concentrations at every time step.
//!
//! ## [`Experiment`]: cell and solution
//!
//! Electrons, area, standard potential, bulk concentrations, diffusion
//! coefficients, the chosen rate law and the optional double layer. Decides
//! the [`BulkScaling`] used to normalize and denormalize concentrations.
//!
//! ## [`DoubleLayer`]: Cd/Ru circuit
//!
//! Optional lumped RC circuit that turns the faradaic current into the
//! observable total current.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod circuit;
pub mod experiment;
pub mod kinetics;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use circuit::{CircuitState, DoubleLayer};
pub use experiment::{BulkScaling, Experiment};
pub use kinetics::{ElectrodeBoundary, Kinetics, ReactionDirection};
