//! Physical description of the electrochemical system
//!
//! This module holds everything that is *physics* rather than numerics:
//!
//! - **Species**: the two members of the redox couple O + n e⁻ ⇌ R
//! - **Physical constants**: Faraday constant, gas constant, temperature
//! - **Waveform**: the applied potential as a function of time
//! - **Concentration layers**: normalized profiles of both species on the
//!   distance grid at one instant
//!
//! # Normalization
//!
//! All quantities the solver manipulates are dimensionless:
//!
//! ```text
//! C = c / c_ref          (c_ref: bulk concentration of the anchor species)
//! X = x / δ              (δ = √(D_R·t_total), diffusion layer thickness)
//! T = t / t_total
//! ε = nF/(RT)·(E − E0)   (normalized potential)
//! ```
//!
//! With this scaling the stencil and its stability analysis do not depend on
//! absolute units. The solver converts back to amperes, centimetres and
//! mol/cm³ when a run completes.
//!
//! # Example
//!
//! ```rust
//! use echem_rs::physics::{PhysicalConstants, Waveform};
//!
//! let waveform = Waveform::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.1, 0.2]).unwrap();
//! let constants = PhysicalConstants::default();
//!
//! let eps = constants.normalized_potential(1, waveform.potential()[2], 0.0);
//! assert!(eps > 7.0);
//! ```

// module declaration
pub mod constants;
pub mod field;
pub mod traits;
pub mod waveform;

// re-export commonly used types for convenience
pub use constants::PhysicalConstants;
pub use field::ConcentrationLayer;
pub use traits::{Species, SurfaceConcentrations};
pub use waveform::Waveform;
