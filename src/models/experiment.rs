//! Experiment description
//!
//! [`Experiment`] gathers everything about the electrochemical cell that does
//! not change during a run: the redox couple, the solution, the electrode and
//! the rate law. It is independent of the waveform, so one experiment can be
//! swept over many waveforms (see [`BatchRunner`](crate::solver::BatchRunner)).
//!
//! # Example
//!
//! ```rust
//! use echem_rs::models::{Experiment, Kinetics, BulkScaling};
//!
//! let experiment = Experiment::default()
//!     .with_bulk_concentrations(0.0, 1e-6)
//!     .with_kinetics(Kinetics::butler_volmer(1e-2, 0.5));
//!
//! experiment.validate().unwrap();
//! assert_eq!(experiment.bulk_scaling().unwrap(), BulkScaling::Oxidized);
//! ```

use crate::models::{DoubleLayer, Kinetics};
use crate::physics::Species;
use crate::ConfigurationError;

// =================================================================================================
// Bulk Scaling
// =================================================================================================

/// Which bulk concentration anchors the normalization
///
/// Decided from the bulk concentrations. The anchor species sets the
/// reference concentration, the species whose gradient gives the current,
/// and the way concentrations are converted back to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkScaling {
    /// Only R in solution: C_R = 1, C_O = 0 initially
    Reduced,
    /// Only O in solution: C_R = 0, C_O = 1 initially
    Oxidized,
    /// Both present: C_R = 1, C_O = c_O*/c_R* initially
    Both,
}

impl BulkScaling {
    /// Species whose surface gradient gives the current
    pub fn anchor(&self) -> Species {
        match self {
            BulkScaling::Reduced | BulkScaling::Both => Species::Reduced,
            BulkScaling::Oxidized => Species::Oxidized,
        }
    }
}

// =================================================================================================
// Experiment
// =================================================================================================

/// Cell, solution and kinetics parameters of one experiment
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    /// Electrons transferred, n
    pub electrons: u32,
    /// Electrode area A \[cm²\]
    pub area: f64,
    /// Standard potential E0 \[V\]
    pub standard_potential: f64,
    /// Bulk concentration of O \[mol/cm³\]
    pub bulk_oxidized: f64,
    /// Bulk concentration of R \[mol/cm³\]
    pub bulk_reduced: f64,
    /// Diffusion coefficient of O \[cm²/s\]
    pub diffusion_oxidized: f64,
    /// Diffusion coefficient of R \[cm²/s\]
    pub diffusion_reduced: f64,
    /// Electrode rate law
    pub kinetics: Kinetics,
    /// Optional double-layer circuit
    pub double_layer: DoubleLayer,
}

impl Default for Experiment {
    /// One-electron oxidation of 5 mM R on a 1 cm² electrode
    fn default() -> Self {
        Self {
            electrons: 1,
            area: 1.0,
            standard_potential: 0.0,
            bulk_oxidized: 0.0,
            bulk_reduced: 5e-6,
            diffusion_oxidized: 1e-5,
            diffusion_reduced: 1e-5,
            kinetics: Kinetics::Nernst,
            double_layer: DoubleLayer::disabled(),
        }
    }
}

impl Experiment {
    pub fn with_electrons(mut self, electrons: u32) -> Self {
        self.electrons = electrons;
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    pub fn with_standard_potential(mut self, standard_potential: f64) -> Self {
        self.standard_potential = standard_potential;
        self
    }

    /// Set bulk concentrations of O and R \[mol/cm³\]
    pub fn with_bulk_concentrations(mut self, oxidized: f64, reduced: f64) -> Self {
        self.bulk_oxidized = oxidized;
        self.bulk_reduced = reduced;
        self
    }

    /// Set diffusion coefficients of O and R \[cm²/s\]
    pub fn with_diffusion_coefficients(mut self, oxidized: f64, reduced: f64) -> Self {
        self.diffusion_oxidized = oxidized;
        self.diffusion_reduced = reduced;
        self
    }

    pub fn with_kinetics(mut self, kinetics: Kinetics) -> Self {
        self.kinetics = kinetics;
        self
    }

    /// Enable the double-layer circuit (Cd in F, Ru in Ω)
    pub fn with_double_layer(mut self, capacitance: f64, resistance: f64) -> Self {
        self.double_layer = DoubleLayer::new(capacitance, resistance);
        self
    }

    /// D_O / D_R
    pub fn diffusion_ratio(&self) -> f64 {
        self.diffusion_oxidized / self.diffusion_reduced
    }

    /// Normalization anchor, or an error if no species is in solution
    pub fn bulk_scaling(&self) -> Result<BulkScaling, ConfigurationError> {
        match (self.bulk_reduced > 0.0, self.bulk_oxidized > 0.0) {
            (true, false) => Ok(BulkScaling::Reduced),
            (false, true) => Ok(BulkScaling::Oxidized),
            (true, true) => Ok(BulkScaling::Both),
            (false, false) => Err(ConfigurationError::NoBulkSpecies),
        }
    }

    /// Reference concentration c_ref used to normalize both fields \[mol/cm³\]
    pub fn reference_concentration(&self) -> Result<f64, ConfigurationError> {
        Ok(match self.bulk_scaling()? {
            BulkScaling::Reduced | BulkScaling::Both => self.bulk_reduced,
            BulkScaling::Oxidized => self.bulk_oxidized,
        })
    }

    /// Normalized bulk values (C_R, C_O)
    pub fn normalized_bulk(&self) -> Result<(f64, f64), ConfigurationError> {
        Ok(match self.bulk_scaling()? {
            BulkScaling::Reduced => (1.0, 0.0),
            BulkScaling::Oxidized => (0.0, 1.0),
            BulkScaling::Both => (1.0, self.bulk_oxidized / self.bulk_reduced),
        })
    }

    /// Diffusion coefficient of a species \[cm²/s\]
    pub fn diffusion(&self, species: Species) -> f64 {
        match species {
            Species::Reduced => self.diffusion_reduced,
            Species::Oxidized => self.diffusion_oxidized,
        }
    }

    /// Validate every parameter
    ///
    /// # Errors
    ///
    /// The first offending parameter, as a [`ConfigurationError`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.electrons == 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "electrons",
                value: 0.0,
                reason: "at least one electron must be transferred",
            });
        }

        positive("area", self.area)?;
        positive("diffusion_oxidized", self.diffusion_oxidized)?;
        positive("diffusion_reduced", self.diffusion_reduced)?;

        if !self.standard_potential.is_finite() {
            return Err(ConfigurationError::InvalidParameter {
                name: "standard_potential",
                value: self.standard_potential,
                reason: "must be finite",
            });
        }

        for (name, value) in [
            ("bulk_oxidized", self.bulk_oxidized),
            ("bulk_reduced", self.bulk_reduced),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }
        self.bulk_scaling()?;

        self.kinetics.validate()?;
        self.double_layer.validate()?;

        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name,
            value,
            reason: "must be strictly positive",
        })
    }
}
