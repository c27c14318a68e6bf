//! Species identifiers and surface concentration pairs
//!
//! This module defines the small vocabulary shared by the physics, the
//! kinetics models and the solver:
//! - `Species`: type-safe identifier of the two members of the O/R couple
//! - `SurfaceConcentrations`: normalized concentrations of both species at one node

use std::fmt;

// =================================================================================================
// Species (Type-safe Identifiers)
// =================================================================================================

/// Member of the redox couple O + n e⁻ ⇌ R
///
/// # Example
/// ```
/// use echem_rs::physics::Species;
///
/// assert_eq!(Species::Oxidized.to_string(), "O");
/// assert_eq!(Species::Reduced.other(), Species::Oxidized);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Oxidized form (O)
    Oxidized,

    /// Reduced form (R)
    Reduced,
}

impl Species {
    /// The other member of the couple
    pub fn other(self) -> Species {
        match self {
            Species::Oxidized => Species::Reduced,
            Species::Reduced => Species::Oxidized,
        }
    }

    /// Short chemical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Species::Oxidized => "O",
            Species::Reduced => "R",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =================================================================================================
// Surface Concentrations
// =================================================================================================

/// Normalized concentrations of R and O at a single node
///
/// Used both for the node adjacent to the electrode (input of the kinetics
/// models) and for the electrode surface itself (their output).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConcentrations {
    /// Normalized concentration of R
    pub reduced: f64,

    /// Normalized concentration of O
    pub oxidized: f64,
}

impl SurfaceConcentrations {
    /// Create a concentration pair
    pub fn new(reduced: f64, oxidized: f64) -> Self {
        Self { reduced, oxidized }
    }

    /// Concentration of one species
    pub fn get(&self, species: Species) -> f64 {
        match species {
            Species::Reduced => self.reduced,
            Species::Oxidized => self.oxidized,
        }
    }

    /// Both values are finite
    pub fn is_finite(&self) -> bool {
        self.reduced.is_finite() && self.oxidized.is_finite()
    }
}
