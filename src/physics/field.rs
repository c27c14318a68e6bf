//! Normalized concentration profiles
//!
//! A [`ConcentrationLayer`] is one time layer of the two species' profiles on
//! the distance grid: node 0 is the electrode surface, node nX−1 the bulk.
//! The solver only ever keeps two layers alive (the previous one and the one
//! being written) and swaps them after each step.
//!
//! # Surface gradient
//!
//! The current is proportional to the concentration gradient at the
//! electrode, approximated with the second-order one-sided difference
//!
//! ```text
//! ∂C/∂X |₀ ≈ (−3·C(0) + 4·C(1) − C(2)) / (2·dX)
//! ```

use nalgebra::DVector;

use crate::physics::{Species, SurfaceConcentrations};

/// Both normalized concentration profiles at one time layer
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationLayer {
    /// Profile of R, indexed by distance node
    pub reduced: DVector<f64>,
    /// Profile of O, indexed by distance node
    pub oxidized: DVector<f64>,
}

impl ConcentrationLayer {
    /// Layer with constant profiles (initial condition)
    pub fn uniform(nodes: usize, reduced: f64, oxidized: f64) -> Self {
        Self {
            reduced: DVector::from_element(nodes, reduced),
            oxidized: DVector::from_element(nodes, oxidized),
        }
    }

    /// Number of distance nodes
    pub fn nodes(&self) -> usize {
        self.reduced.len()
    }

    /// Profile of one species
    pub fn profile(&self, species: Species) -> &DVector<f64> {
        match species {
            Species::Reduced => &self.reduced,
            Species::Oxidized => &self.oxidized,
        }
    }

    /// Concentrations at the electrode (node 0)
    pub fn surface(&self) -> SurfaceConcentrations {
        SurfaceConcentrations::new(self.reduced[0], self.oxidized[0])
    }

    /// Concentrations at the first interior node (node 1)
    pub fn adjacent(&self) -> SurfaceConcentrations {
        SurfaceConcentrations::new(self.reduced[1], self.oxidized[1])
    }

    /// Overwrite the electrode node
    pub fn set_surface(&mut self, surface: SurfaceConcentrations) {
        self.reduced[0] = surface.reduced;
        self.oxidized[0] = surface.oxidized;
    }

    /// Normalized gradient ∂C/∂X at the electrode, second-order one-sided
    pub fn surface_gradient(&self, species: Species, dx: f64) -> f64 {
        let c = self.profile(species);
        (-3.0 * c[0] + 4.0 * c[1] - c[2]) / (2.0 * dx)
    }

    /// First node whose value is non-finite or exceeds `bound` in magnitude
    ///
    /// Returns the offending species, node and value. R is scanned first.
    pub fn find_out_of_bounds(&self, bound: f64) -> Option<(Species, usize, f64)> {
        [Species::Reduced, Species::Oxidized].into_iter().find_map(|species| {
            self.profile(species)
                .iter()
                .position(|c| !c.is_finite() || c.abs() > bound)
                .map(|node| (species, node, self.profile(species)[node]))
        })
    }
}
