//! Electrode kinetics
//!
//! The only place where the two species interact is the electrode surface
//! (node 0). At every time step the surface concentrations are set from the
//! concentrations at node 1 of the previous layer and the normalized
//! potential ε = nF/(RT)·(E − E0), under one of three rate laws.
//!
//! # Mathematical Background
//!
//! With `r`, `o` the node-1 concentrations, `ρ = D_O/D_R` and
//! `k = dX·K0` where `K0 = ks·δ/D_R` is the normalized rate constant:
//!
//! ## Nernst (reversible)
//!
//! ```text
//! C_O(0)/C_R(0) = exp(ε)
//! C_R(0) = (r + ρ·o) / (1 + ρ·exp(ε))
//! C_O(0) = (r + ρ·o) / (exp(−ε) + ρ)
//! ```
//!
//! ## Butler-Volmer (quasi-reversible)
//!
//! ```text
//! C_R(0) = [r + k·exp(−αε)·(o + r/ρ)] / [1 + k·(exp((1−α)ε) + exp(−αε)/ρ)]
//! C_O(0) = o + (r − C_R(0))/ρ
//! ```
//!
//! For ε < 0 numerator and denominator are multiplied by exp(αε) so that no
//! exponential overflows at large cathodic overpotentials.
//!
//! ## Irreversible
//!
//! ```text
//! oxidation (R → O):  C_R(0) = r / (1 + k·exp((1−α)ε)),   C_O(0) by mass balance
//! reduction (O → R):  C_O(0) = o / (1 + k·exp(−αε)/ρ),    C_R(0) by mass balance
//! ```
//!
//! # Mass Conservation
//!
//! Every policy satisfies
//!
//! ```text
//! (r − C_R(0)) + ρ·(o − C_O(0)) = 0
//! ```
//!
//! i.e. whatever leaves as R arrives as O, scaled by the diffusion ratio.
//!
//! # Example
//!
//! ```rust
//! use echem_rs::models::Kinetics;
//! use echem_rs::physics::SurfaceConcentrations;
//!
//! let kinetics = Kinetics::butler_volmer(1e-2, 0.5);
//! kinetics.validate().unwrap();
//!
//! let boundary = kinetics.bind(0.01, 0.01, 1e-5, 1.0);
//! let surface = boundary.surface_concentrations(SurfaceConcentrations::new(1.0, 0.0), 5.0);
//! assert!(surface.reduced < 1.0);
//! ```

use std::fmt;

use crate::physics::SurfaceConcentrations;
use crate::ConfigurationError;

// =================================================================================================
// Reaction Direction
// =================================================================================================

/// Direction of a one-way electron transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionDirection {
    /// R → O + n e⁻
    #[default]
    Oxidation,
    /// O + n e⁻ → R
    Reduction,
}

// =================================================================================================
// Kinetics Policy
// =================================================================================================

/// Rate law at the electrode surface
///
/// Selected once per run. Parameters are checked by [`Kinetics::validate`]
/// before anything is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Kinetics {
    /// Instantaneous electron transfer: surface concentrations follow the
    /// Nernst equation
    #[default]
    Nernst,

    /// One-way electron transfer
    ///
    /// - `rate_constant`: standard rate constant ks \[cm/s\]
    /// - `alpha`: transfer coefficient α ∈ (0, 1)
    /// - `direction`: which way the reaction runs
    Irreversible {
        rate_constant: f64,
        alpha: f64,
        direction: ReactionDirection,
    },

    /// Two-way electron transfer with finite rate
    ///
    /// - `rate_constant`: standard rate constant ks \[cm/s\]
    /// - `alpha`: transfer coefficient α ∈ (0, 1)
    ButlerVolmer { rate_constant: f64, alpha: f64 },
}

impl Kinetics {
    /// Irreversible oxidation R → O
    pub fn irreversible(rate_constant: f64, alpha: f64) -> Self {
        Kinetics::Irreversible {
            rate_constant,
            alpha,
            direction: ReactionDirection::Oxidation,
        }
    }

    /// Irreversible reduction O → R
    pub fn irreversible_reduction(rate_constant: f64, alpha: f64) -> Self {
        Kinetics::Irreversible {
            rate_constant,
            alpha,
            direction: ReactionDirection::Reduction,
        }
    }

    /// Butler-Volmer kinetics
    pub fn butler_volmer(rate_constant: f64, alpha: f64) -> Self {
        Kinetics::ButlerVolmer {
            rate_constant,
            alpha,
        }
    }

    /// Short policy name
    pub fn name(&self) -> &'static str {
        match self {
            Kinetics::Nernst => "Nernst",
            Kinetics::Irreversible { .. } => "Irreversible",
            Kinetics::ButlerVolmer { .. } => "Butler-Volmer",
        }
    }

    /// Standard rate constant, if the policy has one
    pub fn rate_constant(&self) -> Option<f64> {
        match self {
            Kinetics::Nernst => None,
            Kinetics::Irreversible { rate_constant, .. }
            | Kinetics::ButlerVolmer { rate_constant, .. } => Some(*rate_constant),
        }
    }

    /// Check rate-law parameters
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::RateConstant`] if ks is not positive and finite
    /// - [`ConfigurationError::TransferCoefficient`] if α ∉ (0, 1)
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let (rate_constant, alpha) = match self {
            Kinetics::Nernst => return Ok(()),
            Kinetics::Irreversible {
                rate_constant,
                alpha,
                ..
            }
            | Kinetics::ButlerVolmer {
                rate_constant,
                alpha,
            } => (*rate_constant, *alpha),
        };

        if !rate_constant.is_finite() || rate_constant <= 0.0 {
            return Err(ConfigurationError::RateConstant {
                policy: self.name(),
                value: rate_constant,
            });
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigurationError::TransferCoefficient {
                policy: self.name(),
                value: alpha,
            });
        }
        Ok(())
    }

    /// Fix the grid-dependent factors for one run
    ///
    /// # Arguments
    ///
    /// * `dx` - normalized distance step
    /// * `delta` - diffusion layer thickness δ \[cm\]
    /// * `diffusion_reduced` - D_R \[cm²/s\]
    /// * `ratio` - D_O / D_R
    pub fn bind(&self, dx: f64, delta: f64, diffusion_reduced: f64, ratio: f64) -> ElectrodeBoundary {
        let scaled_rate = self
            .rate_constant()
            .map(|ks| dx * ks * delta / diffusion_reduced)
            .unwrap_or(0.0);

        ElectrodeBoundary {
            kinetics: *self,
            scaled_rate,
            ratio,
        }
    }
}

impl fmt::Display for Kinetics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kinetics::Nernst => write!(f, "Nernst"),
            Kinetics::Irreversible {
                rate_constant,
                alpha,
                direction,
            } => write!(
                f,
                "Irreversible {:?} (ks = {} cm/s, alpha = {})",
                direction, rate_constant, alpha
            ),
            Kinetics::ButlerVolmer {
                rate_constant,
                alpha,
            } => write!(f, "Butler-Volmer (ks = {} cm/s, alpha = {})", rate_constant, alpha),
        }
    }
}

// =================================================================================================
// Electrode Boundary (kinetics bound to a grid)
// =================================================================================================

/// Kinetics with the grid factors of one run folded in
///
/// Produced by [`Kinetics::bind`]. Holds `dX·K0` so the per-step update is a
/// handful of exponentials and divisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectrodeBoundary {
    kinetics: Kinetics,
    scaled_rate: f64,
    ratio: f64,
}

impl ElectrodeBoundary {
    /// Rate law in use
    pub fn kinetics(&self) -> &Kinetics {
        &self.kinetics
    }

    /// dX·K0 (zero for Nernst)
    pub fn scaled_rate(&self) -> f64 {
        self.scaled_rate
    }

    /// Surface concentrations for this step
    ///
    /// `adjacent` holds the node-1 concentrations of the previous layer and
    /// `eps` the normalized potential of the current step.
    pub fn surface_concentrations(&self, adjacent: SurfaceConcentrations, eps: f64) -> SurfaceConcentrations {
        let r = adjacent.reduced;
        let o = adjacent.oxidized;
        let rho = self.ratio;
        let k = self.scaled_rate;

        match self.kinetics {
            Kinetics::Nernst => {
                let total = r + rho * o;
                // Two forms keep both values finite when exp(±ε) overflows
                SurfaceConcentrations::new(total / (1.0 + rho * eps.exp()), total / ((-eps).exp() + rho))
            }

            Kinetics::ButlerVolmer { alpha, .. } => {
                let reduced = if eps >= 0.0 {
                    let forward = ((1.0 - alpha) * eps).exp();
                    let backward = (-alpha * eps).exp();
                    (r + k * backward * (o + r / rho)) / (1.0 + k * (forward + backward / rho))
                } else {
                    // Same ratio divided through by exp(−αε), which overflows first
                    let inverse_backward = (alpha * eps).exp();
                    (r * inverse_backward + k * (o + r / rho)) / (inverse_backward + k * (eps.exp() + 1.0 / rho))
                };
                SurfaceConcentrations::new(reduced, o + (r - reduced) / rho)
            }

            Kinetics::Irreversible {
                alpha,
                direction: ReactionDirection::Oxidation,
                ..
            } => {
                let reduced = r / (1.0 + k * ((1.0 - alpha) * eps).exp());
                SurfaceConcentrations::new(reduced, o + (r - reduced) / rho)
            }

            Kinetics::Irreversible {
                alpha,
                direction: ReactionDirection::Reduction,
                ..
            } => {
                let oxidized = o / (1.0 + k * (-alpha * eps).exp() / rho);
                SurfaceConcentrations::new(r + rho * (o - oxidized), oxidized)
            }
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DX: f64 = 0.0149;
    const DELTA: f64 = 0.01;
    const DR: f64 = 1e-5;

    fn all_policies() -> Vec<Kinetics> {
        vec![
            Kinetics::Nernst,
            Kinetics::butler_volmer(1e-3, 0.5),
            Kinetics::butler_volmer(1.0, 0.3),
            Kinetics::irreversible(1e-3, 0.5),
            Kinetics::irreversible_reduction(1e-2, 0.7),
        ]
    }

    /// (r − C_R(0)) + ρ·(o − C_O(0))
    fn mass_defect(adjacent: SurfaceConcentrations, surface: SurfaceConcentrations, ratio: f64) -> f64 {
        (adjacent.reduced - surface.reduced) + ratio * (adjacent.oxidized - surface.oxidized)
    }

    #[test]
    fn test_mass_is_conserved_by_every_policy() {
        let adjacents = [
            SurfaceConcentrations::new(1.0, 0.0),
            SurfaceConcentrations::new(0.7, 0.3),
            SurfaceConcentrations::new(0.05, 1.2),
        ];

        for kinetics in all_policies() {
            for ratio in [0.5, 1.0, 2.0] {
                let boundary = kinetics.bind(DX, DELTA, DR, ratio);
                for adjacent in adjacents {
                    for eps in [-15.0, -2.0, 0.0, 1.5, 15.0] {
                        let surface = boundary.surface_concentrations(adjacent, eps);
                        assert!(surface.is_finite(), "{} produced non-finite values", kinetics);
                        assert_abs_diff_eq!(mass_defect(adjacent, surface, ratio), 0.0, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_nernst_ratio_follows_potential() {
        let boundary = Kinetics::Nernst.bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(0.8, 0.2);

        for eps in [-3.0, 0.0, 2.5] {
            let surface = boundary.surface_concentrations(adjacent, eps);
            assert_relative_eq!(surface.oxidized / surface.reduced, f64::exp(eps), max_relative = 1e-12);
        }

        // At E = E0 with equal diffusion the couple splits evenly
        let surface = boundary.surface_concentrations(adjacent, 0.0);
        assert_relative_eq!(surface.reduced, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_nernst_matches_simple_form_for_equal_diffusion() {
        let boundary = Kinetics::Nernst.bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(0.9, 0.1);
        let eps = 0.7;

        let surface = boundary.surface_concentrations(adjacent, eps);
        let expected = (adjacent.reduced + adjacent.oxidized) / (1.0 + eps.exp());
        assert_relative_eq!(surface.reduced, expected, max_relative = 1e-12);
        assert_relative_eq!(surface.oxidized, expected * eps.exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_nernst_survives_extreme_potentials() {
        let boundary = Kinetics::Nernst.bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(1.0, 0.0);

        let anodic = boundary.surface_concentrations(adjacent, 1000.0);
        assert_eq!(anodic.reduced, 0.0);
        assert_relative_eq!(anodic.oxidized, 1.0);

        let cathodic = boundary.surface_concentrations(adjacent, -1000.0);
        assert_relative_eq!(cathodic.reduced, 1.0);
        assert_eq!(cathodic.oxidized, 0.0);
    }

    #[test]
    fn test_butler_volmer_survives_extreme_potentials() {
        // |αε| = 1000 is past the range of exp()
        let boundary = Kinetics::butler_volmer(1.0, 0.5).bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(0.7, 0.3);

        let cathodic = boundary.surface_concentrations(adjacent, -2000.0);
        assert!(cathodic.is_finite());
        assert_relative_eq!(cathodic.reduced, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cathodic.oxidized, 0.0, epsilon = 1e-12);

        let anodic = boundary.surface_concentrations(adjacent, 2000.0);
        assert!(anodic.is_finite());
        assert_abs_diff_eq!(anodic.reduced, 0.0, epsilon = 1e-12);
        assert_relative_eq!(anodic.oxidized, 1.0, epsilon = 1e-12);

        for surface in [cathodic, anodic] {
            assert_abs_diff_eq!(mass_defect(adjacent, surface, 1.0), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_butler_volmer_approaches_nernst_for_fast_kinetics() {
        let adjacent = SurfaceConcentrations::new(0.6, 0.4);
        let nernst = Kinetics::Nernst.bind(DX, DELTA, DR, 1.0);
        let fast = Kinetics::butler_volmer(1e8, 0.5).bind(DX, DELTA, DR, 1.0);

        for eps in [-4.0, 0.0, 4.0] {
            let expected = nernst.surface_concentrations(adjacent, eps);
            let actual = fast.surface_concentrations(adjacent, eps);
            assert_relative_eq!(actual.reduced, expected.reduced, max_relative = 1e-4);
            assert_relative_eq!(actual.oxidized, expected.oxidized, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_slow_kinetics_leave_surface_untouched() {
        let adjacent = SurfaceConcentrations::new(1.0, 0.0);
        let slow = Kinetics::butler_volmer(1e-12, 0.5).bind(DX, DELTA, DR, 1.0);
        let surface = slow.surface_concentrations(adjacent, 2.0);
        assert_relative_eq!(surface.reduced, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_irreversible_oxidation_depletes_reduced_species() {
        let boundary = Kinetics::irreversible(1e-2, 0.5).bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(1.0, 0.0);

        let low = boundary.surface_concentrations(adjacent, 0.0);
        let high = boundary.surface_concentrations(adjacent, 20.0);
        assert!(high.reduced < low.reduced);
        assert!(high.oxidized > low.oxidized);
    }

    #[test]
    fn test_irreversible_reduction_depletes_oxidized_species() {
        let boundary = Kinetics::irreversible_reduction(1e-2, 0.5).bind(DX, DELTA, DR, 1.0);
        let adjacent = SurfaceConcentrations::new(0.0, 1.0);

        let low = boundary.surface_concentrations(adjacent, 0.0);
        let high = boundary.surface_concentrations(adjacent, -20.0);
        assert!(high.oxidized < low.oxidized);
        assert!(high.reduced > low.reduced);
    }

    #[test]
    fn test_bind_scales_rate_constant() {
        let boundary = Kinetics::butler_volmer(2e-3, 0.5).bind(0.02, 0.01, 1e-5, 1.0);
        // dX·ks·δ/D = 0.02 · 2e-3 · 0.01 / 1e-5
        assert_relative_eq!(boundary.scaled_rate(), 0.04, max_relative = 1e-12);
        assert_eq!(Kinetics::Nernst.bind(0.02, 0.01, 1e-5, 1.0).scaled_rate(), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(Kinetics::Nernst.validate().is_ok());
        for kinetics in all_policies() {
            assert!(kinetics.validate().is_ok());
        }

        assert!(matches!(
            Kinetics::butler_volmer(0.0, 0.5).validate(),
            Err(ConfigurationError::RateConstant { value, .. }) if value == 0.0
        ));
        assert!(matches!(
            Kinetics::irreversible(1.0, 1.0).validate(),
            Err(ConfigurationError::TransferCoefficient { .. })
        ));
        assert!(Kinetics::butler_volmer(f64::INFINITY, 0.5).validate().is_err());
        assert!(Kinetics::irreversible_reduction(1.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(Kinetics::default().name(), "Nernst");
        assert_eq!(Kinetics::irreversible(1.0, 0.5).name(), "Irreversible");
        assert_eq!(Kinetics::butler_volmer(1.0, 0.5).name(), "Butler-Volmer");
        assert!(Kinetics::butler_volmer(1.0, 0.5).to_string().contains("ks = 1"));
    }
}
