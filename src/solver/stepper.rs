//! Explicit diffusion stepper
//!
//! # Mathematical Background
//!
//! Fick's second law in normalized units, ∂C/∂T = D/D_R · ∂²C/∂X², is
//! discretized with forward time and centred space (FTCS):
//!
//! ```text
//! C_i^{k} = C_i^{k-1} + λ·(C_{i+1}^{k-1} − 2·C_i^{k-1} + C_{i-1}^{k-1})      (R)
//! C_i^{k} = C_i^{k-1} + λρ·(C_{i+1}^{k-1} − 2·C_i^{k-1} + C_{i-1}^{k-1})     (O)
//! ```
//!
//! for interior nodes 1 ≤ i ≤ nX−2, with ρ = D_O/D_R.
//!
//! # Boundaries
//!
//! - node nX−1 keeps its bulk value (Dirichlet)
//! - node 0 is set by the electrode kinetics from node 1 of the previous layer
//!
//! # Stability
//!
//! A von Neumann analysis gives an amplification factor 1 − 4λ·sin²(θ/2) for
//! each Fourier mode. The highest mode (θ = π) stays bounded only when
//! λ·D ≤ 0.5 for each species, otherwise it flips sign and grows every step.
//!
//! # Parallelism
//!
//! Every node of layer k reads only layer k−1, so the interior update is
//! embarrassingly parallel. Profiles longer than
//! [`parallel_threshold()`](crate::solver::parallel_threshold) are updated
//! with Rayon when the `parallel` feature is enabled. Both paths produce
//! bit-identical results.

use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::ElectrodeBoundary;
use crate::physics::ConcentrationLayer;

/// Apply one FTCS step to the interior of a profile
///
/// Writes nodes `1..n-1` of `next` from `previous`, copies the bulk node
/// `n-1` and leaves node 0 untouched.
///
/// # Panics
///
/// Panics if the two profiles differ in length or hold fewer than 3 nodes.
pub fn apply_stencil(lambda: f64, previous: &DVector<f64>, next: &mut DVector<f64>) {
    let parallel = previous.len() > super::parallel_threshold();
    stencil(lambda, previous, next, parallel);
}

fn stencil(lambda: f64, previous: &DVector<f64>, next: &mut DVector<f64>, parallel: bool) {
    let n = previous.len();
    assert!(n >= 3, "stencil needs at least 3 nodes, got {}", n);
    assert_eq!(n, next.len(), "profiles must have the same length");

    let old = previous.as_slice();
    let update = |i: usize| old[i] + lambda * (old[i + 1] - 2.0 * old[i] + old[i - 1]);
    let interior = &mut next.as_mut_slice()[1..n - 1];

    if parallel {
        #[cfg(feature = "parallel")]
        interior
            .par_iter_mut()
            .enumerate()
            .for_each(|(j, c)| *c = update(j + 1));
        #[cfg(not(feature = "parallel"))]
        interior
            .iter_mut()
            .enumerate()
            .for_each(|(j, c)| *c = update(j + 1));
    } else {
        interior
            .iter_mut()
            .enumerate()
            .for_each(|(j, c)| *c = update(j + 1));
    }

    next[n - 1] = previous[n - 1];
}

/// Advances both species by one time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionStepper {
    lambda: f64,
    ratio: f64,
}

impl DiffusionStepper {
    /// Stepper for stability ratio `lambda` and diffusion ratio D_O/D_R
    pub fn new(lambda: f64, ratio: f64) -> Self {
        Self { lambda, ratio }
    }

    /// Stability ratio seen by R
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Stability ratio seen by O (λ·D_O/D_R)
    pub fn lambda_oxidized(&self) -> f64 {
        self.lambda * self.ratio
    }

    /// Compute layer k from layer k−1
    ///
    /// Order of operations:
    /// 1. surface concentrations from the kinetics, using node 1 of `previous`
    /// 2. interior stencil for R and O, reading only `previous`
    /// 3. bulk node copied from `previous`
    pub fn advance(
        &self,
        previous: &ConcentrationLayer,
        next: &mut ConcentrationLayer,
        eps: f64,
        boundary: &ElectrodeBoundary,
    ) {
        let surface = boundary.surface_concentrations(previous.adjacent(), eps);

        apply_stencil(self.lambda, &previous.reduced, &mut next.reduced);
        apply_stencil(self.lambda_oxidized(), &previous.oxidized, &mut next.oxidized);

        next.set_surface(surface);
    }
}
