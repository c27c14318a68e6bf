//! Explicit finite-difference solver
//!
//! # Mathematical Background
//!
//! The solver marches the normalized diffusion equations of O and R from the
//! bulk initial condition through every sample of the waveform:
//!
//! ```text
//! for k = 1 .. nT−1:
//!     ε(k)        = nF/(RT)·(E(k) − E0)
//!     layer(k)    = step(layer(k−1), ε(k))          (kinetics, then stencil)
//!     i(k)        = ±nFA·D·c_ref/δ · ∂C/∂X|₀         (anchor species)
//! ```
//!
//! where δ = √(D_R·t_total) and c_ref is the bulk concentration of the
//! anchor species. The current is positive for oxidation.
//!
//! # Memory
//!
//! Only two layers are alive; they are swapped after each step. Layers
//! selected by the [`ProfileHistory`](crate::solver::ProfileHistory) are
//! converted to mol/cm³ as soon as they are produced and stored column by
//! column.
//!
//! # Double Layer
//!
//! When the experiment carries a double-layer circuit, the faradaic current
//! of each step feeds the RC update and the total current becomes the
//! observable one. The kinetics still see the applied potential.
//!
//! # Example
//!
//! ```rust
//! use echem_rs::models::Experiment;
//! use echem_rs::physics::Waveform;
//! use echem_rs::solver::{ExplicitSolver, Scenario, Solver, SolverConfiguration};
//!
//! // Potential step to +0.5 V for 1 s
//! let time: Vec<f64> = (0..100).map(|k| k as f64 * 0.01).collect();
//! let potential = vec![0.5; 100];
//! let waveform = Waveform::new(time, potential).unwrap();
//!
//! let scenario = Scenario::new(Experiment::default(), waveform);
//! let result = ExplicitSolver::new()
//!     .solve(&scenario, &SolverConfiguration::default())
//!     .unwrap();
//!
//! assert_eq!(result.current.len(), 100);
//! assert!(result.current[10] > result.current[90]);
//! ```

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::models::{BulkScaling, CircuitState};
use crate::physics::{ConcentrationLayer, PhysicalConstants, Species};
use crate::solver::{
    DiffusionStepper, Grid, Scenario, SimulationResult, Solver, SolverConfiguration, StepProgress,
};
use crate::{ConfigurationError, SimulationError};

/// Largest relative spread between waveform time steps
const UNIFORM_STEP_TOLERANCE: f64 = 1e-6;

// =================================================================================================
// Explicit Solver
// =================================================================================================

/// Forward-time centred-space solver for the O/R diffusion problem
///
/// Physical constants are captured at construction, so two solvers with
/// different temperatures can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExplicitSolver {
    constants: PhysicalConstants,
}

impl ExplicitSolver {
    /// Solver at room temperature
    ///
    /// # Example
    ///
    /// ```rust
    /// use echem_rs::solver::{ExplicitSolver, Solver};
    ///
    /// let solver = ExplicitSolver::new();
    /// assert_eq!(solver.name(), "Explicit Finite Difference");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with custom physical constants
    pub fn with_constants(constants: PhysicalConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }
}

impl Solver for ExplicitSolver {
    fn solve_with_progress(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
        progress: &mut dyn FnMut(StepProgress),
    ) -> Result<SimulationResult, SimulationError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;
        self.constants.validate()?;

        let experiment = &scenario.experiment;
        let waveform = &scenario.waveform;

        // Every sample advances the normalized time by the same dT = 1/nT
        if let Some(index) = waveform.first_irregular_step(UNIFORM_STEP_TOLERANCE) {
            return Err(ConfigurationError::NonUniformWaveform {
                index,
                step: waveform.step_duration(index),
                expected: waveform.step_duration(1),
            }
            .into());
        }

        let grid = Grid::from_waveform(waveform, config.stability_ratio)?;
        let scaling = experiment.bulk_scaling()?;
        let reference = experiment.reference_concentration()?;
        let (bulk_reduced, bulk_oxidized) = experiment.normalized_bulk()?;

        let ratio = experiment.diffusion_ratio();
        let delta = scenario.diffusion_layer_thickness();
        let nt = grid.time_steps;
        let nx = grid.distance_steps;

        log::info!(
            "{}: {} kinetics, nT = {}, nX = {}, lambda = {}",
            self.name(),
            experiment.kinetics.name(),
            nt,
            nx,
            grid.stability_ratio
        );
        self.warn_about_marginal_inputs(scenario, &grid, scaling);

        // ====== Step 2: Setup ======

        let boundary = experiment
            .kinetics
            .bind(grid.dx, delta, experiment.diffusion_reduced, ratio);
        let stepper = DiffusionStepper::new(grid.stability_ratio, ratio);

        // Largest value a stable run can reach, times the safety factor
        let bound = config.divergence_factor * bulk_reduced.max(bulk_oxidized) * ratio.max(1.0 / ratio).max(1.0);

        let anchor = scaling.anchor();
        let sign = match anchor {
            Species::Reduced => 1.0,
            Species::Oxidized => -1.0,
        };
        let current_scale = experiment.electrons as f64
            * self.constants.faraday
            * experiment.area
            * experiment.diffusion(anchor)
            * reference
            / delta;

        let mut previous = ConcentrationLayer::uniform(nx, bulk_reduced, bulk_oxidized);
        let mut next = previous.clone();

        let profile_steps = config.profile_history.recorded_steps(nt);
        let mut profiles = ProfileRecorder::new(nx, profile_steps.len(), scaling, reference);
        if config.profile_history.records(0, nt) {
            profiles.record(&previous);
        }

        let potential = waveform.potential();
        let mut faradaic: DVector<f64> = DVector::zeros(nt);
        let mut circuit = experiment
            .double_layer
            .is_enabled()
            .then(|| (CircuitState::new(experiment.double_layer, potential[0]), DVector::<f64>::zeros(nt)));

        // ====== Step 3: Time Marching ======

        for k in 1..nt {
            let eps = self.constants.normalized_potential(
                experiment.electrons,
                potential[k],
                experiment.standard_potential,
            );

            stepper.advance(&previous, &mut next, eps, &boundary);

            // Abort on the first value outside the sane range
            if let Some((species, node, value)) = next.find_out_of_bounds(bound) {
                log::warn!(
                    "divergence at step {} of {}: {} = {} at node {}",
                    k,
                    nt - 1,
                    species,
                    value,
                    node
                );
                return Err(SimulationError::Divergence {
                    step: k,
                    species,
                    node,
                    value,
                });
            }

            faradaic[k] = sign * current_scale * next.surface_gradient(anchor, grid.dx);

            if let Some((state, total)) = circuit.as_mut() {
                total[k] = state.step(potential[k], waveform.step_duration(k), faradaic[k]);
            }

            std::mem::swap(&mut previous, &mut next);

            if config.profile_history.records(k, nt) {
                profiles.record(&previous);
            }

            if k % config.progress_interval == 0 || k == nt - 1 {
                let report = StepProgress { step: k, total: nt - 1 };
                log::trace!("{}", report);
                progress(report);
            }
        }

        // ====== Step 4: Build Result ======

        let (current, faradaic_current) = match circuit {
            Some((_, total)) => (total, Some(faradaic)),
            None => (faradaic, None),
        };
        let (concentration_reduced, concentration_oxidized) = profiles.finish();

        let mut result = SimulationResult {
            time: waveform.time().clone(),
            potential: potential.clone(),
            current,
            faradaic_current,
            distance: grid.distances(delta),
            concentration_reduced,
            concentration_oxidized,
            profile_steps,
            metadata: HashMap::new(),
        };

        result.add_metadata("solver", self.name());
        result.add_metadata("kinetics", &experiment.kinetics.to_string());
        result.add_metadata("bulk scaling", &format!("{:?}", scaling));
        result.add_metadata("time steps", &nt.to_string());
        result.add_metadata("distance steps", &nx.to_string());
        result.add_metadata("stability ratio", &grid.stability_ratio.to_string());
        result.add_metadata("dx", &grid.dx.to_string());
        result.add_metadata("diffusion layer thickness", &delta.to_string());

        let (peak_index, peak) = result.peak_current();
        log::debug!(
            "{} finished: peak current {:e} A at E = {} V",
            self.name(),
            peak,
            result.potential[peak_index]
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        "Explicit Finite Difference"
    }
}

impl ExplicitSolver {
    /// Log inputs that are accepted but deserve attention
    fn warn_about_marginal_inputs(&self, scenario: &Scenario, grid: &Grid, scaling: BulkScaling) {
        let experiment = &scenario.experiment;
        let ratio = experiment.diffusion_ratio();

        if grid.stability_ratio * ratio >= 0.5 {
            log::warn!(
                "lambda * DO/DR = {} exceeds the explicit stability limit for O; the run will likely diverge",
                grid.stability_ratio * ratio
            );
        }

        if scaling != BulkScaling::Both && ratio != 1.0 {
            log::warn!(
                "{} concentrations are reported as the complement of {} (exact only for DO = DR, got DO/DR = {})",
                scaling.anchor().other(),
                scaling.anchor(),
                ratio
            );
        }

        if experiment.double_layer.is_enabled() {
            let waveform = &scenario.waveform;
            let longest = (1..waveform.len())
                .map(|k| waveform.step_duration(k))
                .fold(0.0, f64::max);
            if longest >= 2.0 * experiment.double_layer.time_constant() {
                log::warn!(
                    "time step {} s is not small against RuCd = {} s; the circuit update may oscillate",
                    longest,
                    experiment.double_layer.time_constant()
                );
            }
        }
    }
}

// =================================================================================================
// Profile Recorder
// =================================================================================================

/// Converts recorded layers to mol/cm³ and stores them column by column
struct ProfileRecorder {
    reduced: DMatrix<f64>,
    oxidized: DMatrix<f64>,
    column: usize,
    scaling: BulkScaling,
    reference: f64,
}

impl ProfileRecorder {
    fn new(nodes: usize, columns: usize, scaling: BulkScaling, reference: f64) -> Self {
        Self {
            reduced: DMatrix::zeros(nodes, columns),
            oxidized: DMatrix::zeros(nodes, columns),
            column: 0,
            scaling,
            reference,
        }
    }

    /// Denormalize one layer
    ///
    /// With a single species in solution the other one is its complement,
    /// c_other = c_ref − c_anchor. With both present each field is scaled
    /// on its own.
    fn record(&mut self, layer: &ConcentrationLayer) {
        let c_ref = self.reference;
        let (reduced, oxidized): (DVector<f64>, DVector<f64>) = match self.scaling {
            BulkScaling::Reduced => (
                layer.reduced.map(|c| c * c_ref),
                layer.reduced.map(|c| (1.0 - c) * c_ref),
            ),
            BulkScaling::Oxidized => (
                layer.oxidized.map(|c| (1.0 - c) * c_ref),
                layer.oxidized.map(|c| c * c_ref),
            ),
            BulkScaling::Both => (layer.reduced.map(|c| c * c_ref), layer.oxidized.map(|c| c * c_ref)),
        };

        self.reduced.set_column(self.column, &reduced);
        self.oxidized.set_column(self.column, &oxidized);
        self.column += 1;
    }

    fn finish(self) -> (DMatrix<f64>, DMatrix<f64>) {
        (self.reduced, self.oxidized)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experiment, Kinetics};
    use crate::physics::Waveform;
    use crate::solver::ProfileHistory;
    use approx::assert_relative_eq;

    fn step_waveform(samples: usize, duration: f64, potential: f64) -> Waveform {
        let time = (0..samples)
            .map(|k| duration * k as f64 / (samples - 1) as f64)
            .collect();
        Waveform::new(time, vec![potential; samples]).unwrap()
    }

    fn sweep_waveform(samples: usize, scan_rate: f64) -> Waveform {
        // −0.5 V → 0.5 V → −0.5 V
        let half = samples / 2;
        let duration = 2.0 / scan_rate;
        let time = (0..2 * half)
            .map(|k| duration * k as f64 / (2 * half - 1) as f64)
            .collect();
        let potential = (0..2 * half)
            .map(|k| {
                if k < half {
                    -0.5 + k as f64 / (half - 1) as f64
                } else {
                    0.5 - (k - half) as f64 / (half - 1) as f64
                }
            })
            .collect();
        Waveform::new(time, potential).unwrap()
    }

    #[test]
    fn test_result_shapes_with_full_history() {
        let scenario = Scenario::new(Experiment::default(), step_waveform(60, 1.0, 0.5));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        let nx = Grid::build(60, 0.45).unwrap().distance_steps;
        assert_eq!(result.len(), 60);
        assert_eq!(result.distance.len(), nx);
        assert_eq!(result.concentration_reduced.shape(), (nx, 60));
        assert_eq!(result.concentration_oxidized.shape(), (nx, 60));
        assert_eq!(result.profile_steps, (0..60).collect::<Vec<_>>());
        assert!(result.faradaic_current.is_none());
        assert_eq!(result.current[0], 0.0);
        assert_eq!(result.get_metadata("kinetics"), Some("Nernst"));
    }

    #[test]
    fn test_initial_layer_is_bulk() {
        let scenario = Scenario::new(Experiment::default(), step_waveform(40, 1.0, 0.5));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        let (reduced, oxidized) = result.profiles_at(0).unwrap();
        assert!(reduced.iter().all(|&c| c == 5e-6));
        assert!(oxidized.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_oxidation_depletes_surface_and_keeps_bulk() {
        let scenario = Scenario::new(Experiment::default(), step_waveform(100, 1.0, 0.5));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        let (reduced, oxidized) = result.final_profiles();
        let last = reduced.len() - 1;
        assert!(reduced[0] < 1e-12);
        assert_relative_eq!(oxidized[0], 5e-6, max_relative = 1e-6);
        assert_eq!(reduced[last], 5e-6);
        assert!(result.current.iter().skip(1).all(|&i| i > 0.0));
    }

    #[test]
    fn test_reduction_gives_negative_current() {
        let experiment = Experiment::default().with_bulk_concentrations(5e-6, 0.0);
        let scenario = Scenario::new(experiment, step_waveform(100, 1.0, -0.5));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        assert!(result.current.iter().skip(1).all(|&i| i < 0.0));
        let (reduced, oxidized) = result.final_profiles();
        assert!(oxidized[0] < 1e-12);
        assert_relative_eq!(reduced[0], 5e-6, max_relative = 1e-6);
    }

    #[test]
    fn test_concentrations_stay_within_bulk_range() {
        let scenario = Scenario::new(Experiment::default(), sweep_waveform(400, 0.1));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        let tolerance = 5e-6 * 1e-12;
        for matrix in [&result.concentration_reduced, &result.concentration_oxidized] {
            assert!(matrix.iter().all(|&c| c >= -tolerance && c <= 5e-6 + tolerance));
        }
    }

    #[test]
    fn test_both_species_at_equilibrium_stay_put() {
        // E = E0 + (RT/F)·ln(c_O/c_R) is the equilibrium potential: nothing happens
        let c_o: f64 = 1e-6;
        let c_r: f64 = 4e-6;
        let constants = PhysicalConstants::default();
        let equilibrium = (c_o / c_r).ln() / constants.f_over_rt();

        let experiment = Experiment::default().with_bulk_concentrations(c_o, c_r);
        let scenario = Scenario::new(experiment, step_waveform(80, 1.0, equilibrium));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        assert!(result.current.iter().all(|i| i.abs() < 1e-12));
        let (reduced, oxidized) = result.final_profiles();
        for node in 0..reduced.len() {
            assert_relative_eq!(reduced[node], c_r, max_relative = 1e-9);
            assert_relative_eq!(oxidized[node], c_o, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_progress_reports_and_does_not_change_results() {
        let scenario = Scenario::new(Experiment::default(), sweep_waveform(300, 1.0));
        let config = SolverConfiguration::default().with_progress_interval(50);
        let solver = ExplicitSolver::new();

        let mut reports = Vec::new();
        let observed = solver
            .solve_with_progress(&scenario, &config, &mut |p| reports.push(p))
            .unwrap();
        let silent = solver.solve(&scenario, &config).unwrap();

        assert_eq!(observed, silent);
        let steps: Vec<usize> = reports.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![50, 100, 150, 200, 250, 299]);
        assert!(reports.last().unwrap().is_complete());
    }

    #[test]
    fn test_reduced_history_matches_full_history() {
        let scenario = Scenario::new(Experiment::default(), sweep_waveform(200, 0.5));
        let solver = ExplicitSolver::new();

        let full = solver.solve(&scenario, &SolverConfiguration::default()).unwrap();
        let sparse = solver
            .solve(
                &scenario,
                &SolverConfiguration::default().with_profile_history(ProfileHistory::Every(40)),
            )
            .unwrap();
        let last = solver
            .solve(
                &scenario,
                &SolverConfiguration::default().with_profile_history(ProfileHistory::FinalOnly),
            )
            .unwrap();

        assert_eq!(full.current, sparse.current);
        assert_eq!(full.current, last.current);

        assert_eq!(sparse.profile_steps, vec![0, 40, 80, 120, 160, 199]);
        for &step in &sparse.profile_steps {
            let (expected, _) = full.profiles_at(step).unwrap();
            let (actual, _) = sparse.profiles_at(step).unwrap();
            assert_eq!(expected, actual);
        }

        assert_eq!(last.concentration_oxidized.ncols(), 1);
        assert_eq!(last.final_profiles(), full.final_profiles());
    }

    #[test]
    fn test_divergence_is_reported_for_fast_oxidized_diffusion() {
        // λ·DO/DR = 0.45·2.5 > 0.5
        let experiment = Experiment::default().with_diffusion_coefficients(2.5e-5, 1e-5);
        let scenario = Scenario::new(experiment, step_waveform(100, 10.0, 0.5));

        let err = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap_err();

        match err {
            SimulationError::Divergence { step, species, .. } => {
                assert_eq!(species, Species::Oxidized);
                assert!(step < 100);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn test_configuration_errors_come_first() {
        let scenario = Scenario::new(Experiment::default(), step_waveform(50, 1.0, 0.5));
        let config = SolverConfiguration::default().with_stability_ratio(0.5);
        let err = ExplicitSolver::new().solve(&scenario, &config).unwrap_err();
        assert!(err.is_configuration());

        let experiment = Experiment::default().with_kinetics(Kinetics::butler_volmer(0.0, 0.5));
        let scenario = Scenario::new(experiment, step_waveform(50, 1.0, 0.5));
        let err = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_uneven_sampling_is_rejected() {
        // Same 0.5 V step, samples crowded towards t = 0
        let time: Vec<f64> = (0..200)
            .map(|k| {
                let x = k as f64 / 199.0;
                10.0 * x * x
            })
            .collect();
        let waveform = Waveform::new(time, vec![0.5; 200]).unwrap();
        let scenario = Scenario::new(Experiment::default(), waveform);

        let err = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(
            err,
            SimulationError::Configuration(ConfigurationError::NonUniformWaveform { index: 2, .. })
        ));
        assert!(err.to_string().contains("sample 2"));
    }

    #[test]
    fn test_circuit_reports_total_and_faradaic_currents() {
        let experiment = Experiment::default().with_double_layer(20e-4, 100.0);
        let scenario = Scenario::new(experiment, sweep_waveform(400, 0.1));
        let result = ExplicitSolver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        let faradaic = result.faradaic_current.as_ref().unwrap();
        assert_eq!(faradaic.len(), result.current.len());
        assert_ne!(faradaic, &result.current);
    }

    #[test]
    fn test_temperature_changes_the_result() {
        let scenario = Scenario::new(Experiment::default(), sweep_waveform(200, 0.1));
        let config = SolverConfiguration::default();
        let warm = ExplicitSolver::with_constants(PhysicalConstants::default().with_temperature(350.0))
            .solve(&scenario, &config)
            .unwrap();
        let room = ExplicitSolver::new().solve(&scenario, &config).unwrap();

        // Hotter: broader wave, lower peak
        assert!(warm.peak_current().1 < room.peak_current().1);
    }
}
