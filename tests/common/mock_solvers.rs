//! Mock solvers for testing the batch runner
//!
//! These solvers skip diffusion entirely so batch behavior can be checked
//! against currents known in closed form.

use std::collections::HashMap;

use echem_rs::solver::{
    CancellationToken, Scenario, SimulationResult, Solver, SolverConfiguration, StepProgress,
};
use echem_rs::SimulationError;
use nalgebra::{DMatrix, DVector};

fn ohmic_result(scenario: &Scenario, resistance: f64) -> SimulationResult {
    let waveform = &scenario.waveform;
    SimulationResult {
        time: waveform.time().clone(),
        potential: waveform.potential().clone(),
        current: waveform.potential() / resistance,
        faradaic_current: None,
        distance: DVector::zeros(0),
        concentration_reduced: DMatrix::zeros(0, 0),
        concentration_oxidized: DMatrix::zeros(0, 0),
        profile_steps: Vec::new(),
        metadata: HashMap::new(),
    }
}

/// Current = E / R, no diffusion
///
/// i(t) = E(t) / resistance
pub struct OhmicSolver {
    pub resistance: f64,
}

impl Solver for OhmicSolver {
    fn solve_with_progress(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
        progress: &mut dyn FnMut(StepProgress),
    ) -> Result<SimulationResult, SimulationError> {
        config.validate()?;
        scenario.validate()?;

        let total = scenario.time_steps() - 1;
        progress(StepProgress { step: total, total });
        Ok(ohmic_result(scenario, self.resistance))
    }

    fn name(&self) -> &str {
        "Ohmic"
    }
}

/// Ohmic solver that cancels its batch once it has finished a run
pub struct CancellingSolver {
    pub token: CancellationToken,
}

impl Solver for CancellingSolver {
    fn solve_with_progress(
        &self,
        scenario: &Scenario,
        _config: &SolverConfiguration,
        _progress: &mut dyn FnMut(StepProgress),
    ) -> Result<SimulationResult, SimulationError> {
        self.token.cancel();
        Ok(ohmic_result(scenario, 1.0))
    }

    fn name(&self) -> &str {
        "Cancelling"
    }
}
