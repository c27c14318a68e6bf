//! Simulation result
//!
//! Everything a run hands back to the caller, already converted to physical
//! units:
//!
//! | field | unit | shape |
//! |-------|------|-------|
//! | `time`, `potential` | s, V | nT |
//! | `current` | A | nT |
//! | `distance` | cm | nX |
//! | `concentration_reduced`, `concentration_oxidized` | mol/cm³ | nX × recorded layers |
//!
//! With [`ProfileHistory::Full`](crate::solver::ProfileHistory::Full) the
//! concentration matrices hold every time layer, column k being time step k.
//! Otherwise `profile_steps` maps columns back to time steps.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector, DVectorView};

/// Output of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Time samples \[s\]
    pub time: DVector<f64>,
    /// Applied potential \[V\]
    pub potential: DVector<f64>,
    /// Observable current \[A\]; the total current when the double layer is simulated
    pub current: DVector<f64>,
    /// Faradaic current \[A\], only present when it differs from `current`
    pub faradaic_current: Option<DVector<f64>>,
    /// Node positions \[cm\]
    pub distance: DVector<f64>,
    /// Concentration of R \[mol/cm³\], one column per recorded layer
    pub concentration_reduced: DMatrix<f64>,
    /// Concentration of O \[mol/cm³\], one column per recorded layer
    pub concentration_oxidized: DMatrix<f64>,
    /// Time step of each recorded column
    pub profile_steps: Vec<usize>,
    /// Free-form run information (solver, kinetics, grid)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Add or replace a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Get a metadata entry
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Number of time samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Index and value of the largest current
    pub fn peak_current(&self) -> (usize, f64) {
        self.current.argmax()
    }

    /// Index and value of the most negative current
    pub fn cathodic_peak_current(&self) -> (usize, f64) {
        self.current.argmin()
    }

    /// Potential at which the largest current flows \[V\]
    pub fn peak_potential(&self) -> f64 {
        self.potential[self.peak_current().0]
    }

    /// Index of the time sample closest to `t`
    pub fn nearest_index(&self, t: f64) -> usize {
        self.time
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - t).abs().total_cmp(&(*b - t).abs()))
            .map(|(k, _)| k)
            .unwrap_or(0)
    }

    /// Current at the sample closest to `t` \[A\]
    pub fn current_at_time(&self, t: f64) -> f64 {
        self.current[self.nearest_index(t)]
    }

    /// Recorded profiles of R and O at time step `step`, if that layer was kept
    pub fn profiles_at(&self, step: usize) -> Option<(DVectorView<'_, f64>, DVectorView<'_, f64>)> {
        let column = self.profile_steps.binary_search(&step).ok()?;
        Some((
            self.concentration_reduced.column(column),
            self.concentration_oxidized.column(column),
        ))
    }

    /// Profiles of R and O at the last time step
    pub fn final_profiles(&self) -> (DVectorView<'_, f64>, DVectorView<'_, f64>) {
        let last = self.concentration_reduced.ncols() - 1;
        (
            self.concentration_reduced.column(last),
            self.concentration_oxidized.column(last),
        )
    }
}
