//! Double-layer charging through the solution resistance
//!
//! The electrode is modelled as the double-layer capacitance Cd in parallel
//! with the faradaic process, in series with the uncompensated solution
//! resistance Ru. With V the potential across the double layer:
//!
//! ```text
//! I_total(k) = (E(k) − V(k−1)) / Ru
//! V(k)       = V(k−1) + dt/Cd · (I_total(k) − I_faradaic(k))
//! V(0)       = E(0)
//! ```
//!
//! The observable current is then `I_total`. The update is explicit, so it
//! stays stable only while `dt < 2·Ru·Cd`.

use crate::ConfigurationError;

/// Lumped Cd/Ru parameters
///
/// Both zero means no circuit (the default).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleLayer {
    /// Double-layer capacitance Cd \[F\]
    pub capacitance: f64,
    /// Uncompensated solution resistance Ru \[Ω\]
    pub resistance: f64,
}

impl DoubleLayer {
    /// Circuit with the given capacitance \[F\] and resistance \[Ω\]
    pub fn new(capacitance: f64, resistance: f64) -> Self {
        Self {
            capacitance,
            resistance,
        }
    }

    /// No circuit
    pub fn disabled() -> Self {
        Self::default()
    }

    /// True when the circuit takes part in the run
    pub fn is_enabled(&self) -> bool {
        self.capacitance > 0.0 && self.resistance > 0.0
    }

    /// Time constant Ru·Cd \[s\]
    pub fn time_constant(&self) -> f64 {
        self.capacitance * self.resistance
    }

    /// Check the parameters
    ///
    /// Negative or non-finite values are rejected, as is giving only one of
    /// the two.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [("capacitance", self.capacitance), ("resistance", self.resistance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }
        if (self.capacitance == 0.0) != (self.resistance == 0.0) {
            return Err(ConfigurationError::IncompleteCircuit {
                capacitance: self.capacitance,
                resistance: self.resistance,
            });
        }
        Ok(())
    }
}

/// Running state of the circuit during one simulation
#[derive(Debug, Clone)]
pub struct CircuitState {
    circuit: DoubleLayer,
    voltage: f64,
}

impl CircuitState {
    /// Start with the double layer charged to the first applied potential
    pub fn new(circuit: DoubleLayer, initial_potential: f64) -> Self {
        Self {
            circuit,
            voltage: initial_potential,
        }
    }

    /// Potential across the double layer \[V\]
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Advance by `dt` seconds and return the total current \[A\]
    pub fn step(&mut self, applied: f64, dt: f64, faradaic: f64) -> f64 {
        let total = (applied - self.voltage) / self.circuit.resistance;
        self.voltage += dt / self.circuit.capacitance * (total - faradaic);
        total
    }
}
