//! Physical constants
//!
//! The Faraday constant, the gas constant and the temperature appear in
//! exactly two places: the normalized potential ε = nF/(RT)·(E − E0) and the
//! conversion of the normalized surface flux into a current. They are kept
//! together in one value that the solver captures at construction.
//!
//! # Example
//!
//! ```rust
//! use echem_rs::physics::PhysicalConstants;
//!
//! let constants = PhysicalConstants::default().with_temperature(310.0);
//! assert!(constants.f_over_rt() < PhysicalConstants::default().f_over_rt());
//! ```

/// Faraday constant F \[C/mol\]
pub const FARADAY: f64 = 96485.0;

/// Molar gas constant R \[J/(mol·K)\]
pub const GAS_CONSTANT: f64 = 8.315;

/// Room temperature \[K\]
pub const ROOM_TEMPERATURE: f64 = 298.0;

/// Constants used to normalize potentials and to convert fluxes into currents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Faraday constant F \[C/mol\]
    pub faraday: f64,
    /// Gas constant R \[J/(mol·K)\]
    pub gas_constant: f64,
    /// Temperature T \[K\]
    pub temperature: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            faraday: FARADAY,
            gas_constant: GAS_CONSTANT,
            temperature: ROOM_TEMPERATURE,
        }
    }
}

impl PhysicalConstants {
    /// Same constants at another temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// F/(RT) \[1/V\]
    pub fn f_over_rt(&self) -> f64 {
        self.faraday / (self.gas_constant * self.temperature)
    }

    /// Normalized potential ε = n·F/(R·T)·(E − E0)
    pub fn normalized_potential(&self, electrons: u32, potential: f64, standard_potential: f64) -> f64 {
        electrons as f64 * self.f_over_rt() * (potential - standard_potential)
    }

    /// Check all constants are positive and finite
    pub fn validate(&self) -> Result<(), crate::ConfigurationError> {
        for (name, value) in [
            ("faraday", self.faraday),
            ("gas_constant", self.gas_constant),
            ("temperature", self.temperature),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(crate::ConfigurationError::InvalidParameter {
                    name,
                    value,
                    reason: "physical constants must be positive",
                });
            }
        }
        Ok(())
    }
}
