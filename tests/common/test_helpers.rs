//! Helper functions for integration tests

use echem_rs::physics::constants::{FARADAY, GAS_CONSTANT, ROOM_TEMPERATURE};

/// Relative error between computed and expected values
pub fn relative_error(computed: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-30 {
        computed.abs()
    } else {
        ((computed - expected) / expected).abs()
    }
}

/// Cottrell current after a diffusion-limited potential step \[A\]
///
/// i(t) = nFAc·√D / √(πt)
pub fn cottrell_current(electrons: u32, area: f64, concentration: f64, diffusion: f64, t: f64) -> f64 {
    electrons as f64 * FARADAY * area * concentration * diffusion.sqrt() / (std::f64::consts::PI * t).sqrt()
}

/// Randles-Sevcik peak current of a reversible couple at 298 K \[A\]
///
/// i_p = 0.4463·nFAc·√(nFvD / RT)
pub fn randles_sevcik_peak(electrons: u32, area: f64, concentration: f64, diffusion: f64, scan_rate: f64) -> f64 {
    let n = electrons as f64;
    0.4463 * n * FARADAY * area * concentration
        * (n * FARADAY * scan_rate * diffusion / (GAS_CONSTANT * ROOM_TEMPERATURE)).sqrt()
}
