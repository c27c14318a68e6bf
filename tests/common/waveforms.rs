//! Waveform builders shared by the integration tests

use echem_rs::physics::Waveform;

/// `samples` points evenly spaced over `[start, end]`
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|k| start + (end - start) * k as f64 / (samples - 1) as f64)
        .collect()
}

/// Constant potential held for `duration` seconds
pub fn potential_step(duration: f64, samples: usize, potential: f64) -> Waveform {
    Waveform::new(linspace(0.0, duration, samples), vec![potential; samples])
        .expect("step waveform is valid")
}

/// Triangular sweep between `initial` and `vertex`, `sweeps` half cycles
///
/// Each half cycle holds `round(|vertex − initial| / increment)` samples
/// and lasts `|vertex − initial| / scan_rate` seconds.
pub fn sweep(initial: f64, vertex: f64, scan_rate: f64, increment: f64, sweeps: usize) -> Waveform {
    let window = (vertex - initial).abs();
    let per_sweep = (window / increment).round() as usize;
    let duration = window / scan_rate * sweeps as f64;

    let potential: Vec<f64> = (0..sweeps)
        .flat_map(|s| {
            if s % 2 == 0 {
                linspace(initial, vertex, per_sweep)
            } else {
                linspace(vertex, initial, per_sweep)
            }
        })
        .collect();

    Waveform::new(linspace(0.0, duration, per_sweep * sweeps), potential).expect("sweep waveform is valid")
}
