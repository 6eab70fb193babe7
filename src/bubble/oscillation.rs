//! Breathing plan: how far, when, and which way each circle oscillates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mixed into the instance seed so phases are not correlated with packing tie-breaks.
const PHASE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-circle oscillation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillationSpec {
    pub base_diameter: f64,
    /// Largest deviation that keeps the circle inside the diameter range.
    pub amplitude: f64,
    /// Offset into the cycle, in [0, 1).
    pub phase: f64,
    /// +1 for even indices, -1 for odd, so neighbours breathe against each other.
    pub direction: f64,
}

/// Derive an oscillation plan for `base_diameters`.
///
/// Phases come from a generator seeded with `seed`, drawn in index order, so a
/// plan for `n` circles is a prefix of the plan for `n + 1`.
pub fn plan(
    base_diameters: &[f64],
    min_diameter: f64,
    max_diameter: f64,
    seed: u64,
) -> Vec<OscillationSpec> {
    let mut rng = StdRng::seed_from_u64(seed ^ PHASE_STREAM);

    base_diameters
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            // Transitions can place a base outside the range; it then holds still.
            let amplitude = (max_diameter - base).min(base - min_diameter).max(0.0);
            OscillationSpec {
                base_diameter: base,
                amplitude,
                phase: rng.random::<f64>(),
                direction: if i % 2 == 0 { 1.0 } else { -1.0 },
            }
        })
        .collect()
}
