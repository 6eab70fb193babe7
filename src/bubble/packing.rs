//! Perimeter packing: choose circle diameters that tile a length exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sum and bound tolerance used throughout the engine.
pub const TOLERANCE: f64 = 1e-3;

/// Counts whose size lands this close to the best one are considered ties.
const TIE_WINDOW: f64 = 0.01;

/// Guards ceil/floor against values like 100.0 / 20.0 = 4.999999.
const COUNT_EPSILON: f64 = 1e-9;

/// Output of [`pack`]. `diameters` sums to the requested length unless
/// `is_valid` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingResult {
    pub diameters: Vec<f64>,
    pub is_valid: bool,
}

impl PackingResult {
    fn empty(is_valid: bool) -> Self {
        PackingResult {
            diameters: Vec::new(),
            is_valid,
        }
    }

    pub fn total(&self) -> f64 {
        self.diameters.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.diameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diameters.is_empty()
    }
}

/// Pack `length` with circles whose diameters lie in `[min_diameter, max_diameter]`.
///
/// Equal-size solutions are preferred, picking the count whose size is closest
/// to the middle of the range; ties are broken with a generator seeded from
/// `seed`, so identical inputs always give identical output. When no equal
/// split exists a round-robin fallback is tried, and infeasible inputs come
/// back with `is_valid == false` instead of an error.
pub fn pack(length: f64, min_diameter: f64, max_diameter: f64, seed: u64) -> PackingResult {
    if !(length > 0.0) || !length.is_finite() {
        return PackingResult::empty(true);
    }

    let (a, b, mut is_valid) = if max_diameter < min_diameter {
        log::warn!(
            "circle diameter range arrived swapped (min={min_diameter}, max={max_diameter})"
        );
        (max_diameter, min_diameter, false)
    } else {
        (min_diameter, max_diameter, true)
    };

    if !(a > 0.0) || !b.is_finite() {
        log::warn!("cannot pack with diameter range [{a}, {b}]");
        return PackingResult::empty(false);
    }

    let average = (a + b) * 0.5;
    let min_count = ((length / b - COUNT_EPSILON).ceil() as usize).max(1);
    let max_count = (length / a + COUNT_EPSILON).floor() as usize;

    let diameters = if min_count <= max_count {
        let count = choose_equal_count(length, average, min_count, max_count, seed);
        vec![length / count as f64; count]
    } else {
        let (diameters, fallback_ok) = round_robin_fallback(length, a, b);
        is_valid &= fallback_ok;
        diameters
    };

    let within_bounds = diameters
        .iter()
        .all(|&d| d >= a - TOLERANCE && d <= b + TOLERANCE);
    let total: f64 = diameters.iter().sum();
    if !within_bounds || (total - length).abs() > TOLERANCE {
        is_valid = false;
    }

    PackingResult {
        diameters,
        is_valid,
    }
}

/// Pick the equal-split count whose circle size is closest to `average`.
fn choose_equal_count(
    length: f64,
    average: f64,
    min_count: usize,
    max_count: usize,
    seed: u64,
) -> usize {
    let deviation = |m: usize| (length / m as f64 - average).abs();

    let best = (min_count..=max_count)
        .map(deviation)
        .fold(f64::INFINITY, f64::min);

    let ties: Vec<usize> = (min_count..=max_count)
        .filter(|&m| deviation(m) - best <= TIE_WINDOW)
        .collect();

    match ties.len() {
        0 => min_count,
        1 => ties[0],
        n => {
            let mut rng = StdRng::seed_from_u64(seed);
            ties[rng.random_range(0..n)]
        }
    }
}

/// Start from as many minimum-size circles as fit, then grow them round-robin
/// up to the maximum. If a full pass cannot absorb the leftover, one extra
/// circle of exactly the leftover size is allowed when it fits the range.
///
/// Returns the diameters and whether the leftover was fully placed.
fn round_robin_fallback(length: f64, a: f64, b: f64) -> (Vec<f64>, bool) {
    let count = ((length / a + COUNT_EPSILON).floor() as usize).max(1);
    let mut diameters = vec![a; count];
    let mut leftover = length - count as f64 * a;

    if leftover < -TOLERANCE {
        // Even a single minimum-size circle is longer than the perimeter.
        return (diameters, false);
    }

    while leftover > COUNT_EPSILON {
        let mut added = 0.0;
        for d in diameters.iter_mut() {
            if leftover <= COUNT_EPSILON {
                break;
            }
            let grow = (b - *d).max(0.0).min(leftover);
            *d += grow;
            leftover -= grow;
            added += grow;
        }

        if leftover <= COUNT_EPSILON {
            break;
        }
        if added <= COUNT_EPSILON {
            if leftover >= a - TOLERANCE && leftover <= b + TOLERANCE {
                diameters.push(leftover);
                return (diameters, true);
            }
            return (diameters, false);
        }
    }

    (diameters, true)
}
