//! Zero-sum oscillation: live diameters that breathe while their total stays fixed.

use std::f64::consts::TAU;

use super::oscillation::OscillationSpec;
use super::packing::TOLERANCE;

/// Live diameters at oscillation progress `progress` (in [0, 1)), corrected so
/// they sum to `target_length`.
///
/// Each circle's bounds are widened to include its own base, so circles that
/// are mid-transition (base outside `[min_diameter, max_diameter]`) are never
/// yanked back into range. Circles flagged in `fading` are on their way out and
/// may shrink all the way to zero; a missing flag counts as not fading.
/// Output is empty for empty input or a non-positive target.
pub fn animate(
    specs: &[OscillationSpec],
    fading: &[bool],
    progress: f64,
    target_length: f64,
    min_diameter: f64,
    max_diameter: f64,
) -> Vec<f64> {
    if specs.is_empty() || !(target_length > 0.0) {
        return Vec::new();
    }

    let bounds: Vec<(f64, f64)> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let lower = if fading.get(i).copied().unwrap_or(false) {
                0.0
            } else {
                min_diameter.min(spec.base_diameter).max(0.0)
            };
            let upper = max_diameter.max(spec.base_diameter).max(lower);
            (lower, upper)
        })
        .collect();

    let mut diameters: Vec<f64> = specs
        .iter()
        .map(|spec| {
            let phased = (progress + spec.phase).rem_euclid(1.0);
            let oscillation = (TAU * phased).sin();
            spec.base_diameter + spec.direction * spec.amplitude * oscillation
        })
        .collect();

    let error = diameters.iter().sum::<f64>() - target_length;
    if error.abs() > TOLERANCE {
        distribute_weighted(&mut diameters, &bounds, error);
    }

    let residual = diameters.iter().sum::<f64>() - target_length;
    if residual.abs() > TOLERANCE {
        let share = residual / diameters.len() as f64;
        for (d, &(lower, upper)) in diameters.iter_mut().zip(&bounds) {
            *d = (*d - share).clamp(lower, upper);
        }
    }

    diameters
}

/// Spread `error` over the circles in proportion to how far each can move
/// in the correcting direction, clamping to each circle's bounds.
fn distribute_weighted(diameters: &mut [f64], bounds: &[(f64, f64)], error: f64) {
    let weights: Vec<f64> = diameters
        .iter()
        .zip(bounds)
        .map(|(&d, &(lower, upper))| {
            if error > 0.0 {
                (d - lower).max(0.0)
            } else {
                (upper - d).max(0.0)
            }
        })
        .collect();

    let total_weight: f64 = weights.iter().sum();
    if total_weight <= f64::EPSILON {
        return;
    }

    for ((d, &weight), &(lower, upper)) in diameters.iter_mut().zip(&weights).zip(bounds) {
        *d = (*d - error * weight / total_weight).clamp(lower, upper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::oscillation::plan;
    use crate::bubble::packing::pack;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_points() -> impl Iterator<Item = f64> {
        (0..100).map(|i| i as f64 / 100.0)
    }

    #[test]
    fn test_sum_preserved_for_valid_packings() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut checked = 0;
        while checked < 60 {
            let a = rng.random_range(6.0..24.0);
            let b = a + rng.random_range(0.5..20.0);
            let length = rng.random_range(80.0..1600.0);
            let seed: u64 = rng.random();
            let packing = pack(length, a, b, seed);
            if !packing.is_valid {
                continue;
            }
            checked += 1;

            let specs = plan(&packing.diameters, a, b, seed);
            for p in sample_points() {
                let live = animate(&specs, &[], p, length, a, b);
                let sum: f64 = live.iter().sum();
                assert!(
                    (sum - length).abs() < TOLERANCE,
                    "sum {sum} != {length} at p={p} (range [{a}, {b}])"
                );
            }
        }
    }

    #[test]
    fn test_bounds_respected() {
        let (a, b) = (14.0, 30.0);
        let packing = pack(640.0, a, b, 3);
        assert!(packing.is_valid);
        let specs = plan(&packing.diameters, a, b, 3);
        for p in sample_points() {
            for (d, spec) in animate(&specs, &[], p, 640.0, a, b).iter().zip(&specs) {
                let lower = a.min(spec.base_diameter);
                let upper = b.max(spec.base_diameter);
                assert!(
                    *d >= lower - 1e-9 && *d <= upper + 1e-9,
                    "{d} outside [{lower}, {upper}] at p={p}"
                );
            }
        }
    }

    #[test]
    fn test_circles_actually_breathe() {
        let (a, b) = (10.0, 30.0);
        let specs = plan(&[20.0; 10], a, b, 21);
        let start = animate(&specs, &[], 0.0, 200.0, a, b);
        let later = animate(&specs, &[], 0.37, 200.0, a, b);
        assert!(
            start.iter().zip(&later).any(|(x, y)| (x - y).abs() > 1e-3),
            "diameters should change over the cycle"
        );
    }

    #[test]
    fn test_corrects_toward_new_target_length() {
        // Bases sum to 200 but the path is now 220: circles grow to fill it.
        let (a, b) = (10.0, 30.0);
        let specs = plan(&[20.0; 10], a, b, 4);
        let live = animate(&specs, &[], 0.25, 220.0, a, b);
        assert!((live.iter().sum::<f64>() - 220.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_appearing_circle_with_zero_base_never_negative() {
        let (a, b) = (10.0, 30.0);
        let specs = plan(&[20.0, 20.0, 0.0], a, b, 8);
        for p in sample_points() {
            let live = animate(&specs, &[], p, 30.0, a, b);
            assert!(live.iter().all(|&d| d >= 0.0), "negative diameter at p={p}: {live:?}");
        }
    }

    #[test]
    fn test_fading_circles_give_way_to_a_shorter_outline() {
        // Two circles are fading out while the outline has already shrunk
        // below what five minimum-size circles would need.
        let (a, b) = (15.0, 25.0);
        let specs = plan(&[20.0, 20.0, 20.0, 20.0, 20.0], a, b, 6);
        let fading = [false, false, false, true, true];
        for p in sample_points() {
            let live = animate(&specs, &fading, p, 60.0, a, b);
            let sum: f64 = live.iter().sum();
            assert!((sum - 60.0).abs() < TOLERANCE, "sum {sum} != 60 at p={p}");
            assert!(live.iter().all(|&d| d >= 0.0));
            assert!(live[..3].iter().all(|&d| d >= a - 1e-9), "survivors stay in range");
        }

        // Without the flags the fading circles hold their size and the sum overshoots.
        let stuck = animate(&specs, &[], 0.0, 60.0, a, b);
        assert!(stuck.iter().sum::<f64>() - 60.0 > TOLERANCE);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(animate(&[], &[], 0.5, 100.0, 10.0, 20.0).is_empty());
        let specs = plan(&[20.0; 3], 10.0, 30.0, 0);
        assert!(animate(&specs, &[], 0.5, 0.0, 10.0, 30.0).is_empty());
        assert!(animate(&specs, &[], 0.5, -4.0, 10.0, 30.0).is_empty());
    }
}
