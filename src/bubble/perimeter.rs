//! Circle placement along a rounded-rectangle outline.

use bevy::math::DVec2;

use super::geometry::RoundedRect;

/// Center point of every circle when the necklace of `diameters` is laid
/// edge to edge around `rect`, then rotated by `movement` (a fraction of one
/// full lap, in [0, 1)).
pub fn place_circles(rect: &RoundedRect, diameters: &[f64], movement: f64) -> Vec<DVec2> {
    let perimeter = rect.perimeter();
    if perimeter <= 0.0 || diameters.is_empty() {
        return Vec::new();
    }

    let offset = movement * perimeter;
    let mut travelled = 0.0;
    diameters
        .iter()
        .map(|&diameter| {
            let center_distance = travelled + diameter * 0.5;
            travelled += diameter;
            rect.point_at(center_distance + offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::geometry::Segment;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rects() -> Vec<RoundedRect> {
        vec![
            RoundedRect::new(200.0, 60.0, 18.0),
            RoundedRect::new(60.0, 200.0, 30.0),
            RoundedRect::new(80.0, 80.0, 40.0),
            RoundedRect::new(150.0, 40.0, 0.0),
            RoundedRect::new(33.3, 91.7, 7.25),
        ]
    }

    #[test]
    fn test_periodicity() {
        let mut rng = StdRng::seed_from_u64(17);
        for rect in rects() {
            let perimeter = rect.perimeter();
            for _ in 0..200 {
                let d = rng.random_range(-3.0 * perimeter..3.0 * perimeter);
                let a = rect.point_at(d);
                let b = rect.point_at(d + perimeter);
                assert!(a.distance(b) < 1e-6, "{rect:?}: {a:?} != {b:?} at d={d}");
            }
        }
    }

    #[test]
    fn test_boundary_containment() {
        for rect in rects() {
            let perimeter = rect.perimeter();
            for i in 0..1000 {
                let d = perimeter * i as f64 / 1000.0;
                let point = rect.point_at(d);
                assert!(
                    rect.signed_distance(point).abs() < 1e-9,
                    "{rect:?}: point {point:?} at d={d} is off the outline"
                );
                assert!(
                    on_some_segment(&rect, point),
                    "{rect:?}: point {point:?} matches no segment"
                );
            }
        }
    }

    fn on_some_segment(rect: &RoundedRect, point: DVec2) -> bool {
        rect.segments().iter().any(|segment| match *segment {
            Segment::Line { from, to } => {
                let along = (to - from).normalize_or_zero();
                let offset = point - from;
                let t = offset.dot(along);
                let perpendicular = (offset - along * t).length();
                perpendicular < 1e-9 && t >= -1e-9 && t <= from.distance(to) + 1e-9
            }
            Segment::Arc { center, radius, .. } => (point.distance(center) - radius).abs() < 1e-9,
        })
    }

    #[test]
    fn test_continuity() {
        for rect in rects() {
            let perimeter = rect.perimeter();
            let step = perimeter / 5000.0;
            let mut prev = rect.point_at(0.0);
            for i in 1..=5000 {
                let next = rect.point_at(step * i as f64);
                assert!(
                    prev.distance(next) <= step + 1e-9,
                    "{rect:?}: jump of {} at step {i}",
                    prev.distance(next)
                );
                prev = next;
            }
        }
    }

    #[test]
    fn test_circles_tile_edge_to_edge() {
        // On a plain rectangle's top edge, centers sit at running distance + d/2.
        let rect = RoundedRect::new(400.0, 100.0, 0.0);
        let centers = place_circles(&rect, &[10.0, 20.0, 30.0], 0.0);
        for (center, expected_x) in centers.iter().zip([5.0, 20.0, 45.0]) {
            assert!((center.x - expected_x).abs() < 1e-9, "{center:?} vs x={expected_x}");
            assert_eq!(center.y, 0.0);
        }
    }

    #[test]
    fn test_movement_rotates_uniformly() {
        let rect = RoundedRect::new(200.0, 60.0, 18.0);
        let perimeter = rect.perimeter();
        let count = 12;
        let diameters = vec![perimeter / count as f64; count];
        let still = place_circles(&rect, &diameters, 0.0);
        // Rotating by exactly one circle's share moves each circle onto its neighbour.
        let rotated = place_circles(&rect, &diameters, 1.0 / count as f64);
        for i in 0..count {
            let expected = still[(i + 1) % count];
            assert!(rotated[i].distance(expected) < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_rect_places_nothing() {
        let rect = RoundedRect::new(0.0, 50.0, 4.0);
        assert!(place_circles(&rect, &[10.0, 10.0], 0.3).is_empty());
        let ok = RoundedRect::new(50.0, 50.0, 4.0);
        assert!(place_circles(&ok, &[], 0.3).is_empty());
    }
}
