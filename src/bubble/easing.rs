// ============================================================================
// EASING + TWEENS shared by every bubble transition
// ============================================================================

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use bevy::math::DVec2;

/// Raised-cosine ease: slow start, slow finish, no overshoot.
///
/// Input is clamped to [0, 1] so callers can pass raw `elapsed / duration`.
pub fn raised_cosine(x: f64) -> f64 {
    0.5 - 0.5 * (PI * x.clamp(0.0, 1.0)).cos()
}

/// Normalized elapsed time of a transition, clamped to [0, 1].
///
/// A non-positive duration counts as already finished.
pub fn elapsed_fraction(start_time: f64, duration: f64, now: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((now - start_time) / duration).clamp(0.0, 1.0)
}

/// Anything a tween can interpolate (scalars and 2D sizes).
pub trait Lerp: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> {}

impl Lerp for f64 {}
impl Lerp for DVec2 {}

/// An eased interpolation from `start_value` to `end_value`.
///
/// Retargeting always captures the in-flight value as the new start, so an
/// interrupted tween never snaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    pub start_value: T,
    pub end_value: T,
    pub start_time: f64,
    pub duration: f64,
}

impl<T: Lerp> Tween<T> {
    /// A tween that is already settled at `value`.
    pub fn settled(value: T, duration: f64) -> Self {
        Self {
            start_value: value,
            end_value: value,
            start_time: f64::NEG_INFINITY,
            duration,
        }
    }

    pub fn new(start_value: T, end_value: T, start_time: f64, duration: f64) -> Self {
        Self {
            start_value,
            end_value,
            start_time,
            duration,
        }
    }

    /// Eased value at `now`.
    pub fn value(&self, now: f64) -> T {
        let t = elapsed_fraction(self.start_time, self.duration, now);
        if t >= 1.0 {
            return self.end_value;
        }
        self.start_value + (self.end_value - self.start_value) * raised_cosine(t)
    }

    /// Replace the target, starting from wherever the tween currently is.
    pub fn retarget(&mut self, end_value: T, now: f64) {
        self.start_value = self.value(now);
        self.end_value = end_value;
        self.start_time = now;
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.end_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(raised_cosine(0.0), 0.0);
        assert!((raised_cosine(1.0) - 1.0).abs() < 1e-12);
        assert!((raised_cosine(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(raised_cosine(-3.0), 0.0);
        assert!((raised_cosine(7.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tween_boundaries() {
        let tween = Tween::new(4.0, 10.0, 2.0, 0.5);
        assert_eq!(tween.value(2.0), 4.0, "value at start time must be the start value");
        assert_eq!(tween.value(2.5), 10.0, "value at end time must be the end value");
        assert_eq!(tween.value(100.0), 10.0);
        assert_eq!(tween.value(-100.0), 4.0);
    }

    #[test]
    fn test_tween_monotonic_without_overshoot() {
        for (start, end) in [(0.0, 30.0), (30.0, 0.0), (12.5, 12.75)] {
            let tween = Tween::new(start, end, 1.0, 0.4);
            let mut prev = tween.value(1.0);
            for step in 1..=400 {
                let now = 1.0 + 0.4 * step as f64 / 400.0;
                let v = tween.value(now);
                if end > start {
                    assert!(v >= prev - 1e-12, "not monotonic at {now}: {prev} -> {v}");
                    assert!(v <= end + 1e-12, "overshoot at {now}: {v}");
                } else {
                    assert!(v <= prev + 1e-12, "not monotonic at {now}: {prev} -> {v}");
                    assert!(v >= end - 1e-12, "overshoot at {now}: {v}");
                }
                prev = v;
            }
        }
    }

    #[test]
    fn test_retarget_starts_from_in_flight_value() {
        let mut tween = Tween::new(0.0, 1.0, 0.0, 1.0);
        let mid = tween.value(0.3);
        tween.retarget(0.0, 0.3);
        assert_eq!(tween.start_value, mid);
        assert_eq!(tween.value(0.3), mid, "retarget must not snap");
        assert_eq!(tween.value(1.3), 0.0);
    }

    #[test]
    fn test_vector_tween() {
        let tween = Tween::new(DVec2::new(10.0, 20.0), DVec2::new(30.0, 20.0), 0.0, 2.0);
        let half = tween.value(1.0);
        assert!((half.x - 20.0).abs() < 1e-9);
        assert!((half.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let tween = Tween::new(1.0, 5.0, 3.0, 0.0);
        assert_eq!(tween.value(3.0), 5.0);
        assert!(tween.is_finished(3.0));
    }

    #[test]
    fn test_settled_tween_is_constant() {
        let tween = Tween::settled(DVec2::new(3.0, 4.0), 0.5);
        assert_eq!(tween.value(0.0), DVec2::new(3.0, 4.0));
        assert!(tween.is_finished(-1.0e9));
    }
}
