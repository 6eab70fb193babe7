//! Thinking ↔ Talking morph and the rendering parameters derived from it.

use std::fmt;

use serde::Deserialize;

use super::easing::Tween;

/// Lowest alpha threshold handed to the fuse filter; zero would fuse everything.
const MIN_ALPHA_THRESHOLD: f64 = 0.001;
const BASE_ALPHA_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleMode {
    /// Circle cluster around the content.
    #[default]
    Thinking,
    /// Flat bubble; circles collapsed into the center.
    Talking,
    /// Flat bubble with the circle cluster removed entirely.
    Read,
}

impl BubbleMode {
    /// Morph progress this mode settles at. Read shares Talking's flat shape.
    pub fn morph_target(self) -> f64 {
        match self {
            BubbleMode::Thinking => 0.0,
            BubbleMode::Talking | BubbleMode::Read => 1.0,
        }
    }

    pub fn shows_circles(self) -> bool {
        self != BubbleMode::Read
    }
}

impl fmt::Display for BubbleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BubbleMode::Thinking => write!(f, "thinking"),
            BubbleMode::Talking => write!(f, "talking"),
            BubbleMode::Read => write!(f, "read"),
        }
    }
}

/// Morph progress between Thinking (0) and Talking (1).
///
/// A new target always starts from the progress reached so far, so flipping
/// modes mid-morph reverses smoothly instead of snapping to 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphState {
    tween: Tween<f64>,
}

impl MorphState {
    pub fn new(mode: BubbleMode, duration: f64) -> Self {
        Self {
            tween: Tween::settled(mode.morph_target(), duration),
        }
    }

    /// Aim at `mode`'s target. Returns false when already heading there.
    pub fn set_mode(&mut self, mode: BubbleMode, now: f64) -> bool {
        let target = mode.morph_target();
        if self.tween.end_value == target {
            return false;
        }
        self.tween.retarget(target, now);
        true
    }

    pub fn progress(&self, now: f64) -> f64 {
        self.tween.value(now).clamp(0.0, 1.0)
    }

    pub fn target(&self) -> f64 {
        self.tween.end_value
    }

    pub fn is_morphing(&self, now: f64) -> bool {
        !self.tween.is_finished(now)
    }

    pub fn end_time(&self) -> f64 {
        self.tween.end_time()
    }
}

/// Padding between the content and the filled shape.
pub fn padding_at(base_padding: f64, progress: f64) -> f64 {
    base_padding * (1.0 - progress)
}

pub fn blur_at(base_blur: f64, progress: f64) -> f64 {
    base_blur * (1.0 - progress)
}

/// Alpha cutoff for the fuse filter.
pub fn alpha_threshold_at(progress: f64) -> f64 {
    (BASE_ALPHA_THRESHOLD * (1.0 - progress)).max(MIN_ALPHA_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: f64 = 0.5;

    #[test]
    fn test_starts_settled_at_mode_target() {
        let thinking = MorphState::new(BubbleMode::Thinking, DURATION);
        assert_eq!(thinking.progress(0.0), 0.0);
        assert!(!thinking.is_morphing(0.0));

        let talking = MorphState::new(BubbleMode::Talking, DURATION);
        assert_eq!(talking.progress(0.0), 1.0);
    }

    #[test]
    fn test_morph_reaches_target() {
        let mut morph = MorphState::new(BubbleMode::Thinking, DURATION);
        assert!(morph.set_mode(BubbleMode::Talking, 1.0));
        assert_eq!(morph.progress(1.0), 0.0);
        assert!(morph.is_morphing(1.25));
        assert_eq!(morph.progress(1.5), 1.0);
        assert!(!morph.is_morphing(1.5));
    }

    #[test]
    fn test_flip_mid_morph_restarts_from_current_progress() {
        let mut morph = MorphState::new(BubbleMode::Thinking, DURATION);
        morph.set_mode(BubbleMode::Talking, 0.0);
        let reached = morph.progress(0.25);
        assert!(reached > 0.0 && reached < 1.0);

        morph.set_mode(BubbleMode::Thinking, 0.25);
        assert_eq!(morph.progress(0.25), reached, "mode flip must not snap");
        assert!(morph.progress(0.375) < reached);
        assert_eq!(morph.progress(0.75), 0.0);
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut morph = MorphState::new(BubbleMode::Thinking, DURATION);
        morph.set_mode(BubbleMode::Talking, 0.0);
        assert!(!morph.set_mode(BubbleMode::Read, 0.25), "Read shares Talking's target");
        assert_eq!(morph.end_time(), DURATION);
    }

    #[test]
    fn test_derived_parameters() {
        assert_eq!(padding_at(10.0, 0.0), 10.0);
        assert_eq!(padding_at(10.0, 1.0), 0.0);
        assert_eq!(blur_at(6.0, 0.5), 3.0);
        assert!((alpha_threshold_at(0.0) - 0.2).abs() < 1e-12);
        assert_eq!(alpha_threshold_at(1.0), 0.001);
        assert!((alpha_threshold_at(0.5) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_read_hides_circles() {
        assert!(BubbleMode::Thinking.shows_circles());
        assert!(BubbleMode::Talking.shows_circles());
        assert!(!BubbleMode::Read.shows_circles());
    }
}
