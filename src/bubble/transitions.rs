//! Continuity when the circle list or the content rectangle changes.
//!
//! Circles are matched by index. Matched circles retarget from their current
//! animated value, extra old circles fade to zero and are purged afterwards,
//! and extra new circles grow from zero. Every change is an eased [`Tween`].

use bevy::math::DVec2;

use super::easing::Tween;

/// Lifecycle of one circle. Only `FadingOut` circles can be purged, and a
/// purged circle is gone for good: it leaves the necklace at once and its
/// track is dropped on the next retarget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Alive,
    FadingOut,
    Purged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleTransition {
    pub id: u64,
    pub index: usize,
    pub tween: Tween<f64>,
    pub state: TrackState,
}

impl CircleTransition {
    pub fn is_disappearing(&self) -> bool {
        self.state == TrackState::FadingOut
    }

    pub fn is_purged(&self) -> bool {
        self.state == TrackState::Purged
    }

    pub fn value(&self, now: f64) -> f64 {
        self.tween.value(now)
    }
}

/// A circle that started fading out and when it may be purged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOut {
    pub id: u64,
    pub purge_at: f64,
}

#[derive(Debug, Clone)]
pub struct CircleTransitions {
    tracks: Vec<CircleTransition>,
    next_id: u64,
    duration: f64,
}

impl CircleTransitions {
    pub fn new(duration: f64) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
            duration,
        }
    }

    /// Start with `diameters` already at full size.
    pub fn settled(diameters: &[f64], duration: f64) -> Self {
        let mut transitions = Self::new(duration);
        for (index, &diameter) in diameters.iter().enumerate() {
            let id = transitions.allocate_id();
            transitions.tracks.push(CircleTransition {
                id,
                index,
                tween: Tween::settled(diameter, duration),
                state: TrackState::Alive,
            });
        }
        transitions
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move to a new diameter list. Returns the circles that began fading out.
    pub fn retarget(&mut self, targets: &[f64], now: f64) -> Vec<FadeOut> {
        self.tracks.retain(|t| !t.is_purged());
        let mut faded = Vec::new();
        let mut matched = vec![false; targets.len()];

        for track in self.tracks.iter_mut().filter(|t| t.state == TrackState::Alive) {
            match targets.get(track.index) {
                Some(&target) => {
                    track.tween.retarget(target, now);
                    matched[track.index] = true;
                }
                None => {
                    track.tween.retarget(0.0, now);
                    track.state = TrackState::FadingOut;
                    faded.push(FadeOut {
                        id: track.id,
                        purge_at: track.tween.end_time(),
                    });
                }
            }
        }

        for (index, &target) in targets.iter().enumerate() {
            if matched[index] {
                continue;
            }
            let id = self.allocate_id();
            self.tracks.push(CircleTransition {
                id,
                index,
                tween: Tween::new(0.0, target, now, self.duration),
                state: TrackState::Alive,
            });
        }

        self.tracks.sort_by_key(|t| (t.index, t.id));
        faded
    }

    /// Purge a faded circle. Only succeeds once, and only after its fade has
    /// fully elapsed.
    pub fn purge(&mut self, id: u64, now: f64) -> bool {
        let Some(track) = self.tracks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if track.state != TrackState::FadingOut || !track.tween.is_finished(now) {
            return false;
        }
        track.state = TrackState::Purged;
        true
    }

    /// Tracks still on the necklace (alive or fading), in necklace order.
    pub fn necklace(&self) -> impl Iterator<Item = &CircleTransition> {
        self.tracks.iter().filter(|t| !t.is_purged())
    }

    /// Current diameters in necklace order, fading circles included.
    pub fn values(&self, now: f64) -> Vec<f64> {
        self.necklace().map(|t| t.value(now)).collect()
    }

    /// Every track, including purged ones not yet dropped.
    pub fn tracks(&self) -> &[CircleTransition] {
        &self.tracks
    }

    pub fn alive_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.state == TrackState::Alive)
            .count()
    }

    /// Circles on the necklace.
    pub fn len(&self) -> usize {
        self.necklace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.necklace().next().is_none()
    }
}

/// Joint width/height transition of the content rectangle. Every new size
/// replaces the previous transition, starting from the in-flight size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleTransition {
    tween: Tween<DVec2>,
}

impl RectangleTransition {
    pub fn new(size: DVec2, duration: f64) -> Self {
        Self {
            tween: Tween::settled(size, duration),
        }
    }

    pub fn size(&self, now: f64) -> DVec2 {
        self.tween.value(now)
    }

    pub fn target(&self) -> DVec2 {
        self.tween.end_value
    }

    pub fn retarget(&mut self, size: DVec2, now: f64) {
        self.tween.retarget(size, now);
    }

    pub fn is_settled(&self, now: f64) -> bool {
        self.tween.is_finished(now)
    }
}
