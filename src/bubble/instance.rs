// bubble/instance.rs

use bevy::math::DVec2;
use bevy::prelude::Component;

use super::config::BubbleConfig;
use super::geometry::RoundedRect;
use super::mode::{BubbleMode, MorphState, alpha_threshold_at, blur_at, padding_at};
use super::oscillation;
use super::packing::{PackingResult, pack};
use super::perimeter::place_circles;
use super::scene::{BubbleScene, MessageDirection, SceneCircle};
use super::schedule::{ScheduledTasks, TaskHandle};
use super::transitions::{CircleTransitions, RectangleTransition};
use super::zero_sum;

/// Two packings closer than this are the same target.
const PACKING_CHANGE_EPSILON: f64 = 1e-6;

/// Delayed work a bubble schedules on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BubbleTask {
    /// Remove a circle whose fade-out has finished.
    PurgeCircle(u64),
    /// The morph has settled; apply any queued resize.
    SettleMorph,
}

/// One animated bubble: owns its seed, transitions and scheduled tasks, and
/// produces a [`BubbleScene`] per tick.
#[derive(Component, Debug, Clone)]
pub struct BubbleInstance {
    config: BubbleConfig,
    /// Fixed for the lifetime of the bubble so re-renders look the same.
    seed: u64,
    created_at: f64,
    direction: MessageDirection,
    mode: BubbleMode,
    morph: MorphState,
    rect: RectangleTransition,
    /// Latest size requested while a morph was in flight.
    queued_size: Option<DVec2>,
    settle_task: Option<TaskHandle>,
    circles: CircleTransitions,
    packing: PackingResult,
    /// Target content size `packing` was computed for.
    packed_size: DVec2,
    tasks: ScheduledTasks<BubbleTask>,
}

impl BubbleInstance {
    /// Create a bubble in Thinking mode with its circles already in place.
    pub fn new(
        config: BubbleConfig,
        direction: MessageDirection,
        content_size: DVec2,
        seed: u64,
        now: f64,
    ) -> Self {
        let content_size = content_size.max(DVec2::ZERO);
        let packing = pack_for(&config, content_size, seed);
        if !packing.is_valid {
            log::warn!("bubble {seed:#x}: packing infeasible for content {content_size:?}");
        }

        Self {
            circles: CircleTransitions::settled(&packing.diameters, config.circle_transition_secs),
            morph: MorphState::new(BubbleMode::Thinking, config.morph_secs),
            rect: RectangleTransition::new(content_size, config.resize_secs),
            config,
            seed,
            created_at: now,
            direction,
            mode: BubbleMode::Thinking,
            queued_size: None,
            settle_task: None,
            packing,
            packed_size: content_size,
            tasks: ScheduledTasks::new(),
        }
    }

    // === Queries ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mode(&self) -> BubbleMode {
        self.mode
    }

    pub fn morph_progress(&self, now: f64) -> f64 {
        self.morph.progress(now)
    }

    pub fn is_morphing(&self, now: f64) -> bool {
        self.morph.is_morphing(now)
    }

    /// Size waiting for the current morph to settle.
    pub fn pending_size(&self) -> Option<DVec2> {
        self.queued_size
    }

    /// Content size the rectangle is heading to.
    pub fn target_size(&self) -> DVec2 {
        self.rect.target()
    }

    pub fn packing(&self) -> &PackingResult {
        &self.packing
    }

    pub fn circles(&self) -> &CircleTransitions {
        &self.circles
    }

    /// Circles that are not fading out.
    pub fn circle_count(&self) -> usize {
        self.circles.alive_count()
    }

    pub fn pending_task_count(&self) -> usize {
        self.tasks.len()
    }

    // === Mutations ===

    /// Switch modes. The morph restarts from whatever progress it has reached.
    pub fn set_mode(&mut self, mode: BubbleMode, now: f64) {
        if mode == self.mode {
            return;
        }
        log::debug!(
            "bubble {:#x}: {} -> {} at progress {:.3}",
            self.seed,
            self.mode,
            mode,
            self.morph.progress(now)
        );
        self.mode = mode;

        if self.morph.set_mode(mode, now) {
            if let Some(handle) = self.settle_task.take() {
                self.tasks.cancel(handle);
            }
            let due = self.morph.end_time() + self.config.resize_cutoff_secs;
            self.settle_task = Some(self.tasks.schedule(due, BubbleTask::SettleMorph));
        }
    }

    /// Resize the content rectangle. While a morph is in flight the size is
    /// queued (latest wins) and applied once the morph settles.
    pub fn set_content_size(&mut self, size: DVec2, now: f64) {
        let size = size.max(DVec2::ZERO);
        if self.morph.is_morphing(now) {
            log::debug!("bubble {:#x}: resize to {size:?} queued behind morph", self.seed);
            self.queued_size = Some(size);
            return;
        }
        self.queued_size = None;
        self.apply_size(size, now);
    }

    /// Start the rectangle toward `size` and retarget the circles at the same
    /// instant, so both transitions share a start time.
    fn apply_size(&mut self, size: DVec2, now: f64) {
        if (size - self.rect.target()).abs().max_element() <= PACKING_CHANGE_EPSILON {
            return;
        }
        self.rect.retarget(size, now);
        self.refresh_packing(now);
    }

    /// Drop every scheduled task and settle all animations at their targets,
    /// for when the bubble is re-triggered from scratch.
    pub fn reset(&mut self, now: f64) {
        self.tasks.cancel_all();
        self.settle_task = None;
        if let Some(size) = self.queued_size.take() {
            self.rect = RectangleTransition::new(size, self.config.resize_secs);
        } else {
            self.rect = RectangleTransition::new(self.rect.target(), self.config.resize_secs);
        }
        self.morph = MorphState::new(self.mode, self.config.morph_secs);
        self.packed_size = self.rect.target();
        self.packing = pack_for(&self.config, self.packed_size, self.seed);
        self.circles =
            CircleTransitions::settled(&self.packing.diameters, self.config.circle_transition_secs);
        log::debug!("bubble {:#x}: reset at {now:.3}", self.seed);
    }

    // === Per-frame update ===

    /// Advance to `now` and build the frame.
    pub fn tick(&mut self, now: f64) -> BubbleScene {
        self.run_due_tasks(now);
        self.refresh_packing(now);

        let progress = self.morph.progress(now);
        let content = RoundedRect::from_size(self.rect.size(now), self.config.corner_radius);
        let padding = padding_at(self.config.base_padding, progress);
        let shape = content.outset(padding);

        let circles = if self.mode.shows_circles() {
            self.circle_geometry(&content, progress, now)
        } else {
            Vec::new()
        };

        let fill_color = if self.packing.is_valid {
            self.config.fill_color(self.direction)
        } else {
            self.config.invalid_tint
        };

        BubbleScene {
            shape_size: shape.size(),
            corner_radius: shape.corner_radius,
            padding,
            blur_radius: blur_at(self.config.blur_radius, progress),
            alpha_threshold: alpha_threshold_at(progress),
            morph_progress: progress,
            fill_color,
            packing_valid: self.packing.is_valid,
            tail_anchor: self.direction.tail_anchor(),
            circles,
        }
    }

    fn run_due_tasks(&mut self, now: f64) {
        for task in self.tasks.drain_due(now) {
            match task {
                BubbleTask::PurgeCircle(id) => {
                    if self.circles.purge(id, now) {
                        log::debug!("bubble {:#x}: purged circle {id}", self.seed);
                    }
                }
                BubbleTask::SettleMorph => {
                    self.settle_task = None;
                    if let Some(size) = self.queued_size.take() {
                        log::debug!("bubble {:#x}: applying queued resize {size:?}", self.seed);
                        self.apply_size(size, now);
                    }
                }
            }
        }
    }

    /// Re-pack against the target rectangle and hand changes to the circle
    /// transitions.
    fn refresh_packing(&mut self, now: f64) {
        let target = self.rect.target();
        if target == self.packed_size {
            return;
        }
        self.packed_size = target;

        let length = packing_length(&self.config, target);
        let packing = pack(length, self.config.min_diameter, self.config.max_diameter, self.seed);
        if same_diameters(&packing.diameters, &self.packing.diameters) {
            self.packing = packing;
            return;
        }

        if !packing.is_valid {
            log::warn!(
                "bubble {:#x}: packing infeasible (length {:.2}, range [{}, {}])",
                self.seed,
                length,
                self.config.min_diameter,
                self.config.max_diameter
            );
        }
        log::debug!(
            "bubble {:#x}: circles {} -> {}",
            self.seed,
            self.packing.len(),
            packing.len()
        );

        for fade in self.circles.retarget(&packing.diameters, now) {
            self.tasks.schedule(fade.purge_at, BubbleTask::PurgeCircle(fade.id));
        }
        self.packing = packing;
    }

    fn circle_geometry(&self, content: &RoundedRect, progress: f64, now: f64) -> Vec<SceneCircle> {
        if content.is_degenerate() {
            return Vec::new();
        }

        let (min_d, max_d) = self.diameter_range();
        let path = content.outset(self.config.base_padding);
        let bases = self.circles.values(now);
        let fading: Vec<bool> = self.circles.necklace().map(|t| t.is_disappearing()).collect();
        let specs = oscillation::plan(&bases, min_d, max_d, self.seed);

        let breathing = self.cycle(now, self.config.oscillation_period_secs);
        let live = zero_sum::animate(&specs, &fading, breathing, path.perimeter(), min_d, max_d);

        let movement = self.cycle(now, self.config.rotation_period_secs);
        let centers = place_circles(&path, &live, movement);

        let origin = path.center();
        let remaining = 1.0 - progress;
        centers
            .into_iter()
            .zip(live)
            .map(|(center, diameter)| SceneCircle {
                center: (center - origin) * remaining,
                diameter: diameter * remaining,
            })
            .collect()
    }

    fn diameter_range(&self) -> (f64, f64) {
        let (a, b) = (self.config.min_diameter, self.config.max_diameter);
        (a.min(b), a.max(b))
    }

    /// Fraction of the current cycle of `period` seconds since creation.
    fn cycle(&self, now: f64, period: f64) -> f64 {
        if period <= 0.0 {
            return 0.0;
        }
        ((now - self.created_at) / period).rem_euclid(1.0)
    }
}

/// Length of the thinking-mode outline around `content_size`; zero when the
/// content has no area.
fn packing_length(config: &BubbleConfig, content_size: DVec2) -> f64 {
    let content = RoundedRect::from_size(content_size, config.corner_radius);
    if content.is_degenerate() {
        0.0
    } else {
        content.outset(config.base_padding).perimeter()
    }
}

fn pack_for(config: &BubbleConfig, content_size: DVec2, seed: u64) -> PackingResult {
    let length = packing_length(config, content_size);
    pack(length, config.min_diameter, config.max_diameter, seed)
}

fn same_diameters(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= PACKING_CHANGE_EPSILON)
}
