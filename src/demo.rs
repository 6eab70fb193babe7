//! Scripted mode flips and resizes that drive the demo bubbles in a loop.

use std::time::Duration;

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::Deserialize;

use crate::bubble::{BubbleInstance, BubbleMode, MessageDirection};

const DEMO_JSON: &str = include_str!("../assets/demo.json");

/// A bubble the script spawns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoBubbleSpec {
    pub direction: MessageDirection,
    /// Content size in layout points.
    pub size: [f64; 2],
    pub seed: u64,
    /// Position as fractions of the visible area, measured from the top-left.
    pub slot: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoAction {
    Mode(BubbleMode),
    Resize([f64; 2]),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DemoStep {
    /// Seconds into the loop.
    pub at: f32,
    pub bubble: usize,
    pub action: DemoAction,
}

#[derive(Debug, Deserialize)]
struct DemoFile {
    loop_secs: f32,
    bubbles: Vec<DemoBubbleSpec>,
    steps: Vec<DemoStep>,
}

/// Marks the entity that plays the script's bubble at this index.
#[derive(Component, Debug, Clone, Copy)]
pub struct DemoBubble(pub usize);

#[derive(Resource, Debug)]
pub struct DemoScript {
    bubbles: Vec<DemoBubbleSpec>,
    steps: Vec<DemoStep>,
    /// Next step to fire in the current loop.
    cursor: usize,
    timer: Timer,
}

impl DemoScript {
    /// Load the script embedded from `assets/demo.json`.
    pub fn load() -> Result<Self, String> {
        Self::from_json(DEMO_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let mut file: DemoFile =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse demo script: {}", e))?;

        if !(file.loop_secs > 0.0) {
            return Err(format!("Demo loop length must be positive, got {}", file.loop_secs));
        }
        for step in &file.steps {
            if step.bubble >= file.bubbles.len() {
                return Err(format!(
                    "Step at {}s targets bubble {} but only {} exist",
                    step.at,
                    step.bubble,
                    file.bubbles.len()
                ));
            }
            if step.at < 0.0 || step.at > file.loop_secs {
                return Err(format!(
                    "Step at {}s falls outside the {}s loop",
                    step.at, file.loop_secs
                ));
            }
        }
        file.steps.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            bubbles: file.bubbles,
            steps: file.steps,
            cursor: 0,
            timer: Timer::from_seconds(file.loop_secs, TimerMode::Repeating),
        })
    }

    /// A script with no bubbles and no steps.
    pub fn empty() -> Self {
        Self {
            bubbles: Vec::new(),
            steps: Vec::new(),
            cursor: 0,
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }

    pub fn bubbles(&self) -> &[DemoBubbleSpec] {
        &self.bubbles
    }

    pub fn steps(&self) -> &[DemoStep] {
        &self.steps
    }

    /// Advance the loop clock and return the steps that became due, in order.
    /// Crossing the end of the loop fires whatever was left before wrapping.
    pub fn advance(&mut self, delta: Duration) -> Vec<DemoStep> {
        self.timer.tick(delta);
        let mut fired = Vec::new();

        if self.timer.just_finished() {
            fired.extend_from_slice(&self.steps[self.cursor..]);
            self.cursor = 0;
        }

        let elapsed = self.timer.elapsed_secs();
        while let Some(step) = self.steps.get(self.cursor) {
            if step.at > elapsed {
                break;
            }
            fired.push(*step);
            self.cursor += 1;
        }
        fired
    }
}

/// System: apply due script steps to the demo bubbles.
pub fn run_demo_script(
    time: Res<Time>,
    mut script: ResMut<DemoScript>,
    mut bubbles: Query<(&DemoBubble, &mut BubbleInstance)>,
) {
    let now = time.elapsed_secs_f64();
    for step in script.advance(time.delta()) {
        let Some((_, mut instance)) = bubbles.iter_mut().find(|(tag, _)| tag.0 == step.bubble)
        else {
            continue;
        };

        info!("Demo {:.1}s: bubble {} {:?}", step.at, step.bubble, step.action);
        match step.action {
            DemoAction::Mode(mode) => instance.set_mode(mode, now),
            DemoAction::Resize([width, height]) => {
                instance.set_content_size(DVec2::new(width, height), now)
            }
            DemoAction::Reset => instance.reset(now),
        }
    }
}
