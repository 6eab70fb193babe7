//! Per-tick output handed to the renderer.

use bevy::math::DVec2;
use serde::Deserialize;

/// Which side of the conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    #[default]
    Inbound,
    Outbound,
}

impl MessageDirection {
    pub fn tail_anchor(self) -> TailAnchor {
        match self {
            MessageDirection::Inbound => TailAnchor::BottomLeft,
            MessageDirection::Outbound => TailAnchor::BottomRight,
        }
    }
}

/// Corner of the shape the tail overlay attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailAnchor {
    BottomLeft,
    BottomRight,
}

impl TailAnchor {
    /// Corner position for a shape of `size` centered on the origin (y down).
    pub fn point(self, size: DVec2) -> DVec2 {
        let half = size * 0.5;
        match self {
            TailAnchor::BottomLeft => DVec2::new(-half.x, half.y),
            TailAnchor::BottomRight => DVec2::new(half.x, half.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCircle {
    /// Relative to the bubble center, y down.
    pub center: DVec2,
    pub diameter: f64,
}

/// Everything needed to draw one bubble for one frame: a filled rounded
/// rectangle plus circles, blurred and then alpha-thresholded together.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleScene {
    pub shape_size: DVec2,
    pub corner_radius: f64,
    pub padding: f64,
    pub blur_radius: f64,
    pub alpha_threshold: f64,
    pub morph_progress: f64,
    /// sRGBA fill; the invalid tint when packing failed.
    pub fill_color: [f32; 4],
    pub packing_valid: bool,
    pub tail_anchor: TailAnchor,
    pub circles: Vec<SceneCircle>,
}

impl BubbleScene {
    pub fn tail_point(&self) -> DVec2 {
        self.tail_anchor.point(self.shape_size)
    }

    /// Smallest box around the center that contains the shape and every circle.
    pub fn half_extent(&self) -> DVec2 {
        self.circles
            .iter()
            .map(|c| c.center.abs() + DVec2::splat(c.diameter * 0.5))
            .fold(self.shape_size * 0.5, DVec2::max)
    }
}
