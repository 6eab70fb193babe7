//! Rounded-rectangle outline in layout space (origin top-left, y down).

use std::f64::consts::{FRAC_PI_2, PI};

use bevy::math::DVec2;

/// One piece of the outline, traversed clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { from: DVec2, to: DVec2 },
    Arc { center: DVec2, radius: f64, start_angle: f64, end_angle: f64 },
}

impl Segment {
    pub fn length(&self) -> f64 {
        match *self {
            Segment::Line { from, to } => from.distance(to),
            Segment::Arc { radius, start_angle, end_angle, .. } => {
                radius * (end_angle - start_angle).abs()
            }
        }
    }

    /// Point at fraction `t` (clamped to [0, 1]) along the segment.
    pub fn point_at(&self, t: f64) -> DVec2 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Segment::Line { from, to } => from + (to - from) * t,
            Segment::Arc { center, radius, start_angle, end_angle } => {
                let angle = start_angle + (end_angle - start_angle) * t;
                center + radius * DVec2::new(angle.cos(), angle.sin())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub width: f64,
    pub height: f64,
    /// Always within [0, min(width, height) / 2].
    pub corner_radius: f64,
}

impl RoundedRect {
    /// Negative sizes collapse to zero; the corner radius is clamped to fit.
    pub fn new(width: f64, height: f64, corner_radius: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let corner_radius = corner_radius.clamp(0.0, width.min(height) * 0.5);
        Self {
            width,
            height,
            corner_radius,
        }
    }

    pub fn from_size(size: DVec2, corner_radius: f64) -> Self {
        Self::new(size.x, size.y, corner_radius)
    }

    /// Grow by `amount` on every side; the corner radius grows with it.
    pub fn outset(&self, amount: f64) -> Self {
        Self::new(
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
            self.corner_radius + amount,
        )
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        self.size() * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn perimeter(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let r = self.corner_radius;
        2.0 * (self.width - 2.0 * r) + 2.0 * (self.height - 2.0 * r) + 2.0 * PI * r
    }

    /// The eight outline pieces, clockwise from the top-left end of the top edge.
    pub fn segments(&self) -> [Segment; 8] {
        let (w, h, r) = (self.width, self.height, self.corner_radius);
        [
            Segment::Line { from: DVec2::new(r, 0.0), to: DVec2::new(w - r, 0.0) },
            Segment::Arc {
                center: DVec2::new(w - r, r),
                radius: r,
                start_angle: -FRAC_PI_2,
                end_angle: 0.0,
            },
            Segment::Line { from: DVec2::new(w, r), to: DVec2::new(w, h - r) },
            Segment::Arc {
                center: DVec2::new(w - r, h - r),
                radius: r,
                start_angle: 0.0,
                end_angle: FRAC_PI_2,
            },
            Segment::Line { from: DVec2::new(w - r, h), to: DVec2::new(r, h) },
            Segment::Arc {
                center: DVec2::new(r, h - r),
                radius: r,
                start_angle: FRAC_PI_2,
                end_angle: PI,
            },
            Segment::Line { from: DVec2::new(0.0, h - r), to: DVec2::new(0.0, r) },
            Segment::Arc {
                center: DVec2::new(r, r),
                radius: r,
                start_angle: PI,
                end_angle: PI + FRAC_PI_2,
            },
        ]
    }

    /// Map a distance along the outline to a point; periodic in the perimeter.
    pub fn point_at(&self, distance: f64) -> DVec2 {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return self.center();
        }

        let mut remaining = distance.rem_euclid(perimeter);
        let segments = self.segments();
        for segment in &segments[..7] {
            let length = segment.length();
            if remaining <= length {
                let t = if length > 0.0 { remaining / length } else { 0.0 };
                return segment.point_at(t);
            }
            remaining -= length;
        }

        let last = segments[7];
        let length = last.length();
        let t = if length > 0.0 { remaining / length } else { 1.0 };
        last.point_at(t)
    }

    /// Signed distance from `point` to the outline (negative inside).
    pub fn signed_distance(&self, point: DVec2) -> f64 {
        let half = self.size() * 0.5;
        let r = self.corner_radius;
        let q = (point - self.center()).abs() - (half - DVec2::splat(r));
        q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
    }
}
