use bevy::camera::ScalingMode;
use bevy::prelude::*;

/// Visible height in layout points; one world unit is one point.
const VIEWPORT_HEIGHT_POINTS: f32 = 960.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatViewport>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, track_window_aspect);
    }
}

/// The visible chat column in layout points. Layout space has its origin at
/// the top-left corner with y pointing down; the camera centers it on the
/// world origin.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ChatViewport {
    pub size: Vec2,
}

impl Default for ChatViewport {
    fn default() -> Self {
        Self::with_aspect(9.0 / 16.0)
    }
}

impl ChatViewport {
    pub fn with_aspect(aspect_ratio: f32) -> Self {
        Self {
            size: Vec2::new(VIEWPORT_HEIGHT_POINTS * aspect_ratio, VIEWPORT_HEIGHT_POINTS),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.x / self.size.y
    }

    /// World position of a layout point. Layout y runs down the screen, which
    /// is world -Z under the top-down camera.
    pub fn layout_to_world(&self, point: Vec2) -> Vec3 {
        let half = self.size * 0.5;
        Vec3::new(point.x - half.x, 0.0, half.y - point.y)
    }

    /// Layout point at `slot` (fractions of the width and height, from the
    /// top-left) inside the viewport shrunk by `inset` points on every side.
    pub fn slot_point(&self, slot: Vec2, inset: f32) -> Vec2 {
        let usable = (self.size - Vec2::splat(2.0 * inset)).max(Vec2::ZERO);
        Vec2::splat(inset) + usable * slot
    }
}

/// Orthographic camera looking straight down at the XZ plane, +Z up on screen.
fn setup_camera(mut commands: Commands) {
    let projection = Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: VIEWPORT_HEIGHT_POINTS,
        },
        near: 0.0,
        far: 1000.0,
        ..OrthographicProjection::default_3d()
    });
    commands.spawn((
        Camera3d::default(),
        projection,
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
}

/// Widen or narrow the viewport with the window; the height stays fixed.
fn track_window_aspect(mut viewport: ResMut<ChatViewport>, windows: Query<&Window>) {
    let Ok(window) = windows.single() else {
        return;
    };
    let aspect_ratio = window.width() / window.height();
    if !aspect_ratio.is_finite() || (aspect_ratio - viewport.aspect_ratio()).abs() <= 0.01 {
        return;
    }

    *viewport = ChatViewport::with_aspect(aspect_ratio);
    info!("Chat viewport resized to {:.0}x{:.0} points", viewport.size.x, viewport.size.y);
}
