use bevy::prelude::*;

use crate::bubble::{BubbleInstance, BubbleScene};
use crate::visual::material::{BubbleSceneMaterial, MAX_CIRCLES};

/// Room around the shape for the blur falloff and antialiasing.
const PLANE_MARGIN: f32 = 8.0;

/// The scene a bubble produced on the last tick.
#[derive(Component, Debug, Clone)]
pub struct BubbleFrame(pub BubbleScene);

/// System: advance every bubble to the current time.
pub fn tick_bubbles(time: Res<Time>, mut bubbles: Query<(&mut BubbleInstance, &mut BubbleFrame)>) {
    let now = time.elapsed_secs_f64();
    for (mut instance, mut frame) in &mut bubbles {
        frame.0 = instance.tick(now);
    }
}

/// System: copy each bubble's frame into its material uniform and size its
/// plane to cover the frame.
pub fn sync_bubble_materials(
    mut bubbles: Query<(&BubbleFrame, &MeshMaterial3d<BubbleSceneMaterial>, &mut Transform)>,
    mut materials: ResMut<Assets<BubbleSceneMaterial>>,
) {
    for (frame, material_handle, mut transform) in &mut bubbles {
        let Some(material) = materials.get_mut(&material_handle.0) else {
            continue;
        };
        let scene = &frame.0;
        let data = &mut material.data;

        data.center = Vec2::new(transform.translation.x, transform.translation.z);
        data.half_size = (scene.shape_size * 0.5).as_vec2();
        data.corner_radius = scene.corner_radius as f32;
        data.blur_radius = scene.blur_radius as f32;
        data.alpha_threshold = scene.alpha_threshold as f32;
        data.fill_color = Vec4::from_array(scene.fill_color);

        if scene.circles.len() > MAX_CIRCLES {
            warn_once!(
                "bubble has {} circles, only the first {} are drawn",
                scene.circles.len(),
                MAX_CIRCLES
            );
        }
        let count = scene.circles.len().min(MAX_CIRCLES);
        for (slot, circle) in data.circles.iter_mut().zip(&scene.circles) {
            let center = circle.center.as_vec2();
            *slot = Vec4::new(center.x, center.y, circle.diameter as f32 * 0.5, 0.0);
        }
        data.num_circles = count as u32;

        let extent = scene.half_extent().as_vec2() + Vec2::splat(scene.blur_radius as f32 + PLANE_MARGIN);
        transform.scale = Vec3::new(extent.x * 2.0, 1.0, extent.y * 2.0);
    }
}
