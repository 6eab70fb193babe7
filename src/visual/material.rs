use bevy::pbr::{Material, MaterialPlugin};
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

/// Circles beyond this are dropped from the uniform.
pub const MAX_CIRCLES: usize = 64;

pub struct BubbleMaterialPlugin;

impl Plugin for BubbleMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<BubbleSceneMaterial>::default());
    }
}

/// One bubble's frame, laid out for the fragment shader.
///
/// Shape and circle coordinates are in layout points relative to `center`,
/// x right and y down. `center` is the bubble's world position on the XZ plane.
#[derive(ShaderType, Debug, Clone)]
pub struct BubbleSceneUniform {
    pub center: Vec2,
    pub half_size: Vec2,
    pub fill_color: Vec4,
    pub corner_radius: f32,
    pub blur_radius: f32,
    pub alpha_threshold: f32,
    pub num_circles: u32,
    /// (x, y, radius, unused)
    pub circles: [Vec4; MAX_CIRCLES],
}

impl Default for BubbleSceneUniform {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_size: Vec2::ZERO,
            fill_color: Vec4::ONE,
            corner_radius: 0.0,
            blur_radius: 0.0,
            alpha_threshold: 0.2,
            num_circles: 0,
            circles: [Vec4::ZERO; MAX_CIRCLES],
        }
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct BubbleSceneMaterial {
    #[uniform(0)]
    pub data: BubbleSceneUniform,
}

impl Material for BubbleSceneMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/bubble_scene.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}
