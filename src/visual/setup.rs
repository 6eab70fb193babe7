use bevy::math::DVec2;
use bevy::prelude::*;

use crate::{
    bubble::{BubbleConfig, BubbleInstance},
    camera::ChatViewport,
    demo::{DemoBubble, DemoScript},
    visual::{
        material::BubbleSceneMaterial,
        sync::BubbleFrame,
    },
};

/// Points kept clear at the screen edges when placing demo bubbles
const SLOT_INSET: f32 = 40.0;

pub fn load_bubble_config(mut commands: Commands) {
    let config = match BubbleConfig::load() {
        Ok(config) => {
            info!(
                "Bubble config loaded: diameters [{}, {}], morph {}s",
                config.min_diameter, config.max_diameter, config.morph_secs
            );
            config
        }
        Err(e) => {
            error!("{}; falling back to defaults", e);
            BubbleConfig::default()
        }
    };
    commands.insert_resource(config);
}

pub fn load_demo_script(mut commands: Commands) {
    let script = match DemoScript::load() {
        Ok(script) => script,
        Err(e) => {
            error!("{}; running without a demo script", e);
            DemoScript::empty()
        }
    };
    commands.insert_resource(script);
}

/// Spawn one plane per scripted bubble, each with its own scene material.
pub fn spawn_demo_bubbles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<BubbleSceneMaterial>>,
    config: Res<BubbleConfig>,
    script: Res<DemoScript>,
    viewport: Res<ChatViewport>,
    time: Res<Time>,
) {
    // Unit plane on XZ; sync scales it to each frame's extent.
    let plane_mesh = meshes.add(Plane3d::default().mesh().size(1.0, 1.0));
    let now = time.elapsed_secs_f64();

    for (index, spec) in script.bubbles().iter().enumerate() {
        let size = DVec2::new(spec.size[0], spec.size[1]);
        let mut instance = BubbleInstance::new(config.clone(), spec.direction, size, spec.seed, now);
        let frame = BubbleFrame(instance.tick(now));

        let position = slot_position(&viewport, spec.slot);

        commands.spawn((
            DemoBubble(index),
            instance,
            frame,
            Mesh3d(plane_mesh.clone()),
            MeshMaterial3d(materials.add(BubbleSceneMaterial::default())),
            Transform::from_translation(position),
        ));

        info!(
            "Bubble {} ({:?}, seed {:#x}) at ({:.0}, {:.0})",
            index, spec.direction, spec.seed, position.x, position.z
        );
    }
}

fn slot_position(viewport: &ChatViewport, slot: [f32; 2]) -> Vec3 {
    viewport.layout_to_world(viewport.slot_point(Vec2::from_array(slot), SLOT_INSET))
}

/// Keep scripted bubbles on their slots when the window changes shape.
pub fn place_demo_bubbles(
    viewport: Res<ChatViewport>,
    script: Res<DemoScript>,
    mut bubbles: Query<(&DemoBubble, &mut Transform)>,
) {
    if !viewport.is_changed() {
        return;
    }
    for (tag, mut transform) in &mut bubbles {
        if let Some(spec) = script.bubbles().get(tag.0) {
            transform.translation = slot_position(&viewport, spec.slot);
        }
    }
}
