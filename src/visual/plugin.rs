use bevy::prelude::*;

use crate::demo::run_demo_script;
use crate::visual::setup::{load_bubble_config, load_demo_script, place_demo_bubbles, spawn_demo_bubbles};
use crate::visual::sync::{sync_bubble_materials, tick_bubbles};

pub struct BubblePlugin;

impl Plugin for BubblePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (load_bubble_config, load_demo_script, spawn_demo_bubbles).chain(),
        )
        .add_systems(
            Update,
            (
                // Script first so this frame's tick sees its changes
                run_demo_script,
                place_demo_bubbles,
                tick_bubbles,
                sync_bubble_materials,
            )
                .chain(),
        );
    }
}
