use bevy::prelude::*;

mod bubble;
mod camera;
mod demo;
mod visual;

use bevy::window::WindowResolution;
use camera::CameraPlugin;
use visual::{BubbleMaterialPlugin, BubblePlugin};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Rio Bubble".into(),
            resolution: WindowResolution::new(540, 960),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.07, 0.07, 0.09)))
    .add_plugins(CameraPlugin)
    .add_plugins(BubbleMaterialPlugin)
    .add_plugins(BubblePlugin);

    app.run();
}
