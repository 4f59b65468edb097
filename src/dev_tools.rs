//! Development tools for the game. This plugin is only enabled in dev builds.

use crate::config::ControllerConfig;
use avian2d::prelude::PhysicsDebugPlugin;
use bevy::{input::common_conditions::input_just_pressed, prelude::*};
use bevy_inspector_egui::bevy_egui::EguiPlugin;

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

/// Whether the probe circles are drawn.
#[derive(Resource, Default)]
struct ShowProbes(bool);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ShowProbes>()
        .add_systems(
            Update,
            (
                toggle_probes.run_if(input_just_pressed(TOGGLE_KEY)),
                draw_probes.run_if(|show: Res<ShowProbes>| show.0),
            ),
        );
    //inspect stuff and things
    app.add_plugins((
        EguiPlugin::default(),
        bevy_inspector_egui::quick::WorldInspectorPlugin::new(),
        PhysicsDebugPlugin::default(),
    ));
}

fn toggle_probes(mut show: ResMut<ShowProbes>) {
    show.0 = !show.0;
}

fn draw_probes(mut gizmos: Gizmos, characters: Query<(&GlobalTransform, &ControllerConfig)>) {
    for (transform, config) in characters.iter() {
        for probe in [config.ground_probe, config.ceiling_probe] {
            let center = transform.transform_point(probe.offset.extend(0.0)).xy();
            gizmos.circle_2d(center, probe.radius, Color::srgb(1.0, 0.0, 0.0));
        }
    }
}
