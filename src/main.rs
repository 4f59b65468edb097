// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod animation;
mod config;
mod controller;
#[cfg(feature = "dev")]
mod dev_tools;
mod input;
mod level;
mod physics;
mod time;

use bevy::{asset::AssetMetaCheck, prelude::*};
use crate::time::{AppSystems, PausableSystems};

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web build on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Platformer 2D".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                        .into(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        );

        // Add other plugins.
        app.add_plugins((
            time::plugin,
            input::plugin,
            physics::plugin,
            animation::plugin,
            controller::plugin,
            level::plugin,
            #[cfg(feature = "dev")]
            dev_tools::plugin,
        ));

        app.configure_sets(
            Update,
            (
                AppSystems::RecordInput,
                PausableSystems.run_if(time::is_running),
            ),
        );
    }
}
