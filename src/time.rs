use bevy::prelude::*;

/// High-level groupings of systems for the app in the `Update` schedule.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    RecordInput,
}

/// Systems that stop running while the game is paused.
#[derive(SystemSet, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PausableSystems;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Toggle,
    Enable,
    Disable,
}

pub(crate) fn plugin(app: &mut App) {
    app.add_observer(toggle_pause);
}

fn toggle_pause(obs: On<Pause>, mut virtual_time: ResMut<Time<Virtual>>) {
    info!("pause: {:?}", obs.event());
    match obs.event() {
        Pause::Toggle => {
            if virtual_time.is_paused() {
                virtual_time.unpause();
            } else {
                virtual_time.pause();
            }
        }
        Pause::Enable => virtual_time.pause(),
        Pause::Disable => virtual_time.unpause(),
    }
}

pub(crate) fn is_running(virtual_time: Res<Time<Virtual>>) -> bool {
    !virtual_time.is_paused()
}
