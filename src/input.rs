use crate::controller::sampler::InputFrame;
use crate::time::Pause;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Input context of the player character.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Digital left/right.
#[derive(InputAction)]
#[action_output(f32)]
pub struct Move;

/// Analog stick, thresholded by the sampler itself.
#[derive(InputAction)]
#[action_output(f32)]
pub struct Joystick;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Jump;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Crouch;

#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePause;

/// Actions and bindings to spawn alongside a [`Player`].
pub fn player_actions() -> impl Bundle {
    actions!(Player[
        (
            Action::<Move>::new(),
            Bindings::spawn((
                Bidirectional::new(KeyCode::KeyD, KeyCode::KeyA),
                Bidirectional::new(KeyCode::ArrowRight, KeyCode::ArrowLeft),
            )),
        ),
        (
            Action::<Joystick>::new(),
            bindings![GamepadAxis::LeftStickX],
        ),
        (
            Action::<Jump>::new(),
            bindings![KeyCode::Space, GamepadButton::South],
        ),
        (
            Action::<Crouch>::new(),
            bindings![KeyCode::KeyS, GamepadButton::DPadDown],
        ),
        (
            Action::<TogglePause>::new(),
            bindings![KeyCode::Escape, GamepadButton::Start],
        ),
    ])
}

fn record_move(movement: On<Fire<Move>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(movement.context) {
        frame.axis = movement.value;
    }
}

fn release_move(movement: On<Complete<Move>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(movement.context) {
        frame.axis = 0.0;
    }
}

fn record_joystick(stick: On<Fire<Joystick>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(stick.context) {
        frame.joystick = stick.value;
    }
}

fn release_joystick(stick: On<Complete<Joystick>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(stick.context) {
        frame.joystick = 0.0;
    }
}

fn press_jump(jump: On<Start<Jump>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(jump.context) {
        frame.jump_pressed = true;
    }
}

fn press_crouch(crouch: On<Start<Crouch>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(crouch.context) {
        frame.crouch_held = true;
    }
}

fn release_crouch(crouch: On<Complete<Crouch>>, mut frames: Query<&mut InputFrame>) {
    if let Ok(mut frame) = frames.get_mut(crouch.context) {
        frame.crouch_held = false;
    }
}

fn toggle_pause(_: On<Start<TogglePause>>, mut commands: Commands) {
    commands.trigger(Pause::Toggle);
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(EnhancedInputPlugin)
        .add_input_context::<Player>()
        .add_observer(record_move)
        .add_observer(release_move)
        .add_observer(record_joystick)
        .add_observer(release_joystick)
        .add_observer(press_jump)
        .add_observer(press_crouch)
        .add_observer(release_crouch)
        .add_observer(toggle_pause);
}
