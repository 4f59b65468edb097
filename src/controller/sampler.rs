//! Per-frame input sampling.
use super::resolver::AnimationSink;
use super::state::MovementIntent;
use bevy::prelude::*;

/// Joystick deflection past which the character runs at full speed.
pub const JOYSTICK_THRESHOLD: f32 = 0.2;

/// Raw input as seen during the current frame.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InputFrame {
    /// Digital horizontal axis, -1, 0 or 1.
    pub axis: f32,
    /// Analog horizontal stick, roughly -1..=1.
    pub joystick: f32,
    /// Jump went down since the last sample.
    pub jump_pressed: bool,
    pub crouch_held: bool,
}

pub fn sample(
    frame: &mut InputFrame,
    move_speed: f32,
    intent: &mut MovementIntent,
    animation: &mut impl AnimationSink,
) {
    intent.horizontal = frame.axis * move_speed;
    if frame.joystick >= JOYSTICK_THRESHOLD {
        intent.horizontal = move_speed;
    } else if frame.joystick <= -JOYSTICK_THRESHOLD {
        intent.horizontal = -move_speed;
    }

    animation.set_speed(intent.horizontal.abs());

    if std::mem::take(&mut frame.jump_pressed) {
        intent.jump_requested = true;
        animation.set_jumping(true);
    }

    intent.crouch_held = frame.crouch_held;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationParams;

    fn run(frame: &mut InputFrame, intent: &mut MovementIntent) -> AnimationParams {
        let mut params = AnimationParams::default();
        sample(frame, 40.0, intent, &mut params);
        params
    }

    #[test]
    fn axis_scales_speed() {
        let mut intent = MovementIntent::default();
        let params = run(
            &mut InputFrame {
                axis: -1.0,
                ..default()
            },
            &mut intent,
        );
        assert_eq!(intent.horizontal, -40.0);
        assert_eq!(params.speed, 40.0);
    }

    #[test]
    fn joystick_overrides_axis_at_full_speed() {
        let mut intent = MovementIntent::default();
        run(
            &mut InputFrame {
                axis: -1.0,
                joystick: 0.25,
                ..default()
            },
            &mut intent,
        );
        assert_eq!(intent.horizontal, 40.0);

        run(
            &mut InputFrame {
                joystick: -0.2,
                ..default()
            },
            &mut intent,
        );
        assert_eq!(intent.horizontal, -40.0);
    }

    #[test]
    fn joystick_inside_dead_zone_is_ignored() {
        let mut intent = MovementIntent::default();
        run(
            &mut InputFrame {
                axis: 1.0,
                joystick: -0.19,
                ..default()
            },
            &mut intent,
        );
        assert_eq!(intent.horizontal, 40.0);
    }

    #[test]
    fn jump_edge_latches_request_and_animation() {
        let mut intent = MovementIntent::default();
        let mut frame = InputFrame {
            jump_pressed: true,
            ..default()
        };
        let params = run(&mut frame, &mut intent);
        assert!(intent.jump_requested);
        assert!(params.jumping);
        assert!(!frame.jump_pressed);

        // the sampler never clears a pending request
        run(&mut frame, &mut intent);
        assert!(intent.jump_requested);
    }

    #[test]
    fn crouch_follows_held_key() {
        let mut intent = MovementIntent::default();
        let mut frame = InputFrame {
            crouch_held: true,
            ..default()
        };
        run(&mut frame, &mut intent);
        assert!(intent.crouch_held);
        frame.crouch_held = false;
        run(&mut frame, &mut intent);
        assert!(!intent.crouch_held);
    }
}
