//! Turns intent plus sensor state into motion, once per physics tick.
use super::smoothing::smooth_damp;
use super::state::{ControllerNotification, ControllerState};
use crate::config::ControllerConfig;
use bevy::prelude::*;

/// The desired speed is a per-tick displacement, this turns it into a velocity.
pub const SPEED_SCALE: f32 = 10.0;

/// The rigid body the controller steers.
pub trait PhysicsBody {
    fn linear_velocity(&self) -> Vec2;
    fn set_linear_velocity(&mut self, velocity: Vec2);
    fn apply_linear_impulse(&mut self, impulse: Vec2);
    /// Toggles the collider that is switched off while crouching, if there is one.
    fn set_crouch_collider_enabled(&mut self, enabled: bool);
    /// Rotates the character half a turn to face the other way.
    fn turn_around(&mut self);
}

/// Parameters the character's animation graph reads.
pub trait AnimationSink {
    fn set_speed(&mut self, speed: f32);
    fn set_jumping(&mut self, jumping: bool);
    fn set_crouching(&mut self, crouching: bool);
}

/// Input of one resolution step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveCommand {
    pub speed: f32,
    pub crouch: bool,
    pub jump: bool,
}

/// What a resolution step ended up doing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Crouch after the ceiling check.
    pub crouching: bool,
    /// Horizontal target velocity, `None` when the smoothing step was skipped.
    pub target_speed: Option<f32>,
    pub jumped: bool,
    pub flipped: bool,
}

/// Runs one tick of movement.
///
/// `ceiling` is only evaluated when the character is about to stand up.
/// Notifications are appended to `notifications`. While the character stays
/// crouched its horizontal velocity is left alone entirely.
pub fn resolve(
    state: &mut ControllerState,
    config: &ControllerConfig,
    command: MoveCommand,
    ceiling: impl FnOnce() -> bool,
    body: &mut impl PhysicsBody,
    animation: &mut impl AnimationSink,
    delta: f32,
    notifications: &mut Vec<ControllerNotification>,
) -> Resolution {
    let MoveCommand {
        mut speed,
        mut crouch,
        jump,
    } = command;
    let mut resolution = Resolution::default();

    // something overhead keeps us down
    if !crouch && ceiling() {
        crouch = true;
    }
    resolution.crouching = crouch;
    state.crouching = crouch;

    if state.grounded || config.air_control {
        if crouch {
            if !state.was_crouching {
                state.was_crouching = true;
                notifications.push(ControllerNotification::CrouchChanged(true));
                notify_crouch_animation(animation, true);
            }
            speed *= config.crouch_speed;
            body.set_crouch_collider_enabled(false);
        } else {
            body.set_crouch_collider_enabled(true);
            if state.was_crouching {
                state.was_crouching = false;
                notifications.push(ControllerNotification::CrouchChanged(false));
                notify_crouch_animation(animation, false);
            }
        }

        let target_speed = speed * SPEED_SCALE;
        if !state.was_crouching {
            let current = body.linear_velocity();
            let target = Vec2::new(target_speed, current.y);
            let velocity = smooth_damp(
                current,
                target,
                &mut state.smoothing_velocity,
                config.movement_smoothing,
                delta,
            );
            body.set_linear_velocity(velocity);
        }
        resolution.target_speed = Some(target_speed);

        if (speed > 0.0 && !state.facing_right) || (speed < 0.0 && state.facing_right) {
            state.facing_right = !state.facing_right;
            body.turn_around();
            resolution.flipped = true;
        }
    }

    if state.grounded && jump {
        // airborne from here on, even for the rest of this tick
        state.grounded = false;
        body.apply_linear_impulse(Vec2::new(0.0, config.jump_force));
        resolution.jumped = true;
    }

    resolution
}

/// Clears the jumping animation flag, hooked up to the landing event.
pub fn notify_landed(animation: &mut impl AnimationSink) {
    animation.set_jumping(false);
}

pub fn notify_crouch_animation(animation: &mut impl AnimationSink, crouching: bool) {
    animation.set_crouching(crouching);
}
