use bevy::prelude::*;

/// Runtime state of one character controller, owned by the fixed-step tick.
#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ControllerState {
    /// Feet probe touched ground this tick.
    pub grounded: bool,
    pub facing_right: bool,
    /// Crouch as resolved on the last tick, ceiling included.
    pub crouching: bool,
    /// Crouch as last reported through [`ControllerNotification::CrouchChanged`].
    pub was_crouching: bool,
    /// Internal velocity of the smoothing spring.
    pub smoothing_velocity: Vec2,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            grounded: false,
            facing_right: true,
            crouching: false,
            was_crouching: false,
            smoothing_velocity: Vec2::ZERO,
        }
    }
}

impl ControllerState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What the player wants, written by the input sampler every frame and
/// consumed by the next physics tick.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Signed horizontal speed.
    pub horizontal: f32,
    /// One-shot, cleared by the physics tick whether or not a jump happened.
    pub jump_requested: bool,
    pub crouch_held: bool,
}

/// Notifications the controller core produces during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerNotification {
    Landed,
    CrouchChanged(bool),
}
