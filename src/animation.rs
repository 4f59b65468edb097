//! Animation parameters written by the controller and the state machine that reads them.
use crate::controller::resolver::{notify_landed, AnimationSink};
use crate::controller::Landed;
use bevy::prelude::*;
use seldom_state::prelude::*;

/// Speed below which the character counts as standing still.
const IDLE_SPEED: f32 = 0.01;

/// Blend parameters for the character's animation graph.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationParams {
    /// Absolute horizontal intent, for locomotion blending.
    pub speed: f32,
    pub jumping: bool,
    pub crouching: bool,
}

impl AnimationSink for AnimationParams {
    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_jumping(&mut self, jumping: bool) {
        self.jumping = jumping;
    }

    fn set_crouching(&mut self, crouching: bool) {
        self.crouching = crouching;
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
#[component(storage = "SparseSet")]
pub struct Idle;

#[derive(Component, Clone, Copy, Debug)]
#[component(storage = "SparseSet")]
pub struct Running;

#[derive(Component, Clone, Copy, Debug)]
#[component(storage = "SparseSet")]
pub struct Jumping;

#[derive(Component, Clone, Copy, Debug)]
#[component(storage = "SparseSet")]
pub struct Crouching;

fn jumping(In(entity): In<Entity>, params: Query<&AnimationParams>) -> bool {
    params.get(entity).is_ok_and(|p| p.jumping)
}

fn crouching(In(entity): In<Entity>, params: Query<&AnimationParams>) -> bool {
    params.get(entity).is_ok_and(|p| p.crouching && !p.jumping)
}

fn running(In(entity): In<Entity>, params: Query<&AnimationParams>) -> bool {
    params
        .get(entity)
        .is_ok_and(|p| p.speed > IDLE_SPEED && !p.jumping && !p.crouching)
}

fn settled(In(entity): In<Entity>, params: Query<&AnimationParams>) -> bool {
    params
        .get(entity)
        .is_ok_and(|p| p.speed <= IDLE_SPEED && !p.jumping && !p.crouching)
}

/// Locomotion states, driven purely by [`AnimationParams`].
pub fn animation_state_machine() -> impl Bundle {
    (
        StateMachine::default()
            .trans::<Idle, _>(jumping, Jumping)
            .trans::<Running, _>(jumping, Jumping)
            .trans::<Crouching, _>(jumping, Jumping)
            .trans::<Idle, _>(crouching, Crouching)
            .trans::<Running, _>(crouching, Crouching)
            .trans::<Jumping, _>(crouching, Crouching)
            .trans::<Idle, _>(running, Running)
            .trans::<Jumping, _>(running, Running)
            .trans::<Crouching, _>(running, Running)
            .trans::<Running, _>(settled, Idle)
            .trans::<Jumping, _>(settled, Idle)
            .trans::<Crouching, _>(settled, Idle)
            .set_trans_logging(true),
        Idle,
    )
}

fn clear_jumping_on_landed(landed: On<Landed>, mut params: Query<&mut AnimationParams>) {
    let Ok(mut params) = params.get_mut(landed.entity) else {
        return;
    };
    notify_landed(&mut *params);
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(StateMachinePlugin::default())
        .register_type::<AnimationParams>()
        .add_observer(clear_jumping_on_landed);
}
