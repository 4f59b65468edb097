//! Platformer character controller.
//!
//! Input is sampled every frame into a [`MovementIntent`]; every fixed step the
//! ground sensor and the motion resolver turn that intent into velocity,
//! facing and jumps on an avian rigid body.

pub mod resolver;
pub mod sampler;
pub mod sensor;
pub mod smoothing;
pub mod state;

use crate::animation::AnimationParams;
use crate::config::{ControllerConfig, ProbeConfig};
use crate::physics::{AvianOverlaps, TickBody};
use crate::time::{AppSystems, PausableSystems};
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::ecs::entity::EntityHashSet;
use resolver::{AnimationSink, MoveCommand, PhysicsBody, Resolution, resolve};
use sampler::{InputFrame, sample};
use sensor::{OverlapQuery, Probe, ceiling_blocked, sense_ground};
use state::ControllerNotification;
use std::f32::consts::PI;

pub use state::{ControllerState, MovementIntent};

/// Entities the controller needs besides the body itself.
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct CharacterRig {
    /// Collider switched off while crouching.
    pub crouch_collider: Option<Entity>,
    /// Rotated half a turn whenever the character changes direction.
    pub visual: Option<Entity>,
}

/// Where the character comes back after falling out of the level.
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct SpawnPoint(pub Vec2);

/// Characters falling below this height are respawned.
#[derive(Resource, Clone, Copy, Debug, Reflect)]
#[reflect(Resource)]
pub struct KillPlane(pub f32);

impl Default for KillPlane {
    fn default() -> Self {
        Self(-1000.0)
    }
}

#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct Landed {
    pub entity: Entity,
}

#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct CrouchChanged {
    pub entity: Entity,
    pub crouching: bool,
}

#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct Respawn {
    pub entity: Entity,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSystems {
    Resolve,
    Respawn,
}

pub(crate) fn plugin(app: &mut App) {
    app.init_resource::<KillPlane>()
        .register_type::<ControllerConfig>()
        .register_type::<ControllerState>()
        .register_type::<MovementIntent>()
        .register_type::<InputFrame>()
        .register_type::<CharacterRig>()
        .add_systems(
            Update,
            sample_input
                .in_set(AppSystems::RecordInput)
                .in_set(PausableSystems),
        )
        .configure_sets(
            FixedUpdate,
            (ControllerSystems::Resolve, ControllerSystems::Respawn).chain(),
        )
        .add_systems(
            FixedUpdate,
            (
                tick_controllers.in_set(ControllerSystems::Resolve),
                fall_out_of_level.in_set(ControllerSystems::Respawn),
            ),
        )
        .add_observer(respawn);
}

fn sample_input(
    mut characters: Query<(
        &ControllerConfig,
        &mut InputFrame,
        &mut MovementIntent,
        &mut AnimationParams,
    )>,
) {
    for (config, mut frame, mut intent, mut params) in characters.iter_mut() {
        sample(&mut frame, config.move_speed, &mut intent, &mut *params);
    }
}

/// Where a probe is this tick, from the body's physics pose.
fn probe_at(position: &Position, rotation: &Rotation, probe: ProbeConfig) -> Probe {
    Probe {
        center: position.0 + *rotation * probe.offset,
        radius: probe.radius,
    }
}

/// Ground and ceiling probes of one character for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probes {
    pub ground: Probe,
    pub ceiling: Probe,
}

/// One physics tick of one character: sense the ground, then resolve motion.
///
/// Consumes the pending jump request whatever happens.
pub fn step_character<Q: OverlapQuery>(
    state: &mut ControllerState,
    intent: &mut MovementIntent,
    config: &ControllerConfig,
    overlaps: &Q,
    probes: Probes,
    is_self: impl Fn(Q::Collider) -> bool + Copy,
    body: &mut impl PhysicsBody,
    animation: &mut impl AnimationSink,
    delta: f32,
    notifications: &mut Vec<ControllerNotification>,
) -> Resolution {
    let jump = std::mem::take(&mut intent.jump_requested);

    notifications.extend(sense_ground(
        state,
        overlaps,
        probes.ground,
        config.ground_layers,
        is_self,
    ));

    let command = MoveCommand {
        speed: intent.horizontal * delta,
        crouch: intent.crouch_held,
        jump,
    };
    resolve(
        state,
        config,
        command,
        || ceiling_blocked(overlaps, probes.ceiling, config.ground_layers, is_self),
        body,
        animation,
        delta,
        notifications,
    )
}

pub fn tick_controllers(
    mut commands: Commands,
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut characters: Query<(
        Entity,
        &ControllerConfig,
        &CharacterRig,
        &Position,
        &Rotation,
        &mut ControllerState,
        &mut MovementIntent,
        &mut LinearVelocity,
        &ComputedMass,
        &mut AnimationParams,
    )>,
    hierarchy: Query<&Children>,
    disabled: Query<Has<ColliderDisabled>>,
    mut visuals: Query<&mut Transform>,
    mut own: Local<EntityHashSet>,
) {
    let delta = time.delta_secs();
    let overlaps = AvianOverlaps {
        spatial_query: &spatial_query,
    };

    for (
        entity,
        config,
        rig,
        position,
        rotation,
        mut state,
        mut intent,
        mut velocity,
        mass,
        mut params,
    ) in characters.iter_mut()
    {
        own.clear();
        own.insert(entity);
        own.extend(hierarchy.iter_descendants(entity));
        let own = &*own;

        let probes = Probes {
            ground: probe_at(position, rotation, config.ground_probe),
            ceiling: probe_at(position, rotation, config.ceiling_probe),
        };
        let mut body = TickBody::new(&velocity, mass);
        let mut notifications = Vec::new();
        let resolution = step_character(
            &mut state,
            &mut intent,
            config,
            &overlaps,
            probes,
            |collider| own.contains(&collider),
            &mut body,
            &mut *params,
            delta,
            &mut notifications,
        );

        if resolution.jumped {
            debug!("{entity} jumped");
        }

        velocity.0 = body.velocity;

        if let (Some(enabled), Some(collider)) = (body.crouch_collider_enabled, rig.crouch_collider)
        {
            // only touch the collider when it actually changes
            if disabled.get(collider).is_ok_and(|is_disabled| is_disabled == enabled) {
                if enabled {
                    commands.entity(collider).remove::<ColliderDisabled>();
                } else {
                    commands.entity(collider).insert(ColliderDisabled);
                }
            }
        }

        if body.turns % 2 == 1
            && let Some(mut transform) = rig.visual.and_then(|v| visuals.get_mut(v).ok())
        {
            transform.rotate_y(PI);
        }

        for notification in notifications {
            match notification {
                ControllerNotification::Landed => {
                    debug!("{entity} landed");
                    commands.trigger(Landed { entity });
                }
                ControllerNotification::CrouchChanged(crouching) => {
                    debug!("{entity} crouching: {crouching}");
                    commands.trigger(CrouchChanged { entity, crouching });
                }
            }
        }
    }
}

fn fall_out_of_level(
    mut commands: Commands,
    kill_plane: Res<KillPlane>,
    characters: Query<(Entity, &Position), With<ControllerState>>,
) {
    for (entity, position) in characters.iter() {
        if position.y < kill_plane.0 {
            commands.trigger(Respawn { entity });
        }
    }
}

fn respawn(
    respawn: On<Respawn>,
    mut commands: Commands,
    mut characters: Query<(
        &SpawnPoint,
        &CharacterRig,
        &mut Position,
        &mut LinearVelocity,
        &mut ControllerState,
        &mut MovementIntent,
        &mut AnimationParams,
    )>,
    mut visuals: Query<&mut Transform>,
) {
    let Ok((spawn, rig, mut position, mut velocity, mut state, mut intent, mut params)) =
        characters.get_mut(respawn.entity)
    else {
        return;
    };
    info!("respawning {} at {}", respawn.entity, spawn.0);
    position.0 = spawn.0;
    velocity.0 = Vec2::ZERO;
    state.reset();
    *intent = MovementIntent::default();
    *params = AnimationParams::default();

    // back to facing right, standing up
    if let Some(mut transform) = rig.visual.and_then(|v| visuals.get_mut(v).ok()) {
        transform.rotation = Quat::IDENTITY;
    }
    if let Some(collider) = rig.crouch_collider {
        commands.entity(collider).remove::<ColliderDisabled>();
    }
}
