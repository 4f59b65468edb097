use crate::animation::{AnimationParams, animation_state_machine};
use crate::config::{ConfigError, ControllerConfig, ControllerSettings};
use crate::controller::sampler::InputFrame;
use crate::controller::{CharacterRig, ControllerState, KillPlane, MovementIntent, SpawnPoint};
use crate::input::{Player, player_actions};
use crate::physics::{ColliderShape, GameLayer};
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy_transform_interpolation::prelude::TransformInterpolation;

const PLAYER_SETTINGS: &str = "assets/characters/player.ron";
const FEET: ColliderShape = ColliderShape::Ball(8.0);
const UPPER_BODY: ColliderShape = ColliderShape::Cuboid(14.0, 14.0);

/// A static block of ground, centered on `at`.
fn ground(commands: &mut Commands, name: &'static str, at: Vec2, size: Vec2) {
    commands.spawn((
        Name::new(name),
        Sprite::from_color(Color::srgb(0.35, 0.3, 0.25), size),
        Transform::from_translation(at.extend(0.0)),
        RigidBody::Static,
        Collider::from(ColliderShape::Cuboid(size.x, size.y)),
        CollisionLayers::new(GameLayer::Ground, LayerMask::ALL),
    ));
}

/// Spawns a controlled character at `at`, crouch collider and sprite included.
pub fn spawn_character(commands: &mut Commands, config: ControllerConfig, at: Vec2) -> Entity {
    let layers = CollisionLayers::new(GameLayer::Player, [GameLayer::Default, GameLayer::Ground]);
    let body = commands
        .spawn((
            Name::new("Player"),
            (Player, player_actions()),
            (
                InputFrame::default(),
                MovementIntent::default(),
                ControllerState::default(),
                AnimationParams::default(),
                animation_state_machine(),
            ),
            SpawnPoint(at),
            Transform::from_translation(at.extend(1.0)),
            TransformInterpolation,
            (
                RigidBody::Dynamic,
                Collider::from(FEET),
                layers,
                LockedAxes::ROTATION_LOCKED,
                Mass(1.0),
                NoAutoMass,
                Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
            ),
        ))
        .id();

    let crouch_collider = commands
        .spawn((
            Name::new("Upper body"),
            Collider::from(UPPER_BODY),
            layers,
            Transform::from_xyz(0.0, 10.0, 0.0),
            ChildOf(body),
        ))
        .id();
    let visual = commands
        .spawn((
            Name::new("Sprite"),
            Sprite::from_color(Color::srgb(0.8, 0.25, 0.2), Vec2::new(16.0, 32.0)),
            Transform::from_xyz(0.0, 8.0, 0.0),
            ChildOf(body),
        ))
        .id();

    commands.entity(body).insert((
        config,
        CharacterRig {
            crouch_collider: Some(crouch_collider),
            visual: Some(visual),
        },
    ));
    body
}

fn load_player() -> Result<ControllerConfig, ConfigError> {
    ControllerConfig::try_from(ControllerSettings::load(PLAYER_SETTINGS)?)
}

fn setup(mut commands: Commands, mut exit: MessageWriter<AppExit>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 0.5,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(160.0, 60.0, 0.0),
    ));

    ground(&mut commands, "Floor", Vec2::new(150.0, -10.0), Vec2::new(900.0, 20.0));
    ground(&mut commands, "Ledge", Vec2::new(-120.0, 50.0), Vec2::new(80.0, 12.0));
    // low enough that only a crouching character fits underneath
    ground(&mut commands, "Tunnel", Vec2::new(330.0, 40.0), Vec2::new(140.0, 40.0));

    let config = match load_player() {
        Ok(config) => config,
        Err(e) => {
            error!("refusing to start, player is misconfigured: {e}");
            exit.write(AppExit::error());
            return;
        }
    };
    spawn_character(&mut commands, config, Vec2::new(0.0, 40.0));
}

pub(crate) fn plugin(app: &mut App) {
    app.insert_resource(KillPlane(-400.0))
        .add_systems(Startup, setup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_player_settings_are_valid() {
        let config = load_player().unwrap();
        assert!(config.ground_probe.offset.y < 0.0);
        assert!(config.ceiling_probe.offset.y > 0.0);
        assert_eq!(config.ground_layers, LayerMask::from(GameLayer::Ground));
    }
}
