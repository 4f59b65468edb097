use crate::physics::GameLayer;
use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read character file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse character file: {0}")]
    Parse(#[from] ron::de::SpannedError),
    #[error("`{field}` must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("`ground_layers` is empty, the character could never be grounded")]
    NoGroundLayers,
}

/// Where a probe sits relative to the character body and how big it is.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ProbeConfig {
    pub offset: Vec2,
    pub radius: f32,
}

/// Validated tuning of a character controller.
///
/// Only constructed through [`ControllerConfig::try_from`] (or [`Default`]),
/// so systems reading it never have to re-check ranges.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct ControllerConfig {
    /// Upward impulse applied when jumping.
    pub jump_force: f32,
    /// Horizontal speed at full input.
    pub move_speed: f32,
    /// Fraction of the speed kept while crouching. 1 = 100%.
    pub crouch_speed: f32,
    /// Seconds the velocity takes to settle on its target.
    pub movement_smoothing: f32,
    /// Whether the character can steer while airborne.
    pub air_control: bool,
    /// What counts as ground (and ceiling) for the probes.
    pub ground_layers: LayerMask,
    pub ground_probe: ProbeConfig,
    pub ceiling_probe: ProbeConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            jump_force: 400.0,
            move_speed: 40.0,
            crouch_speed: 0.36,
            movement_smoothing: 0.05,
            air_control: false,
            ground_layers: GameLayer::Ground.into(),
            ground_probe: ProbeConfig {
                offset: Vec2::new(0.0, -1.0),
                radius: 0.2,
            },
            ceiling_probe: ProbeConfig {
                offset: Vec2::new(0.0, 1.0),
                radius: 0.25,
            },
        }
    }
}

/// On-disk form of [`ControllerConfig`], one RON file per character.
#[derive(Clone, Debug, Deserialize)]
pub struct ControllerSettings {
    pub jump_force: f32,
    pub move_speed: f32,
    pub crouch_speed: f32,
    pub movement_smoothing: f32,
    #[serde(default)]
    pub air_control: bool,
    pub ground_layers: Vec<GameLayer>,
    pub ground_check: (f32, f32),
    pub grounded_radius: f32,
    pub ceiling_check: (f32, f32),
    pub ceiling_radius: f32,
}

impl ControllerSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading character settings from {}", path.display());
        let str = read_to_string(path)?;
        Ok(ron::de::from_str::<ControllerSettings>(&str)?)
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    // also rejects NaN
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<f32, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

impl TryFrom<ControllerSettings> for ControllerConfig {
    type Error = ConfigError;

    fn try_from(settings: ControllerSettings) -> Result<Self, Self::Error> {
        if settings.ground_layers.is_empty() {
            return Err(ConfigError::NoGroundLayers);
        }
        let ground_layers = settings
            .ground_layers
            .iter()
            .fold(LayerMask::NONE, |mask, layer| mask | LayerMask(layer.to_bits()));
        Ok(Self {
            jump_force: positive("jump_force", settings.jump_force)?,
            move_speed: positive("move_speed", settings.move_speed)?,
            crouch_speed: within("crouch_speed", settings.crouch_speed, 0.0, 1.0)?,
            movement_smoothing: within(
                "movement_smoothing",
                settings.movement_smoothing,
                0.0,
                0.3,
            )?,
            air_control: settings.air_control,
            ground_layers,
            ground_probe: ProbeConfig {
                offset: settings.ground_check.into(),
                radius: positive("grounded_radius", settings.grounded_radius)?,
            },
            ceiling_probe: ProbeConfig {
                offset: settings.ceiling_check.into(),
                radius: positive("ceiling_radius", settings.ceiling_radius)?,
            },
        })
    }
}
