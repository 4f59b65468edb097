use crate::controller::resolver::PhysicsBody;
use crate::controller::sensor::OverlapQuery;
use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(PhysicsLayer, Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub enum GameLayer {
    #[default]
    Default,
    /// Floors, platforms and ceilings
    Ground,
    Player,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ColliderShape {
    Ball(f32),
    Cuboid(f32, f32),
    Capsule(f32, f32),
}

impl From<ColliderShape> for Collider {
    fn from(value: ColliderShape) -> Self {
        match value {
            ColliderShape::Ball(radius) => Collider::circle(radius),
            ColliderShape::Cuboid(w, h) => Collider::rectangle(w, h),
            ColliderShape::Capsule(radius, length) => Collider::capsule(radius, length),
        }
    }
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Cuboid(20.0, 20.0)
    }
}

/// Circle overlaps through avian's spatial query pipeline.
pub struct AvianOverlaps<'a, 'w, 's> {
    pub spatial_query: &'a SpatialQuery<'w, 's>,
}

impl OverlapQuery for AvianOverlaps<'_, '_, '_> {
    type Collider = Entity;

    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Entity> {
        let filter = SpatialQueryFilter::from_mask(layers);
        self.spatial_query
            .shape_intersections(&Collider::circle(radius), center, 0.0, &filter)
    }
}

/// Collects what the controller does to a body during one tick, so it can be
/// written back to the ECS afterwards in one go.
#[derive(Debug, Default)]
pub struct TickBody {
    pub velocity: Vec2,
    pub inverse_mass: f32,
    /// Requested state of the crouch collider, `None` if untouched.
    pub crouch_collider_enabled: Option<bool>,
    pub turns: u32,
}

impl TickBody {
    pub fn new(velocity: &LinearVelocity, mass: &ComputedMass) -> Self {
        Self {
            velocity: velocity.0,
            inverse_mass: mass.inverse(),
            ..default()
        }
    }
}

impl PhysicsBody for TickBody {
    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_linear_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass;
    }

    fn set_crouch_collider_enabled(&mut self, enabled: bool) {
        self.crouch_collider_enabled = Some(enabled);
    }

    fn turn_around(&mut self) {
        self.turns += 1;
    }
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default().with_length_unit(16.0))
        .insert_resource(Gravity(Vec2::NEG_Y * 980.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_respects_mass() {
        let mut body = TickBody {
            inverse_mass: 0.5,
            ..default()
        };
        body.apply_linear_impulse(Vec2::new(0.0, 400.0));
        assert_eq!(body.velocity, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn records_collider_and_turns() {
        let mut body = TickBody::default();
        assert_eq!(body.crouch_collider_enabled, None);
        body.set_crouch_collider_enabled(false);
        body.turn_around();
        body.turn_around();
        assert_eq!(body.crouch_collider_enabled, Some(false));
        assert_eq!(body.turns, 2);
    }

    #[test]
    fn layers_are_distinct_bits() {
        assert_ne!(
            LayerMask::from(GameLayer::Ground),
            LayerMask::from(GameLayer::Player)
        );
    }
}
