//! Ground and ceiling probes.
use super::state::{ControllerNotification, ControllerState};
use avian2d::prelude::*;
use bevy::prelude::*;

/// A circle overlap query against the physics world.
pub trait OverlapQuery {
    type Collider: Copy;

    /// Every collider on `layers` overlapping the circle, self included.
    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Self::Collider>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub center: Vec2,
    pub radius: f32,
}

/// Recomputes `state.grounded` from scratch.
///
/// Returns [`ControllerNotification::Landed`] on the tick the character goes
/// from airborne to grounded, once, however many colliders are under it.
pub fn sense_ground<Q: OverlapQuery>(
    state: &mut ControllerState,
    query: &Q,
    probe: Probe,
    layers: LayerMask,
    is_self: impl Fn(Q::Collider) -> bool,
) -> Option<ControllerNotification> {
    let was_grounded = state.grounded;
    state.grounded = query
        .overlap_circle(probe.center, probe.radius, layers)
        .into_iter()
        .any(|collider| !is_self(collider));

    (!was_grounded && state.grounded).then_some(ControllerNotification::Landed)
}

/// Whether something on `layers` keeps the character from standing up.
pub fn ceiling_blocked<Q: OverlapQuery>(
    query: &Q,
    probe: Probe,
    layers: LayerMask,
    is_self: impl Fn(Q::Collider) -> bool,
) -> bool {
    query
        .overlap_circle(probe.center, probe.radius, layers)
        .into_iter()
        .any(|collider| !is_self(collider))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::physics::GameLayer;
    use std::cell::Cell;

    /// Circles in a flat list, good enough to stand in for the physics world.
    #[derive(Default)]
    pub(crate) struct FakeWorld {
        pub circles: Vec<(u32, Vec2, f32, LayerMask)>,
        pub queries: Cell<u32>,
    }

    impl FakeWorld {
        pub fn with(mut self, id: u32, center: Vec2, radius: f32, layer: GameLayer) -> Self {
            self.circles.push((id, center, radius, layer.into()));
            self
        }
    }

    impl OverlapQuery for FakeWorld {
        type Collider = u32;

        fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<u32> {
            self.queries.set(self.queries.get() + 1);
            self.circles
                .iter()
                .filter(|(_, c, r, mask)| {
                    mask.0 & layers.0 != 0 && c.distance(center) < r + radius
                })
                .map(|(id, ..)| *id)
                .collect()
        }
    }

    const SELF: u32 = 0;
    const FEET: Probe = Probe {
        center: Vec2::ZERO,
        radius: 0.2,
    };

    fn ground() -> LayerMask {
        GameLayer::Ground.into()
    }

    #[test]
    fn grounded_on_ground_layer() {
        let world = FakeWorld::default().with(1, Vec2::new(0.0, -0.5), 0.5, GameLayer::Ground);
        let mut state = ControllerState::default();
        sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert!(state.grounded);
    }

    #[test]
    fn other_layers_do_not_count() {
        let world = FakeWorld::default().with(1, Vec2::ZERO, 1.0, GameLayer::Default);
        let mut state = ControllerState::default();
        sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert!(!state.grounded);
    }

    #[test]
    fn own_colliders_do_not_count() {
        let world = FakeWorld::default().with(SELF, Vec2::ZERO, 1.0, GameLayer::Ground);
        let mut state = ControllerState::default();
        let landed = sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert!(!state.grounded);
        assert_eq!(landed, None);
    }

    #[test]
    fn removing_ground_clears_grounded_next_tick() {
        let mut world = FakeWorld::default().with(1, Vec2::ZERO, 1.0, GameLayer::Ground);
        let mut state = ControllerState::default();
        sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert!(state.grounded);

        world.circles.clear();
        sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert!(!state.grounded);
    }

    #[test]
    fn lands_once_on_many_colliders() {
        let world = FakeWorld::default()
            .with(1, Vec2::new(-0.1, -0.2), 0.1, GameLayer::Ground)
            .with(2, Vec2::new(0.0, -0.2), 0.1, GameLayer::Ground)
            .with(3, Vec2::new(0.1, -0.2), 0.1, GameLayer::Ground);
        let mut state = ControllerState::default();

        let landed = sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert_eq!(landed, Some(ControllerNotification::Landed));

        // staying on the ground is not landing again
        let landed = sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF);
        assert_eq!(landed, None);
    }

    #[test]
    fn lands_again_after_leaving_ground() {
        let mut world = FakeWorld::default().with(1, Vec2::ZERO, 1.0, GameLayer::Ground);
        let mut state = ControllerState::default();
        let mut landings = 0;
        for tick in 0..6 {
            world.circles[0].1 = if tick % 2 == 0 {
                Vec2::ZERO
            } else {
                Vec2::new(0.0, -10.0)
            };
            if sense_ground(&mut state, &world, FEET, ground(), |c| c == SELF).is_some() {
                landings += 1;
            }
        }
        assert_eq!(landings, 3);
    }

    #[test]
    fn ceiling_sees_ground_above() {
        let head = Probe {
            center: Vec2::new(0.0, 2.0),
            radius: 0.25,
        };
        let world = FakeWorld::default().with(7, Vec2::new(0.0, 2.4), 0.2, GameLayer::Ground);
        assert!(ceiling_blocked(&world, head, ground(), |c| c == SELF));
        let open = FakeWorld::default().with(7, Vec2::new(0.0, 4.0), 0.2, GameLayer::Ground);
        assert!(!ceiling_blocked(&open, head, ground(), |c| c == SELF));
    }
}
