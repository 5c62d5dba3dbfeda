//! Physics clients of the ECS
//!
//! Velocity integration and overlap tests. These only read and write
//! components through the entity manager; they own no state.

pub mod collision;

pub use collision::{
    aabb_circle_overlap, aabb_overlap, check_collision, circle_overlap, collider_aabb,
    find_collisions, Aabb,
};

use crate::components::{RigidBody, Transform};
use crate::ecs::{EntityId, EntityManager};

/// Advance every entity with a [`Transform`] and a [`RigidBody`] by
/// `velocity * dt`. Returns the number of bodies moved.
pub fn integrate(em: &mut EntityManager, dt: f32) -> usize {
    let bodies: Vec<EntityId> = em.view::<(Transform, RigidBody)>().into_iter().collect();

    for &entity in &bodies {
        let velocity = em.get_component::<RigidBody>(entity).velocity;
        em.get_component_mut::<Transform>(entity).position += velocity * dt;
    }

    tracing::trace!(bodies = bodies.len(), dt, "integrated rigid bodies");
    bodies.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn integrate_moves_only_bodies_with_transforms() {
        let mut em = EntityManager::new();
        let moving = em.create_entity();
        em.add_component(moving, Transform::from_xy(100.0, 100.0));
        em.add_component(moving, RigidBody::new(Vec2::new(50.0, 0.0), 1.0));

        let still = em.create_entity();
        em.add_component(still, Transform::from_xy(1.0, 1.0));

        let orphan = em.create_entity();
        em.add_component(orphan, RigidBody::new(Vec2::ONE, 1.0));

        assert_eq!(integrate(&mut em, 0.5), 1);
        assert_eq!(
            em.get_component::<Transform>(moving).position,
            Vec2::new(125.0, 100.0)
        );
        assert_eq!(em.get_component::<Transform>(still).position, Vec2::ONE);
        assert!(!em.has_component::<Transform>(orphan));
    }

    #[test]
    fn integrate_on_empty_scene_is_noop() {
        let mut em = EntityManager::new();
        assert_eq!(integrate(&mut em, 1.0 / 60.0), 0);
    }
}
