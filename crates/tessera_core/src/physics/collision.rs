//! Overlap tests between colliders
//!
//! Box colliders are axis-aligned; rotation is ignored. Box/box overlap is
//! strict (touching edges do not collide), circle/circle compares the centre
//! distance against the radius sum, and box/circle counts a circle touching
//! the box as colliding.

use crate::components::{Collider, ColliderShape, Transform};
use crate::ecs::{EntityId, EntityManager};
use crate::math::clamp_to_box;
use glam::Vec2;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }
}

/// World-space box of a box-shaped collider. `None` for circles.
pub fn collider_aabb(transform: &Transform, collider: &Collider) -> Option<Aabb> {
    match world_shape(transform, collider) {
        Shape::Box(aabb) => Some(aabb),
        Shape::Circle { .. } => None,
    }
}

pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

pub fn circle_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    center_a.distance(center_b) < radius_a + radius_b
}

pub fn aabb_circle_overlap(aabb: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = clamp_to_box(center, aabb.min, aabb.max);
    center.distance(closest) <= radius
}

enum Shape {
    Box(Aabb),
    Circle { center: Vec2, radius: f32 },
}

fn world_shape(transform: &Transform, collider: &Collider) -> Shape {
    match collider.shape {
        ColliderShape::Box { size } => {
            let center = transform.position + collider.offset;
            Shape::Box(Aabb::from_center(center, size * transform.scale * 0.5))
        }
        ColliderShape::Circle { radius } => Shape::Circle {
            center: transform.position + collider.offset,
            radius,
        },
    }
}

fn shapes_overlap(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Box(a), Shape::Box(b)) => aabb_overlap(a, b),
        (
            Shape::Circle { center: ca, radius: ra },
            Shape::Circle { center: cb, radius: rb },
        ) => circle_overlap(*ca, *ra, *cb, *rb),
        (Shape::Box(aabb), Shape::Circle { center, radius })
        | (Shape::Circle { center, radius }, Shape::Box(aabb)) => {
            aabb_circle_overlap(aabb, *center, *radius)
        }
    }
}

fn shape_of(em: &EntityManager, entity: EntityId) -> Option<Shape> {
    let collider = em.try_get_component::<Collider>(entity)?;
    let transform = em.try_get_component::<Transform>(entity)?;
    Some(world_shape(transform, collider))
}

/// Whether two entities' colliders overlap.
///
/// Entities without both a [`Collider`] and a [`Transform`] never collide.
pub fn check_collision(em: &EntityManager, a: EntityId, b: EntityId) -> bool {
    match (shape_of(em, a), shape_of(em, b)) {
        (Some(a), Some(b)) => shapes_overlap(&a, &b),
        _ => false,
    }
}

/// Every overlapping pair among entities with a collider and a transform,
/// as `(lower id, higher id)` sorted ascending.
pub fn find_collisions(em: &EntityManager) -> Vec<(EntityId, EntityId)> {
    let mut shapes: Vec<(EntityId, Shape)> = em
        .view::<(Transform, Collider)>()
        .into_iter()
        .filter_map(|entity| Some((entity, shape_of(em, entity)?)))
        .collect();
    shapes.sort_unstable_by_key(|(entity, _)| *entity);

    let mut pairs = Vec::new();
    for (i, (a, shape_a)) in shapes.iter().enumerate() {
        for (b, shape_b) in &shapes[i + 1..] {
            if shapes_overlap(shape_a, shape_b) {
                pairs.push((*a, *b));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(em: &mut EntityManager, x: f32, y: f32, collider: Collider) -> EntityId {
        let e = em.create_entity();
        em.add_component(e, Transform::from_xy(x, y));
        em.add_component(e, collider);
        e
    }

    #[test]
    fn aabb_edges_touching_do_not_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::ONE);
        let c = Aabb::from_center(Vec2::new(1.5, 0.5), Vec2::ONE);
        assert!(!aabb_overlap(&a, &b));
        assert!(aabb_overlap(&a, &c));
    }

    #[test]
    fn circle_overlap_uses_radius_sum() {
        assert!(circle_overlap(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0));
        assert!(!circle_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
    }

    #[test]
    fn aabb_circle_touching_counts() {
        let aabb = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        assert!(aabb_circle_overlap(&aabb, Vec2::new(2.0, 0.0), 1.0));
        assert!(!aabb_circle_overlap(&aabb, Vec2::new(2.5, 0.0), 1.0));
        assert!(aabb_circle_overlap(&aabb, Vec2::ZERO, 0.1));
    }

    #[test]
    fn collider_aabb_applies_offset_and_scale() {
        let mut transform = Transform::from_xy(10.0, 0.0);
        transform.scale = Vec2::splat(2.0);
        let mut collider = Collider::with_box(Vec2::new(2.0, 4.0));
        collider.offset = Vec2::new(1.0, 0.0);

        let aabb = collider_aabb(&transform, &collider).unwrap();
        assert_eq!(aabb.min, Vec2::new(9.0, -4.0));
        assert_eq!(aabb.max, Vec2::new(13.0, 4.0));
        assert!(collider_aabb(&transform, &Collider::with_circle(1.0)).is_none());
    }

    #[test]
    fn check_collision_handles_every_shape_pair() {
        let mut em = EntityManager::new();
        let box_a = spawn(&mut em, 0.0, 0.0, Collider::with_box(Vec2::splat(2.0)));
        let box_b = spawn(&mut em, 1.5, 0.0, Collider::with_box(Vec2::splat(2.0)));
        let circle_a = spawn(&mut em, 0.0, 2.4, Collider::with_circle(1.5));
        let circle_b = spawn(&mut em, 0.0, 4.5, Collider::with_circle(1.0));

        assert!(check_collision(&em, box_a, box_b));
        assert!(check_collision(&em, circle_a, circle_b));
        assert!(check_collision(&em, box_a, circle_a));
        assert!(check_collision(&em, circle_a, box_a));
        assert!(!check_collision(&em, box_b, circle_b));
    }

    #[test]
    fn missing_collider_never_collides() {
        let mut em = EntityManager::new();
        let a = spawn(&mut em, 0.0, 0.0, Collider::default());
        let bare = em.create_entity();
        em.add_component(bare, Transform::default());
        assert!(!check_collision(&em, a, bare));
        assert!(!check_collision(&em, a, 1_000));
    }

    #[test]
    fn find_collisions_reports_sorted_pairs() {
        let mut em = EntityManager::new();
        let a = spawn(&mut em, 0.0, 0.0, Collider::with_circle(1.0));
        let _far = spawn(&mut em, 50.0, 50.0, Collider::with_circle(1.0));
        let b = spawn(&mut em, 1.0, 0.0, Collider::with_circle(1.0));
        let c = spawn(&mut em, 0.0, 0.5, Collider::with_box(Vec2::ONE));

        assert_eq!(find_collisions(&em), vec![(a, b), (a, c), (b, c)]);
    }
}
