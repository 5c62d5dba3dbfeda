//! Sprite draw extraction
//!
//! The renderer itself lives outside the core. Each frame it asks for the
//! sprites to draw; this module walks `(Sprite, Transform)` and flattens
//! them into plain records.

use crate::components::{Sprite, Transform};
use crate::ecs::{EntityId, EntityManager};
use glam::Vec2;

/// One textured quad to draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub entity: EntityId,
    pub texture_id: String,
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: Vec2,
    /// Requested size in pixels; 0 means the texture's own size.
    pub width: i32,
    pub height: i32,
    pub frame: usize,
}

/// Collect draw records for every entity with a sprite and a transform,
/// ordered by entity id so output is stable across frames.
pub fn collect_sprite_draws(em: &EntityManager) -> Vec<SpriteDraw> {
    let mut draws: Vec<SpriteDraw> = em
        .view::<(Sprite, Transform)>()
        .into_iter()
        .map(|entity| {
            let sprite = em.get_component::<Sprite>(entity);
            let transform = em.get_component::<Transform>(entity);
            SpriteDraw {
                entity,
                texture_id: sprite.texture_id.clone(),
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
                width: sprite.width,
                height: sprite.height,
                frame: sprite.animation.current_frame,
            }
        })
        .collect();
    draws.sort_unstable_by_key(|draw| draw.entity);
    draws
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sprites_with_transforms_are_drawn() {
        let mut em = EntityManager::new();
        let hidden = em.create_entity();
        em.add_component(hidden, Sprite::new("ghost", 8, 8));

        let player = em.create_entity();
        em.add_component(player, Transform::from_xy(4.0, 2.0));
        em.add_component(player, Sprite::new("player", 0, 0));

        let draws = collect_sprite_draws(&em);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].entity, player);
        assert_eq!(draws[0].texture_id, "player");
        assert_eq!(draws[0].position, Vec2::new(4.0, 2.0));
        assert_eq!((draws[0].width, draws[0].height), (0, 0));
    }

    #[test]
    fn draws_reflect_in_place_sprite_updates() {
        let mut em = EntityManager::new();
        let e = em.create_entity();
        em.add_component(e, Transform::default());
        em.add_component(e, Sprite::new("coin", 16, 16));

        em.get_component_mut::<Sprite>(e).animation.current_frame = 3;
        assert_eq!(collect_sprite_draws(&em)[0].frame, 3);
    }
}
