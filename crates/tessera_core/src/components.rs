//! Built-in gameplay components
//!
//! Plain data only. Systems and the scripting layer attach these through
//! the [`EntityManager`](crate::ecs::EntityManager); nothing here knows about
//! storage.

use glam::Vec2;

/// Position, rotation and scale of an entity in 2D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

/// Linear motion state consumed by [`physics::integrate`](crate::physics::integrate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
    pub mass: f32,
}

impl RigidBody {
    pub fn new(velocity: Vec2, mass: f32) -> Self {
        Self { velocity, mass }
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: 1.0,
        }
    }
}

/// Collision geometry, relative to the entity's [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box; `size` is scaled by the transform's scale.
    Box { size: Vec2 },
    Circle { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Offset from the transform position.
    pub offset: Vec2,
    /// Triggers report overlap but are not meant to block movement.
    pub is_trigger: bool,
}

impl Collider {
    pub fn with_box(size: Vec2) -> Self {
        Self {
            shape: ColliderShape::Box { size },
            ..Self::default()
        }
    }

    pub fn with_circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            ..Self::default()
        }
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            shape: ColliderShape::Box { size: Vec2::ONE },
            offset: Vec2::ZERO,
            is_trigger: false,
        }
    }
}

/// Direction a sprite animation steps through its frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackDirection {
    #[default]
    Forward,
    Reverse,
}

/// Animation bookkeeping carried by a sprite. Playback is driven elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    pub current_frame: usize,
    /// Seconds accumulated on the current frame.
    pub elapsed: f32,
    /// Tag being played, `None` plays every frame.
    pub current_tag: Option<usize>,
    pub playing: bool,
    pub looping: bool,
    pub direction: PlaybackDirection,
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self {
            current_frame: 0,
            elapsed: 0.0,
            current_tag: None,
            playing: false,
            looping: true,
            direction: PlaybackDirection::Forward,
        }
    }
}

/// Textured quad drawn at the entity's transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sprite {
    /// Key of the texture in the asset registry.
    pub texture_id: String,
    /// Width in pixels; 0 means the texture's own width.
    pub width: i32,
    /// Height in pixels; 0 means the texture's own height.
    pub height: i32,
    pub animation: SpriteAnimation,
}

impl Sprite {
    pub fn new(texture_id: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            texture_id: texture_id.into(),
            width,
            height,
            animation: SpriteAnimation::default(),
        }
    }
}
