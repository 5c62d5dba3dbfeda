//! Engine API exposed to scripts
//!
//! Scripts see a single global `engine` object. Every function takes plain
//! numbers and strings; entities cross the boundary as their integer id.
//! Host-side failures (unknown entity, duplicate component, missing
//! texture) are thrown into the script as `Error`s so a script can catch
//! them, and never unwind through the host.

use crate::runtime::ScriptRuntime;
use crate::ScriptError;
use rquickjs::function::Opt;
use rquickjs::{Ctx, Exception, Function, Object};
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::rc::Rc;
use tessera_asset::{AssetError, TextureRegistry};
use tessera_core::components::{Collider, RigidBody, Sprite, Transform};
use tessera_core::ecs::{EcsError, EntityId, EntityManager};
use tessera_core::glam::Vec2;
use tessera_core::physics;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Ecs(#[from] EcsError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("`{0}` is not a valid entity id")]
    InvalidEntityId(f64),

    #[error("engine state is already borrowed")]
    Busy,
}

/// Convert a JS number into an entity id. Only finite, non-negative
/// integers in `u32` range are accepted.
pub fn entity_arg(id: f64) -> Result<EntityId, BindingError> {
    if !id.is_finite() || id.fract() != 0.0 || id < 0.0 || id > f64::from(EntityId::MAX) {
        return Err(BindingError::InvalidEntityId(id));
    }
    Ok(id as EntityId)
}

/// Host side of the `engine` object.
///
/// Cloning is cheap; clones share the same entity manager and texture
/// registry.
#[derive(Clone)]
pub struct EngineBindings {
    entities: Rc<RefCell<EntityManager>>,
    textures: Rc<RefCell<TextureRegistry>>,
}

impl EngineBindings {
    pub fn new(entities: Rc<RefCell<EntityManager>>, textures: Rc<RefCell<TextureRegistry>>) -> Self {
        Self { entities, textures }
    }

    pub fn entities(&self) -> &Rc<RefCell<EntityManager>> {
        &self.entities
    }

    pub fn textures(&self) -> &Rc<RefCell<TextureRegistry>> {
        &self.textures
    }

    fn manager(&self) -> Result<RefMut<'_, EntityManager>, BindingError> {
        self.entities.try_borrow_mut().map_err(|_| BindingError::Busy)
    }

    fn issued(&self, entity: EntityId) -> Result<RefMut<'_, EntityManager>, BindingError> {
        let em = self.manager()?;
        if !em.is_issued(entity) {
            return Err(EcsError::UnknownEntity { entity }.into());
        }
        Ok(em)
    }

    pub fn create_entity(&self) -> Result<EntityId, BindingError> {
        Ok(self.manager()?.create_entity())
    }

    pub fn delete_entity(&self, entity: EntityId) -> Result<bool, BindingError> {
        Ok(self.issued(entity)?.delete_entity(entity))
    }

    pub fn add_transform(&self, entity: EntityId, x: f32, y: f32) -> Result<(), BindingError> {
        self.issued(entity)?
            .try_add_component(entity, Transform::from_xy(x, y))?;
        Ok(())
    }

    pub fn add_rigidbody(
        &self,
        entity: EntityId,
        vx: f32,
        vy: f32,
        mass: f32,
    ) -> Result<(), BindingError> {
        self.issued(entity)?
            .try_add_component(entity, RigidBody::new(Vec2::new(vx, vy), mass))?;
        Ok(())
    }

    /// Attach a sprite. The texture must already be loaded; a width or
    /// height of 0 keeps the texture's own size.
    pub fn add_sprite(
        &self,
        entity: EntityId,
        texture_id: &str,
        width: i32,
        height: i32,
    ) -> Result<(), BindingError> {
        let mut em = self.issued(entity)?;
        self.textures
            .try_borrow()
            .map_err(|_| BindingError::Busy)?
            .require(texture_id)?;
        em.try_add_component(entity, Sprite::new(texture_id, width, height))?;
        Ok(())
    }

    pub fn add_box_collider(&self, entity: EntityId, width: f32, height: f32) -> Result<(), BindingError> {
        self.issued(entity)?
            .try_add_component(entity, Collider::with_box(Vec2::new(width, height)))?;
        Ok(())
    }

    pub fn add_circle_collider(&self, entity: EntityId, radius: f32) -> Result<(), BindingError> {
        self.issued(entity)?
            .try_add_component(entity, Collider::with_circle(radius))?;
        Ok(())
    }

    pub fn get_position(&self, entity: EntityId) -> Result<Vec2, BindingError> {
        let em = self.issued(entity)?;
        let transform = em
            .try_get_component::<Transform>(entity)
            .ok_or_else(|| missing::<Transform>(entity))?;
        Ok(transform.position)
    }

    pub fn set_position(&self, entity: EntityId, x: f32, y: f32) -> Result<(), BindingError> {
        let mut em = self.issued(entity)?;
        let transform = em
            .try_get_component_mut::<Transform>(entity)
            .ok_or_else(|| missing::<Transform>(entity))?;
        transform.position = Vec2::new(x, y);
        Ok(())
    }

    pub fn get_velocity(&self, entity: EntityId) -> Result<Vec2, BindingError> {
        let em = self.issued(entity)?;
        let body = em
            .try_get_component::<RigidBody>(entity)
            .ok_or_else(|| missing::<RigidBody>(entity))?;
        Ok(body.velocity)
    }

    /// Advance every rigid body by `dt` seconds. Returns how many moved.
    pub fn physics_update(&self, dt: f32) -> Result<usize, BindingError> {
        let mut em = self.manager()?;
        Ok(physics::integrate(&mut em, dt))
    }

    pub fn load_texture(&self, id: &str, path: &str) -> Result<u64, BindingError> {
        let handle = self
            .textures
            .try_borrow_mut()
            .map_err(|_| BindingError::Busy)?
            .load_texture(id, path)?;
        Ok(handle.id())
    }

    /// Install the global `engine` object into the runtime's context.
    pub fn install(&self, runtime: &ScriptRuntime, asset_root: &Path) -> Result<(), ScriptError> {
        let asset_root = asset_root.to_string_lossy().into_owned();
        runtime
            .context()
            .with(|ctx| self.register(&ctx, asset_root))
            .map_err(ScriptError::from)
    }

    fn register<'js>(&self, ctx: &Ctx<'js>, asset_root: String) -> rquickjs::Result<()> {
        let engine = Object::new(ctx.clone())?;

        let b = self.clone();
        engine.set(
            "create_entity",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>| throw(&ctx, b.create_entity()))?,
        )?;

        let b = self.clone();
        engine.set(
            "delete_entity",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64| {
                throw(&ctx, entity_arg(id).and_then(|id| b.delete_entity(id)))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "add_transform",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64, x: f32, y: f32| {
                throw(&ctx, entity_arg(id).and_then(|id| b.add_transform(id, x, y)))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "add_rigidbody",
            Function::new(
                ctx.clone(),
                move |ctx: Ctx<'js>, id: f64, vx: f32, vy: f32, mass: Opt<f32>| {
                    throw(
                        &ctx,
                        entity_arg(id)
                            .and_then(|id| b.add_rigidbody(id, vx, vy, mass.0.unwrap_or(1.0))),
                    )
                },
            )?,
        )?;

        let b = self.clone();
        engine.set(
            "add_sprite",
            Function::new(
                ctx.clone(),
                move |ctx: Ctx<'js>, id: f64, texture: String, width: Opt<i32>, height: Opt<i32>| {
                    throw(
                        &ctx,
                        entity_arg(id).and_then(|id| {
                            b.add_sprite(id, &texture, width.0.unwrap_or(0), height.0.unwrap_or(0))
                        }),
                    )
                },
            )?,
        )?;

        let b = self.clone();
        engine.set(
            "add_box_collider",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64, w: f32, h: f32| {
                throw(&ctx, entity_arg(id).and_then(|id| b.add_box_collider(id, w, h)))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "add_circle_collider",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64, radius: Opt<f32>| {
                throw(
                    &ctx,
                    entity_arg(id).and_then(|id| b.add_circle_collider(id, radius.0.unwrap_or(0.5))),
                )
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "get_position",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64| {
                throw(&ctx, entity_arg(id).and_then(|id| b.get_position(id)).map(|p| vec![p.x, p.y]))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "set_position",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64, x: f32, y: f32| {
                throw(&ctx, entity_arg(id).and_then(|id| b.set_position(id, x, y)))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "get_velocity",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: f64| {
                throw(&ctx, entity_arg(id).and_then(|id| b.get_velocity(id)).map(|v| vec![v.x, v.y]))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "physics_update",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, dt: f32| {
                throw(&ctx, b.physics_update(dt).map(|moved| moved as u32))
            })?,
        )?;

        let b = self.clone();
        engine.set(
            "load_texture",
            Function::new(ctx.clone(), move |ctx: Ctx<'js>, id: String, path: String| {
                throw(&ctx, b.load_texture(&id, &path).map(|_| ()))
            })?,
        )?;

        engine.set(
            "log",
            Function::new(ctx.clone(), |message: String| {
                tracing::info!(target: "script", "{message}");
            })?,
        )?;

        engine.set("ASSET_ROOT", asset_root)?;

        ctx.globals().set("engine", engine)
    }
}

fn missing<T>(entity: EntityId) -> BindingError {
    BindingError::Ecs(EcsError::ComponentMissing {
        entity,
        component: std::any::type_name::<T>(),
    })
}

/// Surface a host error as a thrown JS `Error`.
fn throw<T>(ctx: &Ctx<'_>, result: Result<T, BindingError>) -> rquickjs::Result<T> {
    result.map_err(|err| {
        tracing::debug!(error = %err, "script call failed");
        Exception::throw_message(ctx, &err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> EngineBindings {
        EngineBindings::new(
            Rc::new(RefCell::new(EntityManager::new())),
            Rc::new(RefCell::new(TextureRegistry::new())),
        )
    }

    fn installed() -> (ScriptRuntime, EngineBindings) {
        let runtime = ScriptRuntime::new().unwrap();
        let b = bindings();
        b.install(&runtime, Path::new("assets")).unwrap();
        (runtime, b)
    }

    #[test]
    fn host_calls_validate_entities() {
        let b = bindings();
        assert!(matches!(
            b.add_transform(0, 1.0, 1.0),
            Err(BindingError::Ecs(EcsError::UnknownEntity { entity: 0 }))
        ));

        let e = b.create_entity().unwrap();
        b.add_transform(e, 1.0, 2.0).unwrap();
        assert!(matches!(
            b.add_transform(e, 0.0, 0.0),
            Err(BindingError::Ecs(EcsError::ComponentAlreadyPresent { .. }))
        ));
        assert_eq!(b.get_position(e).unwrap(), Vec2::new(1.0, 2.0));
        assert!(matches!(
            b.get_velocity(e),
            Err(BindingError::Ecs(EcsError::ComponentMissing { .. }))
        ));
    }

    #[test]
    fn sprite_requires_loaded_texture() {
        let b = bindings();
        let e = b.create_entity().unwrap();
        assert!(matches!(
            b.add_sprite(e, "player", 0, 0),
            Err(BindingError::Asset(AssetError::UnknownTexture { .. }))
        ));

        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        b.load_texture("player", path).unwrap();
        b.add_sprite(e, "player", 32, 32).unwrap();
        assert!(b.entities().borrow().has_component::<Sprite>(e));
    }

    #[test]
    fn physics_update_moves_bodies_through_shared_manager() {
        let b = bindings();
        let moving = b.create_entity().unwrap();
        let still = b.create_entity().unwrap();
        b.add_transform(moving, 0.0, 0.0).unwrap();
        b.add_rigidbody(moving, 4.0, 2.0, 1.0).unwrap();
        b.add_transform(still, 1.0, 1.0).unwrap();

        assert_eq!(b.physics_update(0.5).unwrap(), 1);
        assert_eq!(b.get_position(moving).unwrap(), Vec2::new(2.0, 1.0));
        assert_eq!(b.get_position(still).unwrap(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn entity_arg_accepts_only_whole_numbers() {
        assert_eq!(entity_arg(0.0).unwrap(), 0);
        assert_eq!(entity_arg(7.0).unwrap(), 7);
        for bad in [1.5, -1.0, f64::NAN, f64::INFINITY, 1e12] {
            assert!(
                matches!(entity_arg(bad), Err(BindingError::InvalidEntityId(_))),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn fractional_and_nan_ids_throw_in_script() {
        let (runtime, _b) = installed();
        runtime
            .execute("var e = engine.create_entity(); engine.add_transform(e, 3, 4);")
            .unwrap();

        let caught: Vec<String> = runtime
            .eval(
                r#"
                [0.5, NaN, -1].map(function (id) {
                    try {
                        engine.get_position(id);
                        return "accepted";
                    } catch (err) {
                        return err.message;
                    }
                })
                "#,
            )
            .unwrap();
        assert_eq!(
            caught,
            vec![
                "`0.5` is not a valid entity id",
                "`NaN` is not a valid entity id",
                "`-1` is not a valid entity id",
            ]
        );
        assert_eq!(runtime.eval::<Vec<f32>>("engine.get_position(0)").unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn rigidbody_mass_is_optional() {
        let (runtime, b) = installed();
        runtime
            .execute(
                r#"
                var light = engine.create_entity();
                engine.add_rigidbody(light, 1, 0);
                var heavy = engine.create_entity();
                engine.add_rigidbody(heavy, 1, 0, 5);
                "#,
            )
            .unwrap();

        let em = b.entities().borrow();
        assert_eq!(em.get_component::<RigidBody>(0).mass, 1.0);
        assert_eq!(em.get_component::<RigidBody>(1).mass, 5.0);
    }

    #[test]
    fn busy_manager_is_an_error_not_a_panic() {
        let b = bindings();
        let _guard = b.entities().borrow_mut();
        assert!(matches!(b.create_entity(), Err(BindingError::Busy)));
    }

    #[test]
    fn script_moves_entity_through_physics() {
        let (runtime, b) = installed();
        runtime
            .execute(
                r#"
                var e = engine.create_entity();
                engine.add_transform(e, 0, 0);
                engine.add_rigidbody(e, 10, -4);
                engine.physics_update(0.5);
                var pos = engine.get_position(e);
                "#,
            )
            .unwrap();

        assert_eq!(runtime.eval::<Vec<f32>>("pos").unwrap(), vec![5.0, -2.0]);
        assert_eq!(runtime.eval::<Vec<f32>>("engine.get_velocity(e)").unwrap(), vec![10.0, -4.0]);
        let em = b.entities().borrow();
        assert_eq!(em.get_component::<RigidBody>(0).mass, 1.0);
    }

    #[test]
    fn script_can_catch_host_errors() {
        let (runtime, _b) = installed();
        let message: String = runtime
            .eval(
                r#"
                (function () {
                    try {
                        engine.get_position(42);
                        return "no error";
                    } catch (e) {
                        return e.message;
                    }
                })()
                "#,
            )
            .unwrap();
        assert_eq!(message, "entity 42 was never created");
    }

    #[test]
    fn uncaught_host_error_reaches_the_runtime() {
        let (runtime, _b) = installed();
        let err = runtime
            .execute("var e = engine.create_entity(); engine.get_position(e);")
            .unwrap_err();
        match err {
            ScriptError::Exception { message, .. } => {
                assert!(message.contains("does not have component"), "{message}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn set_position_and_delete_entity() {
        let (runtime, b) = installed();
        runtime
            .execute(
                r#"
                var e = engine.create_entity();
                engine.add_transform(e, 1, 1);
                engine.add_box_collider(e, 2, 2);
                engine.set_position(e, 7, 8);
                "#,
            )
            .unwrap();
        assert_eq!(b.get_position(0).unwrap(), Vec2::new(7.0, 8.0));

        assert!(runtime.eval::<bool>("engine.delete_entity(e)").unwrap());
        assert_eq!(b.entities().borrow().component_count(0), 0);
    }

    #[test]
    fn asset_root_is_exposed() {
        let (runtime, _b) = installed();
        assert_eq!(runtime.eval::<String>("engine.ASSET_ROOT").unwrap(), "assets");
    }
}
