//! Entity Component System core types.
//!
//! Storage is one sparse set per component type. The [`EntityManager`]
//! owns those pools behind the type-erased [`ErasedPool`] trait, indexed
//! by the process-wide id handed out by [`component_type_id`]. Queries
//! over several component types go through [`View`], which walks the
//! smallest requested pool and filters the rest with O(1) lookups.

mod component;
mod entity;
mod error;
mod manager;
mod pool;
mod view;

pub use component::{component_name, component_type_id, registered_count, Component, ComponentTypeId};
pub use entity::EntityId;
pub use error::EcsError;
pub use manager::EntityManager;
pub use pool::{ComponentPool, ErasedPool, INVALID};
pub use view::{View, ViewIter, ViewQuery};
