// component.rs - Runtime component type registration
//
// Components are identified by small u32 ids handed out in first-use order,
// not by Rust TypeIds. The ids index the entity manager's pool table, so
// they must stay dense and stable for the lifetime of the process.

use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub type ComponentTypeId = u32;

struct TypeRegistry {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
}

/// Process-wide registry. Registration happens once per type; every later
/// lookup only takes the read lock.
static REGISTRY: Lazy<RwLock<TypeRegistry>> = Lazy::new(|| {
    RwLock::new(TypeRegistry {
        ids: HashMap::new(),
        names: Vec::new(),
    })
});

/// Return the id for `T`, registering it on first request.
///
/// Ids start at 0 and increase by one for each distinct type, in the order
/// the types are first requested at runtime.
pub fn component_type_id<T: 'static>() -> ComponentTypeId {
    let key = TypeId::of::<T>();
    if let Some(&id) = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .ids
        .get(&key)
    {
        return id;
    }

    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have registered `T` between the two locks.
    if let Some(&id) = registry.ids.get(&key) {
        return id;
    }
    let id = registry.names.len() as ComponentTypeId;
    registry.ids.insert(key, id);
    registry.names.push(type_name::<T>());
    tracing::trace!(id, component = type_name::<T>(), "registered component type");
    id
}

/// Look up the Rust type name recorded for a component id.
pub fn component_name(id: ComponentTypeId) -> Option<&'static str> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names
        .get(id as usize)
        .copied()
}

/// Number of component types registered so far.
pub fn registered_count() -> usize {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names
        .len()
}

/// Types that can be stored in a component pool.
///
/// Every `'static` type qualifies. The entity manager and views take this
/// as their bound and resolve pools through [`Component::component_id`].
pub trait Component: 'static + Sized {
    /// The registry id for this component type.
    fn component_id() -> ComponentTypeId {
        component_type_id::<Self>()
    }

    /// Human-readable name for diagnostics.
    fn component_name() -> &'static str {
        type_name::<Self>()
    }
}

impl<T: 'static> Component for T {}
