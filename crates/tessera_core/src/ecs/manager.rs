// manager.rs - Entity identity and per-type component pools

use crate::ecs::{
    Component, ComponentPool, ComponentTypeId, EcsError, EntityId, ErasedPool, View, ViewQuery,
};

/// Owns every component pool of a scene and issues entity ids.
///
/// Pools are created lazily on the first write for their type and live
/// until the manager is dropped. Reads never create pools: looking up a
/// type that was never added behaves like looking up an absent component.
pub struct EntityManager {
    next_entity_id: EntityId,
    pools: Vec<Option<Box<dyn ErasedPool>>>,
}

impl EntityManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            pools: Vec::new(),
        }
    }

    /// Issue a new entity id. Ids start at 0 and are never reused.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Remove every component attached to `entity`.
    ///
    /// Always returns `true`, including for ids that carried no components.
    /// The return value does not mean "the entity existed". The id itself
    /// is not recycled.
    pub fn delete_entity(&mut self, entity: EntityId) -> bool {
        let mut removed = 0usize;
        for pool in self.pools.iter_mut().flatten() {
            if pool.remove(entity) {
                removed += 1;
            }
        }
        tracing::trace!(entity, removed, "deleted entity");
        true
    }

    /// Whether `entity` has been issued by this manager.
    pub fn is_issued(&self, entity: EntityId) -> bool {
        entity < self.next_entity_id
    }

    /// Number of entity ids issued so far.
    pub fn entity_count(&self) -> usize {
        self.next_entity_id as usize
    }

    /// Number of pools that have been created.
    pub fn pool_count(&self) -> usize {
        self.pools.iter().flatten().count()
    }

    /// Number of components currently attached to `entity`.
    pub fn component_count(&self, entity: EntityId) -> usize {
        self.pools
            .iter()
            .flatten()
            .filter(|pool| pool.has(entity))
            .count()
    }

    pub(crate) fn erased_pool(&self, id: ComponentTypeId) -> Option<&dyn ErasedPool> {
        self.pools.get(id as usize)?.as_deref()
    }

    /// Typed access to the pool for `T`, if it has been created.
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.erased_pool(T::component_id())?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    /// Mutable typed access to the pool for `T`, if it has been created.
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(T::component_id() as usize)?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }

    fn pool_or_insert<T: Component>(&mut self) -> &mut ComponentPool<T> {
        let id = T::component_id() as usize;
        if id >= self.pools.len() {
            self.pools.resize_with(id + 1, || None);
        }

        let slot = self.pools[id].get_or_insert_with(|| {
            tracing::debug!(component = T::component_name(), id, "creating component pool");
            Box::new(ComponentPool::<T>::new())
        });

        match slot.as_any_mut().downcast_mut::<ComponentPool<T>>() {
            Some(pool) => pool,
            // The registry hands out one id per TypeId, so a slot can only
            // ever hold the pool type it was created for.
            None => unreachable!("pool slot {id} holds a different component type"),
        }
    }

    /// Attach a component, creating the pool for `T` if needed.
    pub fn try_add_component<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
    ) -> Result<&mut T, EcsError> {
        self.pool_or_insert::<T>().try_add(entity, value)
    }

    /// Attach a component, creating the pool for `T` if needed.
    ///
    /// # Panics
    /// Panics if the entity already has a `T`.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, value: T) -> &mut T {
        self.pool_or_insert::<T>().add(entity, value)
    }

    pub fn try_get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.pool::<T>()?.try_get(entity)
    }

    pub fn try_get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.pool_mut::<T>()?.try_get_mut(entity)
    }

    /// # Panics
    /// Panics if the entity has no `T`, including when no `T` was ever added.
    pub fn get_component<T: Component>(&self, entity: EntityId) -> &T {
        match self.try_get_component::<T>(entity) {
            Some(value) => value,
            None => panic!("{}", missing::<T>(entity)),
        }
    }

    /// # Panics
    /// Panics if the entity has no `T`, including when no `T` was ever added.
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> &mut T {
        match self.try_get_component_mut::<T>(entity) {
            Some(value) => value,
            None => panic!("{}", missing::<T>(entity)),
        }
    }

    /// Whether `entity` has a `T`. Never allocates a pool.
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.pool::<T>().is_some_and(|pool| pool.has(entity))
    }

    /// Detach `entity`'s `T`. Returns `false` if it had none.
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> bool {
        self.pool_mut::<T>().is_some_and(|pool| pool.remove(entity))
    }

    /// Query the entities holding every component type in `Q`.
    ///
    /// `Q` is a tuple such as `(Transform, RigidBody)`. The view iterates the
    /// smallest of the requested pools; if any requested type has no pool
    /// yet, the view is empty.
    pub fn view<Q: ViewQuery>(&self) -> View<'_, Q> {
        View::new(self)
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

fn missing<T: Component>(entity: EntityId) -> EcsError {
    EcsError::ComponentMissing {
        entity,
        component: T::component_name(),
    }
}
