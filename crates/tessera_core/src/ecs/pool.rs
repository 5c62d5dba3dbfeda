use crate::ecs::{EcsError, EntityId};
use std::any::{type_name, Any};

/// Sparse slot marker for "entity has no component in this pool".
pub const INVALID: u32 = u32::MAX;

/// Type-erased view of a component pool.
///
/// The entity manager stores pools of different `T` side by side through
/// this trait. It covers everything that does not need to know `T`:
/// membership, removal, size and the dense entity list views iterate over.
pub trait ErasedPool: Any {
    fn has(&self, entity: EntityId) -> bool;

    /// Remove the entity's component, returning whether one was present.
    fn remove(&mut self, entity: EntityId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities currently stored, in dense order.
    fn entities(&self) -> &[EntityId];

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse-set storage for a single component type.
///
/// - `sparse[entity]` → index into `dense`, or [`INVALID`]
/// - `dense`           → packed component values
/// - `dense_to_entity` → owning entity of each dense slot
///
/// Removal swaps the last dense element into the hole, so dense order is
/// not stable across removals.
pub struct ComponentPool<T> {
    sparse: Vec<u32>,
    dense: Vec<T>,
    dense_to_entity: Vec<EntityId>,
}

impl<T> ComponentPool<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            dense_to_entity: Vec::new(),
        }
    }

    #[inline]
    fn dense_index(&self, entity: EntityId) -> Option<usize> {
        match self.sparse.get(entity as usize) {
            Some(&slot) if slot != INVALID => Some(slot as usize),
            _ => None,
        }
    }

    fn ensure_sparse_len(&mut self, entity: EntityId) {
        let needed = entity as usize + 1;
        if needed > self.sparse.len() {
            self.sparse.resize(needed, INVALID);
        }
    }

    #[inline]
    pub fn has(&self, entity: EntityId) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Insert a component, failing if the entity already has one.
    pub fn try_add(&mut self, entity: EntityId, value: T) -> Result<&mut T, EcsError> {
        if self.has(entity) {
            return Err(EcsError::ComponentAlreadyPresent {
                entity,
                component: type_name::<T>(),
            });
        }

        self.ensure_sparse_len(entity);
        let index = self.dense.len();
        debug_assert!(index < INVALID as usize, "component pool is full");

        self.sparse[entity as usize] = index as u32;
        self.dense.push(value);
        self.dense_to_entity.push(entity);

        Ok(&mut self.dense[index])
    }

    /// Insert a component.
    ///
    /// # Panics
    /// Panics if the entity already has this component. Existing values are
    /// never overwritten.
    pub fn add(&mut self, entity: EntityId, value: T) -> &mut T {
        match self.try_add(entity, value) {
            Ok(slot) => slot,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_get(&self, entity: EntityId) -> Option<&T> {
        let index = self.dense_index(entity)?;
        Some(&self.dense[index])
    }

    pub fn try_get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        Some(&mut self.dense[index])
    }

    /// # Panics
    /// Panics if the entity does not have this component.
    pub fn get(&self, entity: EntityId) -> &T {
        match self.try_get(entity) {
            Some(value) => value,
            None => panic!("{}", Self::missing(entity)),
        }
    }

    /// # Panics
    /// Panics if the entity does not have this component.
    pub fn get_mut(&mut self, entity: EntityId) -> &mut T {
        match self.try_get_mut(entity) {
            Some(value) => value,
            None => panic!("{}", Self::missing(entity)),
        }
    }

    fn missing(entity: EntityId) -> EcsError {
        EcsError::ComponentMissing {
            entity,
            component: type_name::<T>(),
        }
    }

    /// Remove and return the entity's component via swap-remove.
    pub fn take(&mut self, entity: EntityId) -> Option<T> {
        let index = self.dense_index(entity)?;

        let value = self.dense.swap_remove(index);
        self.dense_to_entity.swap_remove(index);

        // The former last element now lives at `index`; repoint its slot.
        if let Some(&moved) = self.dense_to_entity.get(index) {
            self.sparse[moved as usize] = index as u32;
        }
        self.sparse[entity as usize] = INVALID;

        Some(value)
    }

    /// Remove the entity's component. Returns `false` if it had none.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        self.take(entity).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Entities in dense order. This is the candidate list views drive from.
    #[inline]
    pub fn entities(&self) -> &[EntityId] {
        &self.dense_to_entity
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Length of the sparse index, i.e. one past the highest entity ever
    /// inserted into this pool.
    #[inline]
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.dense_to_entity.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.dense_to_entity.iter().copied().zip(self.dense.iter_mut())
    }

    /// Drop every component while keeping the sparse allocation.
    pub fn clear(&mut self) {
        for &entity in &self.dense_to_entity {
            self.sparse[entity as usize] = INVALID;
        }
        self.dense.clear();
        self.dense_to_entity.clear();
    }
}

impl<T> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ErasedPool for ComponentPool<T> {
    fn has(&self, entity: EntityId) -> bool {
        ComponentPool::has(self, entity)
    }

    fn remove(&mut self, entity: EntityId) -> bool {
        ComponentPool::remove(self, entity)
    }

    fn len(&self) -> usize {
        ComponentPool::len(self)
    }

    fn entities(&self) -> &[EntityId] {
        ComponentPool::entities(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
