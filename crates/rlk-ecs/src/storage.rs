//! Component storage - one sparse set per component type.
//!
//! Values live in a dense `Vec<T>` alongside a parallel `Vec<Entity>`, so
//! iteration is a linear walk. A sparse table indexed by entity slot maps to
//! the dense row, giving O(1) attach, detach, and lookup. Detach swap-removes
//! and patches the sparse entry of the row that moved.

use std::any::Any;

use crate::{component::Component, entity::Entity};

/// Dense row index inside a store.
type Row = u32;

/// Storage for every instance of one component type.
pub struct ComponentStore<T> {
    /// Component values, densely packed.
    dense: Vec<T>,
    /// Owner of each dense row.
    entities: Vec<Entity>,
    /// Entity slot index -> dense row.
    sparse: Vec<Option<Row>>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owners of the stored components, in dense order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn row_of(&self, entity: Entity) -> Option<usize> {
        let row = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[row] == entity).then_some(row)
    }

    /// Check if `entity` has a value in this store.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.row_of(entity).is_some()
    }

    /// Get the value for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.row_of(entity).map(|row| &self.dense[row])
    }

    /// Get the value for `entity` mutably.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.row_of(entity).map(|row| &mut self.dense[row])
    }

    /// Insert or overwrite the value for `entity`.
    ///
    /// Returns the previous value if there was one.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(row) = self.row_of(entity) {
            return Some(std::mem::replace(&mut self.dense[row], value));
        }

        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }

        // A row left behind by an older generation of this slot would be
        // orphaned by the overwrite below.
        if let Some(stale) = self.sparse[slot] {
            let stale_owner = self.entities[stale as usize];
            debug_assert_eq!(
                stale_owner.generation(),
                entity.generation(),
                "stale component row left behind by {stale_owner:?}"
            );
            tracing::warn!(%stale_owner, %entity, "dropping stale component row");
            self.remove(stale_owner);
        }

        self.sparse[slot] = Some(self.dense.len() as Row);
        self.dense.push(value);
        self.entities.push(entity);
        None
    }

    /// Remove the value for `entity`, returning it.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.row_of(entity)?;

        self.sparse[entity.index() as usize] = None;
        let value = self.dense.swap_remove(row);
        self.entities.swap_remove(row);

        // Patch the row that was moved into the hole
        if let Some(&moved) = self.entities.get(row) {
            self.sparse[moved.index() as usize] = Some(row as Row);
        }

        Some(value)
    }

    /// Iterate over `(entity, &value)` in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(&self.dense)
    }

    /// Iterate over `(entity, &mut value)` in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(&mut self.dense)
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.sparse.clear();
    }
}

/// Type-erased view of a [`ComponentStore`].
///
/// The world keeps one boxed store per registered component type and uses
/// this trait for operations that do not need to know `T`, such as
/// cascading removal when an entity is destroyed.
pub trait ErasedStore: Send + Sync {
    /// Remove the component of `entity`, dropping it.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Check if `entity` has a component in this store.
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Owners of the stored components.
    fn entities(&self) -> &[Entity];

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Generation;

    fn entity(index: u32) -> Entity {
        Entity::new(index, Generation::new())
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = ComponentStore::new();
        store.insert(entity(3), "three");
        store.insert(entity(0), "zero");

        assert_eq!(store.get(entity(3)), Some(&"three"));
        assert_eq!(store.get(entity(0)), Some(&"zero"));
        assert_eq!(store.get(entity(1)), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut store = ComponentStore::new();
        assert_eq!(store.insert(entity(0), vec![1, 2, 3]), None);
        assert_eq!(store.insert(entity(0), vec![9]), Some(vec![1, 2, 3]));
        assert_eq!(store.get(entity(0)), Some(&vec![9]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_patches_moved_row() {
        let mut store = ComponentStore::new();
        for i in 0..4 {
            store.insert(entity(i), i * 10);
        }

        assert_eq!(store.remove(entity(1)), Some(10));
        assert_eq!(store.remove(entity(1)), None);

        // Entity 3 was swapped into row 1
        assert_eq!(store.get(entity(3)), Some(&30));
        assert_eq!(store.get(entity(0)), Some(&0));
        assert_eq!(store.get(entity(2)), Some(&20));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_generation_mismatch_is_absent() {
        let mut store = ComponentStore::new();
        let old = Entity::new(0, Generation::new());
        store.insert(old, 1u8);

        let newer = Entity::new(0, Generation::new().next().unwrap());
        assert!(store.get(newer).is_none());
        assert!(store.contains(old));
    }

    #[test]
    fn test_iter_mut_updates_in_place() {
        let mut store = ComponentStore::new();
        store.insert(entity(0), 1);
        store.insert(entity(1), 2);

        for (_, value) in store.iter_mut() {
            *value *= 10;
        }

        let mut values: Vec<i32> = store.iter().map(|(_, v)| *v).collect();
        values.sort_unstable();
        assert_eq!(values, vec![10, 20]);
    }

    #[test]
    fn test_erased_downcast() {
        let mut boxed: Box<dyn ErasedStore> = Box::new(ComponentStore::<u32>::new());
        boxed
            .as_any_mut()
            .downcast_mut::<ComponentStore<u32>>()
            .unwrap()
            .insert(entity(5), 7);

        assert!(boxed.contains_entity(entity(5)));
        assert!(boxed.remove_entity(entity(5)));
        assert_eq!(boxed.len(), 0);
    }
}
