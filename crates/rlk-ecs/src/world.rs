//! World - the registry of entities, their component stores, and resources.
//!
//! The world allocates entity identifiers, keeps one [`ComponentStore`] per
//! component type, and tracks for every live entity which component types it
//! holds so that [`World::destroy`] can cascade to exactly those stores.
//!
//! Lookups never fail loudly: a missing entity or component is `None`, or
//! [`EcsError::NotFound`] where a handle is requested.

use smallvec::SmallVec;

use crate::{
    component::{Component, ComponentId, ComponentRegistry},
    entity::{Entity, EntityAllocator},
    error::{EcsError, EcsResult},
    resource::{Resource, Resources},
    storage::{ComponentStore, ErasedStore},
};

/// Component types held by one entity.
type ComponentList = SmallVec<[ComponentId; 8]>;

/// The ECS world - container for all entities, components, and resources.
#[derive(Default)]
pub struct World {
    /// Entity ID allocator.
    entities: EntityAllocator,
    /// Component types per entity slot. Empty for dead slots.
    entity_components: Vec<ComponentList>,
    /// Component type registry.
    components: ComponentRegistry,
    /// One store per registered component type, indexed by `ComponentId`.
    pub(crate) stores: Vec<Option<Box<dyn ErasedStore>>>,
    /// World-level singletons.
    resources: Resources,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with pre-allocated entity capacity.
    #[must_use]
    pub fn with_capacity(entity_capacity: usize) -> Self {
        Self {
            entities: EntityAllocator::with_capacity(entity_capacity),
            entity_components: Vec::with_capacity(entity_capacity),
            ..Self::default()
        }
    }

    // ==================== Entity Operations ====================

    /// Allocate a fresh entity with no components.
    pub fn create(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let slot = entity.index() as usize;

        if slot >= self.entity_components.len() {
            self.entity_components.resize_with(slot + 1, ComponentList::new);
        }
        debug_assert!(self.entity_components[slot].is_empty());

        tracing::trace!(%entity, "created entity");
        entity
    }

    /// Create an entity and return a handle for attaching components.
    ///
    /// ```ignore
    /// let player = world
    ///     .spawn()
    ///     .insert(Position { x: 50, y: 50 })
    ///     .insert(Renderable::new('@'))
    ///     .id();
    /// ```
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let entity = self.create();
        EntityMut {
            world: self,
            entity,
        }
    }

    /// Destroy an entity, detaching it from every store it participates in.
    ///
    /// Returns `true` if the entity was alive. Destroying an unknown or
    /// already destroyed entity is a no-op.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }

        let held = std::mem::take(&mut self.entity_components[entity.index() as usize]);
        for id in &held {
            if let Some(store) = self.stores.get_mut(id.index()).and_then(Option::as_mut) {
                let removed = store.remove_entity(entity);
                debug_assert!(removed, "component list out of sync for {entity:?}");
            }
        }

        self.entities.deallocate(entity);
        tracing::trace!(%entity, components = held.len(), "destroyed entity");
        true
    }

    /// Check if an entity is alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Get the number of alive entities.
    #[must_use]
    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Iterate over all live entities.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Get a read-only handle to a live entity.
    pub fn entity(&self, entity: Entity) -> EcsResult<EntityRef<'_>> {
        if self.is_alive(entity) {
            Ok(EntityRef {
                world: self,
                entity,
            })
        } else {
            Err(EcsError::NotFound(entity))
        }
    }

    /// Get a mutable handle to a live entity.
    pub fn entity_mut(&mut self, entity: Entity) -> EcsResult<EntityMut<'_>> {
        if self.is_alive(entity) {
            Ok(EntityMut {
                world: self,
                entity,
            })
        } else {
            Err(EcsError::NotFound(entity))
        }
    }

    /// Component types currently held by `entity`.
    #[must_use]
    pub fn component_types(&self, entity: Entity) -> Option<&[ComponentId]> {
        if !self.is_alive(entity) {
            return None;
        }
        Some(&self.entity_components[entity.index() as usize])
    }

    // ==================== Component Operations ====================

    /// Register a component type, creating its store.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let id = self.components.register::<T>();
        if id.index() >= self.stores.len() {
            self.stores.resize_with(id.index() + 1, || None);
        }
        if self.stores[id.index()].is_none() {
            self.stores[id.index()] = Some(Box::new(ComponentStore::<T>::new()));
        }
        id
    }

    /// Get the component ID for a type, if registered.
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.components.get_id::<T>()
    }

    /// The component type registry.
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// The store for component type `T`, if any `T` was ever registered.
    #[must_use]
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let id = self.components.get_id::<T>()?;
        self.stores
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref()
    }

    /// Mutable access to the store for component type `T`.
    #[must_use]
    pub fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let id = self.components.get_id::<T>()?;
        self.stores
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut()
    }

    /// Attach a component to an entity, overwriting any existing `T`.
    ///
    /// Returns the replaced value, or [`EcsError::NotFound`] if the entity
    /// is not alive.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<Option<T>> {
        if !self.is_alive(entity) {
            return Err(EcsError::NotFound(entity));
        }

        let id = self.register::<T>();
        let store = self.store_mut::<T>().ok_or(EcsError::NotFound(entity))?;
        let previous = store.insert(entity, component);

        if previous.is_none() {
            self.entity_components[entity.index() as usize].push(id);
        }
        Ok(previous)
    }

    /// Detach a component from an entity, returning it if it existed.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }

        let id = self.components.get_id::<T>()?;
        let value = self.store_mut::<T>()?.remove(entity)?;

        let held = &mut self.entity_components[entity.index() as usize];
        if let Some(pos) = held.iter().position(|&held_id| held_id == id) {
            held.swap_remove(pos);
        }
        Some(value)
    }

    /// Get a reference to an entity's component.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Get a mutable reference to an entity's component.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Check if an entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_some_and(|store| store.contains(entity))
    }

    /// Number of entities holding a `T`.
    #[must_use]
    pub fn count<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, ComponentStore::len)
    }

    // ==================== Resources ====================

    /// Insert a resource, returning the previous value of that type.
    pub fn insert_resource<T: Resource>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    /// Get a resource.
    #[must_use]
    pub fn resource<T: Resource>(&self) -> Option<&T> {
        self.resources.get()
    }

    /// Get a resource mutably.
    #[must_use]
    pub fn resource_mut<T: Resource>(&mut self) -> Option<&mut T> {
        self.resources.get_mut()
    }

    /// Get a resource or fail with [`EcsError::ResourceNotFound`].
    pub fn resource_or_err<T: Resource>(&self) -> EcsResult<&T> {
        self.resources
            .get()
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<T>()))
    }

    /// Get a resource, inserting one built by `f` if missing.
    pub fn resource_or_insert_with<T: Resource>(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.resources.get_or_insert_with(f)
    }

    /// Remove a resource.
    pub fn remove_resource<T: Resource>(&mut self) -> Option<T> {
        self.resources.remove()
    }

    /// Check if a resource exists.
    #[must_use]
    pub fn has_resource<T: Resource>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Temporarily take resource `T` out of the world so `f` can use it
    /// alongside `&mut World`.
    ///
    /// Returns `None` without calling `f` if the resource is missing. The
    /// resource is put back after `f` returns.
    pub fn resource_scope<T: Resource, R>(
        &mut self,
        f: impl FnOnce(&mut World, &mut T) -> R,
    ) -> Option<R> {
        let mut value = self.resources.remove::<T>()?;
        let result = f(self, &mut value);
        let replaced = self.resources.insert(value);
        debug_assert!(
            replaced.is_none(),
            "resource {} inserted during its own scope",
            std::any::type_name::<T>()
        );
        Some(result)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entity_count", &self.entities.alive_count())
            .field("component_types", &self.components.len())
            .field("resources", &self.resources.len())
            .finish()
    }
}

/// Read-only handle to a live entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    world: &'w World,
    entity: Entity,
}

impl<'w> EntityRef<'w> {
    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Get a component of this entity.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&'w T> {
        self.world.get(self.entity)
    }

    /// Get a component or fail with [`EcsError::ComponentMissing`].
    pub fn try_get<T: Component>(&self) -> EcsResult<&'w T> {
        self.get().ok_or(EcsError::ComponentMissing {
            entity: self.entity,
            component: std::any::type_name::<T>(),
        })
    }

    /// Check if this entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.world.has::<T>(self.entity)
    }
}

/// Mutable handle to a live entity.
///
/// The handle borrows the world, so the entity cannot be destroyed while the
/// handle exists.
pub struct EntityMut<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl EntityMut<'_> {
    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach a component, builder style.
    #[must_use = "call .id() to keep the entity identifier"]
    pub fn insert<T: Component>(self, component: T) -> Self {
        let inserted = self.world.insert(self.entity, component);
        debug_assert!(inserted.is_ok(), "handle entity {} is alive", self.entity);
        self
    }

    /// Attach a component, returning the value it replaced.
    pub fn replace<T: Component>(&mut self, component: T) -> Option<T> {
        self.world.insert(self.entity, component).ok().flatten()
    }

    /// Detach a component.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.world.remove(self.entity)
    }

    /// Get a component of this entity.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get(self.entity)
    }

    /// Get a component of this entity mutably.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_mut(self.entity)
    }

    /// Check if this entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.world.has::<T>(self.entity)
    }
}
