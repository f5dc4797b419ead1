//! Component type registration and metadata.
//!
//! Components are plain data types attached to entities. Each component
//! type gets a dense [`ComponentId`] from the world's registry, which is also
//! the index of its store.

use std::{any::TypeId, fmt};

use rustc_hash::FxHashMap;

/// Marker trait for types that can be used as components.
///
/// # Example
///
/// ```ignore
/// struct Position { x: i32, y: i32 }
/// world.spawn().insert(Position { x: 1, y: 2 });
/// ```
pub trait Component: Send + Sync + 'static {}

// Blanket implementation for all suitable types
impl<T: Send + Sync + 'static> Component for T {}

/// Unique identifier for a component type within one world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// The ID as an index into per-type tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// Runtime information about a component type.
#[derive(Clone, Copy)]
pub struct ComponentInfo {
    id: ComponentId,
    name: &'static str,
    size: usize,
    type_id: TypeId,
}

impl ComponentInfo {
    /// Create component info for a concrete type.
    #[must_use]
    pub fn of<T: Component>(id: ComponentId) -> Self {
        Self {
            id,
            name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Get the component ID.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Get the component type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Get the size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Check if this info is for the given type.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

/// Registry for component types.
///
/// Maps Rust types to `ComponentId`s and stores metadata about each type.
/// IDs are handed out densely starting at 0, in registration order.
#[derive(Default)]
pub struct ComponentRegistry {
    type_to_id: FxHashMap<TypeId, ComponentId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type and return its ID.
    ///
    /// If the type is already registered, returns the existing ID.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();

        if let Some(&id) = self.type_to_id.get(&type_id) {
            return id;
        }

        let id = ComponentId(self.infos.len() as u32);
        self.type_to_id.insert(type_id, id);
        self.infos.push(ComponentInfo::of::<T>(id));

        tracing::trace!(?id, name = std::any::type_name::<T>(), "registered component");
        id
    }

    /// Get the component ID for a type, if registered.
    #[must_use]
    pub fn get_id<T: Component>(&self) -> Option<ComponentId> {
        self.type_to_id.get(&TypeId::of::<T>()).copied()
    }

    /// Get component info by ID.
    #[must_use]
    pub fn get_info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.index())
    }

    /// Get the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterate over all registered component infos.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.infos.iter()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.len())
            .field("components", &self.infos)
            .finish()
    }
}
