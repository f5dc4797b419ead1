//! Resources - world-level values that exist once per world.
//!
//! Unlike components, resources are not attached to any entity and never
//! show up in queries. They hold host-owned state that systems share, such
//! as the tile map, the visibility grids, or the camera clip bounds.

use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;

/// Marker trait for resource types.
pub trait Resource: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Resource for T {}

/// Type-keyed storage for resources.
#[derive(Default)]
pub struct Resources {
    values: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    /// Create empty resource storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, replacing any existing value of the same type.
    pub fn insert<T: Resource>(&mut self, value: T) -> Option<T> {
        let old = self.values.insert(TypeId::of::<T>(), Box::new(value));
        old.and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Get a reference to a resource.
    #[must_use]
    pub fn get<T: Resource>(&self) -> Option<&T> {
        self.values.get(&TypeId::of::<T>())?.downcast_ref()
    }

    /// Get a mutable reference to a resource.
    #[must_use]
    pub fn get_mut<T: Resource>(&mut self) -> Option<&mut T> {
        self.values.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    /// Get a resource, inserting a value from a closure if it doesn't exist.
    ///
    /// # Panics
    ///
    /// Never in practice: values are keyed by their own `TypeId`.
    pub fn get_or_insert_with<T: Resource, F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.values
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(f()))
            .downcast_mut()
            .expect("resource stored under its own TypeId")
    }

    /// Remove a resource, returning it if it existed.
    pub fn remove<T: Resource>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Check if a resource exists.
    #[must_use]
    pub fn contains<T: Resource>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Get the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("count", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Clip {
        left: i32,
        top: i32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct FrameTime {
        frame: u64,
    }

    #[test]
    fn test_resource_insert_get() {
        let mut resources = Resources::new();
        resources.insert(Clip { left: -3, top: 7 });

        let clip = resources.get::<Clip>().unwrap();
        assert_eq!(clip.left, -3);
        assert_eq!(clip.top, 7);
        assert!(resources.get::<FrameTime>().is_none());
    }

    #[test]
    fn test_resource_replace_returns_old() {
        let mut resources = Resources::new();
        resources.insert(Clip { left: 1, top: 1 });

        let old = resources.insert(Clip { left: 2, top: 2 });
        assert_eq!(old, Some(Clip { left: 1, top: 1 }));
        assert_eq!(resources.get::<Clip>(), Some(&Clip { left: 2, top: 2 }));
    }

    #[test]
    fn test_resource_get_or_insert_with() {
        let mut resources = Resources::new();

        resources.get_or_insert_with(FrameTime::default).frame = 50;
        let time = resources.get_or_insert_with(|| FrameTime { frame: 999 });
        assert_eq!(time.frame, 50);
    }

    #[test]
    fn test_resource_remove() {
        let mut resources = Resources::new();
        resources.insert(FrameTime { frame: 3 });

        assert_eq!(resources.remove::<FrameTime>(), Some(FrameTime { frame: 3 }));
        assert!(!resources.contains::<FrameTime>());
        assert!(resources.is_empty());
    }
}
