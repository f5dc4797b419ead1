//! Entity identifiers with generational indices.
//!
//! A slot index is recycled after its entity is destroyed, but always with a
//! bumped generation, so the packed `(index, generation)` value handed out by
//! [`EntityAllocator::allocate`] is never handed out again. Slots whose
//! generation would wrap are retired instead of recycled.

use std::fmt;

/// Generation counter to detect stale entity references.
/// Incremented each time an entity slot is recycled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u32);

impl Generation {
    /// Create a new generation (starts at 0).
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// The following generation, or `None` once the counter is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Get the raw generation value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Raw slot index into the entity storage.
pub type EntityIndex = u32;

/// A unique identifier for an entity in the world.
///
/// An entity is a slot `index` plus the `generation` that slot had when the
/// entity was created. It carries no data of its own; it is only a key into
/// component stores.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: EntityIndex,
    generation: Generation,
}

impl Entity {
    /// Create an entity from raw parts.
    #[must_use]
    pub const fn new(index: EntityIndex, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Get the entity's slot index.
    #[must_use]
    pub const fn index(self) -> EntityIndex {
        self.index
    }

    /// Get the entity's generation.
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Pack entity into a single u64.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation.0 as u64) << 32) | (self.index as u64)
    }

    /// Unpack entity from a u64.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: Generation((bits >> 32) as u32),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation.0)
    }
}

/// Allocator for entity IDs with generation tracking.
///
/// Maintains a free list of recycled slots and the current generation of
/// each slot. A slot is alive when `alive[index]` is set.
#[derive(Default)]
pub struct EntityAllocator {
    /// Generation for each entity slot.
    generations: Vec<Generation>,
    /// Liveness for each entity slot.
    alive: Vec<bool>,
    /// Free list of recyclable slots.
    free_list: Vec<EntityIndex>,
    /// Number of currently alive entities.
    alive_count: u32,
    /// Slots removed from circulation because their generation is exhausted.
    retired: u32,
}

impl EntityAllocator {
    /// Create a new entity allocator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            alive_count: 0,
            retired: 0,
        }
    }

    /// Create an allocator with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity / 4),
            alive_count: 0,
            retired: 0,
        }
    }

    /// Allocate a new entity.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots have been allocated.
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            Entity::new(index, self.generations[slot])
        } else {
            let index = EntityIndex::try_from(self.generations.len())
                .unwrap_or_else(|_| panic!("entity index space exhausted"));
            let generation = Generation::new();
            self.generations.push(generation);
            self.alive.push(true);
            Entity::new(index, generation)
        }
    }

    /// Deallocate an entity, making its slot available for reuse.
    ///
    /// Returns `true` if the entity was alive and is now deallocated.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = entity.index() as usize;
        self.alive[slot] = false;
        self.alive_count -= 1;

        // Bump the generation to invalidate outstanding copies of `entity`
        match self.generations[slot].next() {
            Some(next) => {
                self.generations[slot] = next;
                self.free_list.push(entity.index());
            }
            None => {
                tracing::debug!(slot, "retiring entity slot with exhausted generation");
                self.retired += 1;
            }
        }
        true
    }

    /// Check if an entity is currently alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        slot < self.generations.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Get the number of currently alive entities.
    #[must_use]
    pub const fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Get the total number of slots ever allocated (including recycled ones).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Number of slots retired because their generation counter ran out.
    #[must_use]
    pub const fn retired(&self) -> u32 {
        self.retired
    }

    /// Iterate over every live entity, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.generations
            .iter()
            .zip(&self.alive)
            .enumerate()
            .filter(|(_, (_, alive))| **alive)
            .map(|(slot, (generation, _))| Entity::new(slot as EntityIndex, *generation))
    }
}
