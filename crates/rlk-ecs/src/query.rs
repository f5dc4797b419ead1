//! Queries over entities holding a set of component types.
//!
//! A query is a tuple of component types. It matches exactly the entities
//! that hold *every* listed type.
//!
//! # Read-only iteration
//!
//! ```ignore
//! for (entity, (pos, render)) in world.query::<(Position, Renderable)>() {
//!     console.set_char(pos.x, pos.y, render.glyph());
//! }
//! ```
//!
//! The iterator is lazy and can be restarted by calling `query` again. It is
//! driven by the smallest of the listed stores.
//!
//! # Mutable iteration
//!
//! ```ignore
//! world.each_mut::<(Position, Velocity)>(|_, (pos, vel)| {
//!     pos.x += vel.dx;
//!     pos.y += vel.dy;
//! });
//! ```
//!
//! `each_mut` hands out `&mut` to every listed component and is driven by the
//! first listed type, so put the rarest type first. Both forms borrow the
//! world for the whole iteration, which rules out adding or removing
//! components mid-iteration. Listing the same type twice in `each_mut` is a
//! contract violation: it panics in debug builds and visits nothing in
//! release builds.
//!
//! Tuples of one to six component types are supported.

use std::any::TypeId;

use crate::{
    World,
    component::Component,
    entity::Entity,
    storage::{ComponentStore, ErasedStore},
};

/// A set of component types that can be iterated immutably.
pub trait Query {
    /// Borrowed components for one matching entity.
    type Item<'w>;

    /// Iterate over every entity that holds all component types of the set.
    fn iter(world: &World) -> impl Iterator<Item = (Entity, Self::Item<'_>)> + '_;
}

/// A set of component types that can be iterated mutably.
pub trait QueryMut {
    /// Mutably borrowed components for one matching entity.
    type ItemMut<'w>;

    /// Call `f` for every entity that holds all component types of the set.
    fn for_each(world: &mut World, f: impl FnMut(Entity, Self::ItemMut<'_>));
}

impl World {
    /// Lazily iterate over entities holding every component type in `Q`.
    pub fn query<Q: Query>(&self) -> impl Iterator<Item = (Entity, Q::Item<'_>)> + '_ {
        Q::iter(self)
    }

    /// Call `f` with mutable access to every component type in `Q`, for each
    /// entity holding all of them.
    pub fn each_mut<Q: QueryMut>(&mut self, f: impl FnMut(Entity, Q::ItemMut<'_>)) {
        Q::for_each(self, f);
    }
}

fn all_distinct(types: &[TypeId]) -> bool {
    types
        .iter()
        .enumerate()
        .all(|(i, a)| types[i + 1..].iter().all(|b| a != b))
}

fn downcast<T: Component>(
    slot: &mut Option<Box<dyn ErasedStore>>,
) -> Option<&mut ComponentStore<T>> {
    slot.as_mut()?.as_any_mut().downcast_mut()
}

macro_rules! impl_query {
    ($($T:ident $s:ident),+) => {
        impl<$($T: Component),+> Query for ($($T,)+) {
            type Item<'w> = ($(&'w $T,)+);

            fn iter(world: &World) -> impl Iterator<Item = (Entity, Self::Item<'_>)> + '_ {
                fn stores<$($T: Component),+>(
                    world: &World,
                ) -> Option<($(&ComponentStore<$T>,)+)> {
                    Some(($(world.store::<$T>()?,)+))
                }

                stores::<$($T),+>(world).into_iter().flat_map(|($($s,)+)| {
                    let driver = [$($s.entities()),+]
                        .into_iter()
                        .min_by_key(|entities| entities.len())
                        .unwrap_or_default();

                    driver
                        .iter()
                        .filter_map(move |&entity| Some((entity, ($($s.get(entity)?,)+))))
                })
            }
        }
    };
}

macro_rules! impl_query_mut {
    ($H:ident $h:ident $(, $T:ident $t:ident)*) => {
        impl<$H: Component $(, $T: Component)*> QueryMut for ($H, $($T,)*) {
            type ItemMut<'w> = (&'w mut $H, $(&'w mut $T,)*);

            fn for_each(world: &mut World, mut f: impl FnMut(Entity, Self::ItemMut<'_>)) {
                debug_assert!(
                    all_distinct(&[TypeId::of::<$H>() $(, TypeId::of::<$T>())*]),
                    "each_mut lists a component type more than once"
                );

                let [Some($h) $(, Some($t))*] =
                    [world.component_id::<$H>() $(, world.component_id::<$T>())*]
                else {
                    return;
                };
                let Ok([$h $(, $t)*]) = world.stores.get_disjoint_mut([$h.index() $(, $t.index())*])
                else {
                    tracing::warn!("each_mut skipped: component stores overlap");
                    return;
                };
                let (Some($h), $(Some($t),)*) = (downcast::<$H>($h), $(downcast::<$T>($t),)*)
                else {
                    return;
                };

                for (entity, $h) in $h.iter_mut() {
                    $(
                        let Some($t) = $t.get_mut(entity) else {
                            continue;
                        };
                    )*
                    f(entity, ($h, $($t,)*));
                }
            }
        }
    };
}

impl_query!(A a);
impl_query!(A a, B b);
impl_query!(A a, B b, C c);
impl_query!(A a, B b, C c, D d);
impl_query!(A a, B b, C c, D d, E e);
impl_query!(A a, B b, C c, D d, E e, F f);

impl_query_mut!(A a);
impl_query_mut!(A a, B b);
impl_query_mut!(A a, B b, C c);
impl_query_mut!(A a, B b, C c, D d);
impl_query_mut!(A a, B b, C c, D d, E e);
impl_query_mut!(A a, B b, C c, D d, E e, G g);
