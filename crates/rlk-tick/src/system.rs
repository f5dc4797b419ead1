//! The system capability trait.

use crate::SystemError;

/// A unit of per-frame logic over a host context `C`.
///
/// `configure` runs once before the first `update`. `update` then runs once
/// per frame with the time since the previous frame in milliseconds.
///
/// # Example
///
/// ```ignore
/// struct Gravity;
///
/// impl System<World> for Gravity {
///     fn name(&self) -> &str {
///         "gravity"
///     }
///
///     fn update(&mut self, world: &mut World, _dt_ms: f64) -> Result<(), SystemError> {
///         world.each_mut::<(Position, Falling)>(|_, (pos, _)| pos.y += 1);
///         Ok(())
///     }
/// }
/// ```
pub trait System<C> {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// One-time setup, such as spawning entities or inserting resources.
    fn configure(&mut self, _ctx: &mut C) -> Result<(), SystemError> {
        Ok(())
    }

    /// Per-frame work.
    fn update(&mut self, ctx: &mut C, dt_ms: f64) -> Result<(), SystemError>;
}

/// A system built from a closure, with no configure step.
pub struct FnSystem<F> {
    name: String,
    f: F,
}

impl<F> FnSystem<F> {
    pub fn new<C>(name: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut C, f64) -> Result<(), SystemError>,
    {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<C, F> System<C> for FnSystem<F>
where
    F: FnMut(&mut C, f64) -> Result<(), SystemError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &mut C, dt_ms: f64) -> Result<(), SystemError> {
        (self.f)(ctx, dt_ms)
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish()
    }
}
