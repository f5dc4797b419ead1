//! The frame scheduler.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::{ScheduleError, System};

/// Lifecycle state of a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Registered, `configure` not yet run.
    Unconfigured,
    /// `configure` succeeded; `update` runs every frame.
    Configured,
    /// `configure` returned an error. It is never called again.
    Failed,
}

struct Entry<C> {
    system: Box<dyn System<C>>,
    state: SystemState,
    /// Message of the error that moved the system to `Failed`.
    failure: Option<String>,
}

impl<C> Entry<C> {
    fn configure(&mut self, ctx: &mut C) -> Result<(), ScheduleError> {
        match self.state {
            SystemState::Configured => return Ok(()),
            SystemState::Failed => {
                let reason = self.failure.as_deref().unwrap_or("unknown error");
                return Err(ScheduleError::Configure {
                    system: self.system.name().to_owned(),
                    source: format!("configure already failed: {reason}").into(),
                });
            }
            SystemState::Unconfigured => {}
        }

        debug!(system = self.system.name(), "configuring system");
        if let Err(source) = self.system.configure(ctx) {
            warn!(system = self.system.name(), error = %source, "system failed to configure");
            self.state = SystemState::Failed;
            self.failure = Some(source.to_string());
            return Err(ScheduleError::Configure {
                system: self.system.name().to_owned(),
                source,
            });
        }
        self.state = SystemState::Configured;
        Ok(())
    }
}

/// Runs systems in registration order, one frame at a time.
///
/// # Example
///
/// ```ignore
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(PlayerSystem::default());
/// scheduler.add_system(CameraSystem::default());
///
/// scheduler.configure(&mut game)?;
/// loop {
///     scheduler.tick(&mut game, frame_ms)?;
/// }
/// ```
pub struct Scheduler<C> {
    systems: Vec<Entry<C>>,
    frame: u64,
    elapsed_total_ms: f64,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            systems: Vec::new(),
            frame: 0,
            elapsed_total_ms: 0.0,
        }
    }
}

impl<C> Scheduler<C> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system. It runs after every system registered before it.
    pub fn add_system(&mut self, system: impl System<C> + 'static) -> &mut Self {
        trace!(system = system.name(), "registered system");
        self.systems.push(Entry {
            system: Box::new(system),
            state: SystemState::Unconfigured,
            failure: None,
        });
        self
    }

    /// Builder form of [`Self::add_system`].
    #[must_use]
    pub fn with_system(mut self, system: impl System<C> + 'static) -> Self {
        self.add_system(system);
        self
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|entry| entry.system.name())
    }

    /// Lifecycle state of the first system called `name`.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<SystemState> {
        self.systems
            .iter()
            .find(|entry| entry.system.name() == name)
            .map(|entry| entry.state)
    }

    /// Number of frames started so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Sum of the elapsed time passed to every frame.
    #[must_use]
    pub const fn elapsed_total_ms(&self) -> f64 {
        self.elapsed_total_ms
    }

    /// Configure every unconfigured system, in registration order.
    ///
    /// Already configured systems are skipped, so calling this again is
    /// harmless. Stops at the first failure. A system whose `configure`
    /// failed is marked [`SystemState::Failed`] and reported again on every
    /// later call without being re-run; the host decides whether to stop.
    pub fn configure(&mut self, ctx: &mut C) -> Result<(), ScheduleError> {
        for entry in &mut self.systems {
            entry.configure(ctx)?;
        }
        Ok(())
    }

    /// Run one frame.
    ///
    /// Systems registered since the last frame are configured first. Every
    /// system is then updated in order with `elapsed_ms`. The first error
    /// ends the frame; later systems do not run. While any system is
    /// [`SystemState::Failed`] no frame starts.
    ///
    /// # Panics
    ///
    /// In debug builds, if `elapsed_ms` is negative or not finite. Release
    /// builds treat such a value as 0.
    pub fn tick(&mut self, ctx: &mut C, elapsed_ms: f64) -> Result<(), ScheduleError> {
        let valid = elapsed_ms.is_finite() && elapsed_ms >= 0.0;
        debug_assert!(valid, "frame time must be finite and non-negative, got {elapsed_ms}");
        let dt_ms = if valid {
            elapsed_ms
        } else {
            warn!(elapsed_ms, "invalid frame time clamped to 0");
            0.0
        };

        self.configure(ctx)?;

        self.frame += 1;
        self.elapsed_total_ms += dt_ms;
        debug!(frame = self.frame, dt_ms, systems = self.systems.len(), "running frame");

        for entry in &mut self.systems {
            entry
                .system
                .update(ctx, dt_ms)
                .map_err(|source| ScheduleError::Update {
                    system: entry.system.name().to_owned(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.names().collect::<Vec<_>>())
            .field("frame", &self.frame)
            .field("elapsed_total_ms", &self.elapsed_total_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use rlk_ecs::World;

    use super::*;
    use crate::{FnSystem, SystemError};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }

    /// Records every lifecycle call into a shared log.
    struct Probe {
        name: &'static str,
        log: Rc<std::cell::RefCell<Vec<String>>>,
        fail_configure: u32,
        fail_update: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<std::cell::RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                fail_configure: 0,
                fail_update: false,
            }
        }
    }

    impl System<World> for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn configure(&mut self, _world: &mut World) -> Result<(), SystemError> {
            self.log.borrow_mut().push(format!("{}:configure", self.name));
            if self.fail_configure > 0 {
                self.fail_configure -= 1;
                return Err("no map loaded".into());
            }
            Ok(())
        }

        fn update(&mut self, _world: &mut World, _dt_ms: f64) -> Result<(), SystemError> {
            self.log.borrow_mut().push(format!("{}:update", self.name));
            if self.fail_update {
                return Err("update failed".into());
            }
            Ok(())
        }
    }

    fn shared_log() -> Rc<std::cell::RefCell<Vec<String>>> {
        Rc::default()
    }

    #[test]
    fn test_later_system_sees_earlier_write() {
        let mut world = World::new();
        let player = world.spawn().insert(Position { x: 0, y: 0 }).id();
        let seen = Rc::new(Cell::new(0));
        let seen_by_b = Rc::clone(&seen);

        let mut scheduler = Scheduler::new();
        scheduler
            .add_system(FnSystem::new("a", move |world: &mut World, _dt: f64| {
                if let Some(pos) = world.get_mut::<Position>(player) {
                    pos.x = 5;
                }
                Ok(())
            }))
            .add_system(FnSystem::new("b", move |world: &mut World, _dt: f64| {
                if let Some(pos) = world.get::<Position>(player) {
                    seen_by_b.set(pos.x);
                }
                Ok(())
            }));

        scheduler.tick(&mut world, 16.0).unwrap();
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn test_configure_runs_once_before_updates() {
        let log = shared_log();
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_system(Probe::new("a", &log))
            .add_system(Probe::new("b", &log));

        scheduler.configure(&mut world).unwrap();
        scheduler.configure(&mut world).unwrap();
        scheduler.tick(&mut world, 10.0).unwrap();
        scheduler.tick(&mut world, 10.0).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a:configure",
                "b:configure",
                "a:update",
                "b:update",
                "a:update",
                "b:update",
            ]
        );
        assert_eq!(scheduler.state("a"), Some(SystemState::Configured));
    }

    #[test]
    fn test_tick_configures_lazily() {
        let log = shared_log();
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Probe::new("a", &log));

        scheduler.tick(&mut world, 1.0).unwrap();
        scheduler.add_system(Probe::new("late", &log));
        assert_eq!(scheduler.state("late"), Some(SystemState::Unconfigured));
        scheduler.tick(&mut world, 1.0).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a:configure",
                "a:update",
                "late:configure",
                "a:update",
                "late:update",
            ]
        );
    }

    #[test]
    fn test_update_error_names_system_and_stops_frame() {
        let log = shared_log();
        let mut world = World::new();
        let mut failing = Probe::new("broken", &log);
        failing.fail_update = true;

        let mut scheduler = Scheduler::new();
        scheduler
            .add_system(Probe::new("first", &log))
            .add_system(failing)
            .add_system(Probe::new("never", &log));
        scheduler.configure(&mut world).unwrap();
        log.borrow_mut().clear();

        let err = scheduler.tick(&mut world, 1.0).unwrap_err();

        assert!(matches!(err, ScheduleError::Update { .. }));
        assert_eq!(err.system(), "broken");
        assert_eq!(err.to_string(), "system `broken` failed to update");
        assert_eq!(*log.borrow(), vec!["first:update", "broken:update"]);
    }

    #[test]
    fn test_failed_configure_runs_once() {
        let log = shared_log();
        let mut world = World::new();
        let mut flaky = Probe::new("flaky", &log);
        flaky.fail_configure = 1;

        let mut scheduler = Scheduler::new()
            .with_system(Probe::new("first", &log))
            .with_system(flaky);

        let err = scheduler.tick(&mut world, 1.0).unwrap_err();
        assert!(matches!(err, ScheduleError::Configure { .. }));
        assert_eq!(err.system(), "flaky");
        assert_eq!(scheduler.state("first"), Some(SystemState::Configured));
        assert_eq!(scheduler.state("flaky"), Some(SystemState::Failed));

        // Would succeed if re-run, but the scheduler never calls it again
        let err = scheduler.tick(&mut world, 1.0).unwrap_err();
        assert_eq!(err.system(), "flaky");
        let err = scheduler.configure(&mut world).unwrap_err();
        assert!(matches!(err, ScheduleError::Configure { .. }));
        assert!(
            std::error::Error::source(&err)
                .unwrap()
                .to_string()
                .contains("no map loaded")
        );

        assert_eq!(scheduler.frame(), 0);
        assert_eq!(scheduler.state("flaky"), Some(SystemState::Failed));
        assert_eq!(*log.borrow(), vec!["first:configure", "flaky:configure"]);
    }

    #[test]
    fn test_frame_counters() {
        let mut world = World::new();
        let mut scheduler: Scheduler<World> = Scheduler::new();

        scheduler.tick(&mut world, 16.0).unwrap();
        scheduler.tick(&mut world, 17.5).unwrap();

        assert_eq!(scheduler.frame(), 2);
        assert!((scheduler.elapsed_total_ms() - 33.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dt_is_passed_through() {
        let mut world = World::new();
        let total = Rc::new(Cell::new(0.0));
        let total_in_system = Rc::clone(&total);

        let mut scheduler = Scheduler::new().with_system(FnSystem::new(
            "clock",
            move |_: &mut World, dt: f64| {
                total_in_system.set(total_in_system.get() + dt);
                Ok(())
            },
        ));

        scheduler.tick(&mut world, 8.0).unwrap();
        scheduler.tick(&mut world, 4.0).unwrap();
        assert!((total.get() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-negative")]
    fn test_negative_dt_panics_in_debug() {
        let mut world = World::new();
        let mut scheduler: Scheduler<World> = Scheduler::new();
        let _ = scheduler.tick(&mut world, -1.0);
    }

    #[test]
    fn test_names_in_run_order() {
        let log = shared_log();
        let scheduler: Scheduler<World> = Scheduler::new()
            .with_system(Probe::new("player", &log))
            .with_system(Probe::new("camera", &log));

        assert_eq!(scheduler.names().collect::<Vec<_>>(), vec!["player", "camera"]);
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.state("missing"), None);
    }
}
