//! Frame-driven system scheduling.
//!
//! # Frame Model
//!
//! ```text
//! tick(ctx, elapsed_ms):
//! ┌─────────────────────────────────────────────────────────────┐
//! │  1. Configure systems registered since the last frame       │
//! │  2. Update every system, in registration order              │
//! │  3. Stop at the first error and hand it to the host         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Systems run one after another on the calling thread. A system observes
//! every change made by the systems registered before it in the same frame.
//!
//! The context type `C` is chosen by the host: a bare `World`, or a struct
//! owning the world plus the console and input devices.

mod error;
mod schedule;
mod system;

pub use error::{ScheduleError, SystemError};
pub use schedule::{Scheduler, SystemState};
pub use system::{FnSystem, System};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{FnSystem, ScheduleError, Scheduler, System, SystemError};
}
