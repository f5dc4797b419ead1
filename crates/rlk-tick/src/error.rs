//! Scheduling errors.

use thiserror::Error;

/// Error returned by a system's `configure` or `update`.
///
/// Boxed so a system can bubble up any error type with `?`.
pub type SystemError = Box<dyn std::error::Error + Send + Sync>;

/// A system failed; the rest of the frame was skipped.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// One-time setup failed, now or on an earlier call. The system is
    /// marked failed and its `configure` is not run again.
    #[error("system `{system}` failed to configure")]
    Configure {
        system: String,
        #[source]
        source: SystemError,
    },

    /// Per-frame update failed.
    #[error("system `{system}` failed to update")]
    Update {
        system: String,
        #[source]
        source: SystemError,
    },
}

impl ScheduleError {
    /// Name of the system that failed.
    #[must_use]
    pub fn system(&self) -> &str {
        match self {
            Self::Configure { system, .. } | Self::Update { system, .. } => system,
        }
    }
}
