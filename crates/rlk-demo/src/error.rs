//! Errors raised by the demo systems.

use rlk_ecs::EcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    /// No entity has both `Player` and `Position`.
    #[error("no player entity in the world")]
    NoPlayer,

    #[error(transparent)]
    Ecs(#[from] EcsError),
}
