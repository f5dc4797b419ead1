//! ECS error types.

use thiserror::Error;

use crate::Entity;

/// ECS error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// Entity was never created or has been destroyed.
    #[error("entity not found: {0}")]
    NotFound(Entity),

    /// Entity is alive but lacks the requested component.
    #[error("entity {entity} has no {component} component")]
    ComponentMissing {
        entity: Entity,
        component: &'static str,
    },

    /// No resource of the requested type was inserted.
    #[error("resource not found: {0}")]
    ResourceNotFound(&'static str),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
