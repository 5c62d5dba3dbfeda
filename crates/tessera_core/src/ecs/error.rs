use crate::ecs::EntityId;
use thiserror::Error;

/// Errors raised by fallible ECS operations.
///
/// The panicking APIs (`add`, `get`) format these same variants into their
/// panic message, so a failed precondition reads identically either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity {entity} already has component `{component}`")]
    ComponentAlreadyPresent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("entity {entity} does not have component `{component}`")]
    ComponentMissing {
        entity: EntityId,
        component: &'static str,
    },

    #[error("entity {entity} was never created")]
    UnknownEntity { entity: EntityId },
}
