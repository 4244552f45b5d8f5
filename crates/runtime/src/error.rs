use combat_core::{CombatError, EntityId};
use thiserror::Error;

/// Errors surfaced at the session boundary.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error(transparent)]
    Combat(#[from] CombatError),
}
