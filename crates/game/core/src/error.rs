use thiserror::Error;

use crate::env::ItemHandle;

/// Fatal-class conditions surfaced by core operations.
///
/// Invalid gameplay inputs (firing an empty mag, reloading twice, healing at
/// full health) are defined no-ops and never produce an error; only broken
/// wiring between the core and its host does.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    /// An inventory holds an item the catalog has no definition for.
    #[error("no catalog entry for item {0:?}")]
    UnknownItem(ItemHandle),
}
