mod common;
mod health;

pub use common::{AssetId, EntityId, Seconds, WorldPos};
pub use health::Combatant;
