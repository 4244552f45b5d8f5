pub mod config;
pub mod enemy;
pub mod env;
pub mod error;
pub mod inventory;
pub mod state;
pub mod weapon;

pub use config::CombatConfig;
pub use enemy::{AttackEvent, EnemyBehavior, EnemyDamageReport, EnemyProfile, EnemyState};
pub use env::{
    AnimationCue, CatalogOracle, CombatEnv, Env, HealingSpec, ItemDefinition, ItemHandle,
    ItemInstance, ItemKind, Navigator, PcgRoll, Presentation, ProximityOracle, RayHit, RayOracle,
    RollOracle, Services, SlotKind, TimerEvent, TimerId, TimerScheduler, WeaponSpec, mix_seed,
};
pub use error::CombatError;
pub use inventory::{EquipSlot, Inventory};
pub use state::{AssetId, Combatant, EntityId, Seconds, WorldPos};
pub use weapon::{TriggerOutcome, TriggerState, WeaponController};
