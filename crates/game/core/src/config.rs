use crate::state::Seconds;

/// Tunable combat constants shared by the player and enemy controllers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Ceiling on the shared reserve ammo pool.
    pub reserve_ammo_cap: u32,
    /// Delay between entering and completing a reload.
    pub reload_delay: Seconds,
    /// Period of the repeating temporary-health decay callback.
    pub temp_health_decay_period: Seconds,
    /// Reserve ammo a freshly spawned player starts with.
    pub default_reserve_ammo: u32,
}

impl CombatConfig {
    pub const RESERVE_AMMO_CAP: u32 = 990;
    pub const RELOAD_DELAY: Seconds = 1.0;
    pub const TEMP_HEALTH_DECAY_PERIOD: Seconds = 3.0;
    pub const DEFAULT_RESERVE_AMMO: u32 = 120;

    /// Maximum growl variations an enemy can carry.
    pub const MAX_GROWL_SOUNDS: usize = 8;
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            reserve_ammo_cap: Self::RESERVE_AMMO_CAP,
            reload_delay: Self::RELOAD_DELAY,
            temp_health_decay_period: Self::TEMP_HEALTH_DECAY_PERIOD,
            default_reserve_ammo: Self::DEFAULT_RESERVE_AMMO,
        }
    }
}
