//! Trigger and reload state machine for the equipped item.
//!
//! Firing with no ammo, nothing equipped, or mid-reload is a silent no-op:
//! the player mashing the trigger is normal input, not an error.
//!
//! Delayed callbacks (fire cooldown, reload completion) carry the equip
//! epoch that was current when they were scheduled. The epoch bumps on every
//! equip change, so a callback landing after the weapon was swapped or
//! dropped detects the mismatch and aborts instead of mutating the new
//! weapon's ammo.

use strum::Display;

use crate::config::CombatConfig;
use crate::env::{
    CombatEnv, ItemDefinition, ItemHandle, ItemKind, RayHit, Services, TimerEvent, TimerId,
    TimerScheduler,
};
use crate::error::CombatError;
use crate::inventory::{EquipSlot, Inventory};
use crate::state::{Combatant, EntityId, WorldPos};

/// Trigger state of the equipped weapon.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    /// Automatic weapon held firing; cleared by [`WeaponController::release_trigger`].
    Firing,
    Reloading,
}

/// Observable result of a trigger pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerOutcome {
    /// A shot went out. The caller applies `damage` to the hit entity.
    Fired { hit: Option<RayHit>, damage: u32 },
    /// A healing item was consumed and applied to the bearer.
    Healed { amount: u32, temporary: bool },
}

/// Per-actor firing/reload controller layered over an [`Inventory`].
#[derive(Debug)]
pub struct WeaponController {
    owner: EntityId,
    state: TriggerState,
    /// False while the fire-interval cooldown is pending.
    ready: bool,
    equip_epoch: u64,
    cooldown_timer: Option<TimerId>,
    reload_timer: Option<TimerId>,
}

impl WeaponController {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            state: TriggerState::Idle,
            ready: true,
            equip_epoch: 0,
            cooldown_timer: None,
            reload_timer: None,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn equip_epoch(&self) -> u64 {
        self.equip_epoch
    }

    /// Fires the equipped weapon or consumes the equipped healing item.
    ///
    /// Weapons: gated on trigger state, cooldown, and magazine; a hit is
    /// returned so the caller can damage the struck combatant. Healing items
    /// are applied to the bearer, then their slot is cleared.
    pub fn pull_trigger(
        &mut self,
        inventory: &mut Inventory,
        bearer: &mut Combatant,
        origin: WorldPos,
        aim: WorldPos,
        env: &CombatEnv<'_>,
        services: &mut Services<'_>,
    ) -> Result<Option<TriggerOutcome>, CombatError> {
        if bearer.is_dead() {
            return Ok(None);
        }
        let Some(slot) = inventory.equipped() else {
            return Ok(None);
        };
        let Some(item) = inventory.equipped_item().copied() else {
            return Ok(None);
        };
        let definition = resolve(env, item.handle)?;

        match definition.kind {
            ItemKind::Weapon(spec) => {
                let trigger_open = match self.state {
                    TriggerState::Idle => true,
                    TriggerState::Firing => spec.automatic,
                    TriggerState::Reloading => false,
                };
                if !trigger_open || !self.ready || item.mag_ammo == 0 {
                    return Ok(None);
                }

                let hit = env
                    .rays()
                    .and_then(|rays| rays.cast(origin, aim, spec.range));

                if let Some(weapon) = inventory.equipped_item_mut() {
                    weapon.mag_ammo -= 1;
                }
                services.presentation.play_sound(spec.sound);

                self.ready = false;
                self.cooldown_timer = Some(services.timers.schedule(
                    spec.fire_interval,
                    TimerEvent::FireCooldown {
                        owner: self.owner,
                        epoch: self.equip_epoch,
                    },
                ));
                if spec.automatic {
                    self.state = TriggerState::Firing;
                }

                Ok(Some(TriggerOutcome::Fired {
                    hit,
                    damage: spec.damage,
                }))
            }
            ItemKind::Healing(spec) => {
                bearer.heal(spec.heal_amount, spec.temporary);
                inventory.clear_slot(slot);
                self.on_equip_changed(services.timers);
                Ok(Some(TriggerOutcome::Healed {
                    amount: spec.heal_amount,
                    temporary: spec.temporary,
                }))
            }
        }
    }

    /// Ends sustained fire for automatic weapons.
    pub fn release_trigger(&mut self) {
        if self.state == TriggerState::Firing {
            self.state = TriggerState::Idle;
        }
    }

    /// Enters the reload state and schedules its completion. No-op while
    /// already reloading or with no weapon equipped.
    pub fn start_reload(
        &mut self,
        inventory: &Inventory,
        config: &CombatConfig,
        env: &CombatEnv<'_>,
        services: &mut Services<'_>,
    ) -> Result<(), CombatError> {
        if self.state == TriggerState::Reloading {
            return Ok(());
        }
        let Some(item) = inventory.equipped_item() else {
            return Ok(());
        };
        let definition = resolve(env, item.handle)?;
        if !matches!(definition.kind, ItemKind::Weapon(_)) {
            return Ok(());
        }

        self.state = TriggerState::Reloading;
        self.reload_timer = Some(services.timers.schedule(
            config.reload_delay,
            TimerEvent::ReloadComplete {
                owner: self.owner,
                epoch: self.equip_epoch,
            },
        ));
        Ok(())
    }

    /// Delivers a landed timer callback. Stale epochs are discarded without
    /// touching state.
    pub fn handle_timer(
        &mut self,
        event: TimerEvent,
        inventory: &mut Inventory,
        config: &CombatConfig,
        env: &CombatEnv<'_>,
    ) -> Result<(), CombatError> {
        match event {
            TimerEvent::FireCooldown { epoch, .. } => {
                self.cooldown_timer = None;
                if epoch == self.equip_epoch {
                    self.ready = true;
                }
                Ok(())
            }
            TimerEvent::ReloadComplete { epoch, .. } => {
                self.reload_timer = None;
                if epoch != self.equip_epoch {
                    // Weapon swapped mid-reload; the new weapon keeps its ammo.
                    return Ok(());
                }
                self.state = TriggerState::Idle;
                self.finish_reload(inventory, config, env)
            }
            TimerEvent::TempHealthDecay { .. } => Ok(()),
        }
    }

    /// Invalidates pending callbacks and re-arms the trigger. Called on
    /// every equip change and on the bearer's death.
    pub fn on_equip_changed(&mut self, timers: &mut dyn TimerScheduler) {
        self.equip_epoch += 1;
        if let Some(id) = self.cooldown_timer.take() {
            timers.cancel(id);
        }
        if let Some(id) = self.reload_timer.take() {
            timers.cancel(id);
        }
        self.state = TriggerState::Idle;
        self.ready = true;
    }

    fn finish_reload(
        &mut self,
        inventory: &mut Inventory,
        config: &CombatConfig,
        env: &CombatEnv<'_>,
    ) -> Result<(), CombatError> {
        let Some(slot) = inventory.equipped() else {
            return Ok(());
        };
        let Some(item) = inventory.equipped_item().copied() else {
            return Ok(());
        };
        let definition = resolve(env, item.handle)?;
        let ItemKind::Weapon(spec) = definition.kind else {
            return Ok(());
        };

        match slot {
            EquipSlot::PrimaryWeapon => {
                // Unspent rounds return to reserve, then the magazine draws
                // back up to capacity.
                let reserve = inventory.reserve_ammo + item.mag_ammo;
                let drawn = spec.capacity.min(reserve);
                inventory.reserve_ammo = (reserve - drawn).min(config.reserve_ammo_cap);
                if let Some(weapon) = inventory.equipped_item_mut() {
                    weapon.mag_ammo = drawn;
                }
            }
            EquipSlot::SecondaryWeapon => {
                // Secondaries refill without reserve interaction.
                if let Some(weapon) = inventory.equipped_item_mut() {
                    weapon.mag_ammo = spec.capacity;
                }
            }
            EquipSlot::PrimaryHealing | EquipSlot::SecondaryHealing => {}
        }
        Ok(())
    }
}

fn resolve(env: &CombatEnv<'_>, handle: ItemHandle) -> Result<ItemDefinition, CombatError> {
    env.catalog()
        .and_then(|catalog| catalog.definition(handle))
        .ok_or(CombatError::UnknownItem(handle))
}
