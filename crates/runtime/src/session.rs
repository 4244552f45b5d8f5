//! Single-player combat session: one player, a pack of enemies, and items
//! on the ground, advanced by a fixed-order tick.
//!
//! The session owns every collaborator the core consumes and wires them
//! together per call: read-only oracles go in as an environment, mutable
//! services (navigation, presentation, timers) as a services bundle. Cross
//! entity effects never happen inside the core; controllers return outcomes
//! (a shot hit, an attack landed, a pack was alerted) and the session
//! applies them here, where it can reach every combatant.
//!
//! Tick order: timer callbacks, enemy perception and behavior, landed
//! attacks, movement, then the pickup-in-range scan.

use std::collections::HashMap;

use combat_content::StaticCatalog;
use combat_core::{
    AttackEvent, CatalogOracle, CombatConfig, CombatEnv, Combatant, CombatError, EnemyBehavior,
    EnemyProfile, EnemyState, EntityId, Env, EquipSlot, Inventory, ItemHandle, ItemInstance,
    Navigator, PcgRoll, Seconds, Services, TimerEvent, TimerScheduler, TriggerOutcome,
    TriggerState, WeaponController, WorldPos,
};

use crate::error::RuntimeError;
use crate::scheduler::TimerQueue;
use crate::world::{PresentationLog, SpatialIndex, SteeringNavigator};

/// Lateral tolerance for gunfire ray picks.
const HIT_RADIUS: f32 = 50.0;
/// Enemy walk speed in world units per second.
const ENEMY_SPEED: f32 = 300.0;
/// How far in front of the player a chasing enemy parks. Keeps melee-range
/// enemies ahead of the player's ray origin so they can still be shot.
const ENEMY_STANDOFF: f32 = 60.0;
/// Distance at which a ground item becomes interactable.
const PICKUP_RADIUS: f32 = 150.0;
/// Player health at spawn.
const PLAYER_MAX_HEALTH: u32 = 100;

/// Player input for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerCommand {
    /// Pull the trigger, aiming along `aim` from the player's position.
    Fire { aim: WorldPos },
    /// Release a held trigger, ending automatic fire.
    ReleaseTrigger,
    Reload,
    /// Pick up the item in range, if any.
    Interact,
    Switch(EquipSlot),
    DropItem,
}

/// What happened, reported per tick for the host to present.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    ShotFired,
    ShotHit { target: EntityId, damage: u32 },
    Healed { amount: u32, temporary: bool },
    EnemyKilled { enemy: EntityId },
    PlayerDamaged { amount: u32 },
    PlayerDied,
    PickedUp { handle: ItemHandle },
    Dropped { handle: ItemHandle },
    Alerted { enemy: EntityId },
}

struct Enemy {
    behavior: EnemyBehavior,
    combatant: Combatant,
}

struct Pickup {
    item: ItemInstance,
    position: WorldPos,
}

/// Top-level game state and orchestrator.
pub struct Session {
    config: CombatConfig,
    catalog: StaticCatalog,
    rolls: PcgRoll,
    spatial: SpatialIndex,
    navigator: SteeringNavigator,
    presentation: PresentationLog,
    timers: TimerQueue,
    player: Combatant,
    inventory: Inventory,
    weapon: WeaponController,
    enemies: HashMap<EntityId, Enemy>,
    pickups: HashMap<EntityId, Pickup>,
    item_in_range: Option<EntityId>,
    next_entity: u32,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: CombatConfig, catalog: StaticCatalog) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(
            config.temp_health_decay_period,
            TimerEvent::TempHealthDecay {
                owner: EntityId::PLAYER,
            },
        );
        let mut spatial = SpatialIndex::new(HIT_RADIUS);
        spatial.insert(EntityId::PLAYER, WorldPos::ORIGIN);

        Self {
            player: Combatant::new(PLAYER_MAX_HEALTH),
            inventory: Inventory::new(config.default_reserve_ammo),
            weapon: WeaponController::new(EntityId::PLAYER),
            config,
            catalog,
            rolls: PcgRoll,
            spatial,
            navigator: SteeringNavigator::new(ENEMY_SPEED, ENEMY_STANDOFF),
            presentation: PresentationLog::default(),
            timers,
            enemies: HashMap::new(),
            pickups: HashMap::new(),
            item_in_range: None,
            next_entity: 1,
            events: Vec::new(),
        }
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.weapon.state()
    }

    pub fn item_in_range(&self) -> Option<EntityId> {
        self.item_in_range
    }

    pub fn enemy_state(&self, enemy: EntityId) -> Option<EnemyState> {
        self.enemies.get(&enemy).map(|e| e.behavior.state())
    }

    pub fn enemy_health(&self, enemy: EntityId) -> Option<u32> {
        self.enemies.get(&enemy).map(|e| e.combatant.current_health())
    }

    pub fn position(&self, entity: EntityId) -> Option<WorldPos> {
        self.spatial.position(entity)
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Presentation sink, for the host to flush after each tick.
    pub fn presentation_mut(&mut self) -> &mut PresentationLog {
        &mut self.presentation
    }

    fn allocate_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    pub fn spawn_enemy(
        &mut self,
        profile: EnemyProfile,
        position: WorldPos,
        max_health: u32,
    ) -> EntityId {
        let id = self.allocate_entity();
        tracing::debug!("spawn enemy {} at {:?}", id, position);
        self.spatial.insert(id, position);
        self.enemies.insert(
            id,
            Enemy {
                behavior: EnemyBehavior::new(id, profile),
                combatant: Combatant::new(max_health),
            },
        );
        id
    }

    pub fn spawn_pickup(&mut self, item: ItemInstance, position: WorldPos) -> EntityId {
        let id = self.allocate_entity();
        tracing::debug!("spawn pickup {} ({:?}) at {:?}", id, item.handle, position);
        self.pickups.insert(id, Pickup { item, position });
        id
    }

    /// Places an item straight into the player's inventory, as a spawn
    /// loadout would.
    pub fn grant_item(&mut self, item: ItemInstance) -> Result<(), RuntimeError> {
        let definition = self
            .catalog
            .definition(item.handle)
            .ok_or(CombatError::UnknownItem(item.handle))?;
        let displaced = self.inventory.pick_up(item, &definition);
        self.weapon.on_equip_changed(&mut self.timers);
        if let Some(displaced) = displaced {
            let position = self
                .spatial
                .position(EntityId::PLAYER)
                .unwrap_or(WorldPos::ORIGIN);
            self.spawn_pickup(displaced, position);
        }
        Ok(())
    }

    /// Teleports the player; movement input is outside this runtime's scope.
    pub fn move_player(&mut self, position: WorldPos) {
        self.spatial.insert(EntityId::PLAYER, position);
    }

    /// Applies one player command immediately.
    pub fn command(&mut self, command: PlayerCommand) -> Result<(), RuntimeError> {
        tracing::debug!("player command {:?}", command);
        match command {
            PlayerCommand::Fire { aim } => self.fire(aim),
            PlayerCommand::ReleaseTrigger => {
                self.weapon.release_trigger();
                Ok(())
            }
            PlayerCommand::Reload => {
                let env: CombatEnv<'_> = Env::new(None, None, Some(&self.catalog), None);
                let mut services = Services {
                    navigator: &mut self.navigator,
                    presentation: &mut self.presentation,
                    timers: &mut self.timers,
                };
                self.weapon
                    .start_reload(&self.inventory, &self.config, &env, &mut services)?;
                Ok(())
            }
            PlayerCommand::Interact => self.interact(),
            PlayerCommand::Switch(slot) => {
                let before = self.inventory.equipped();
                self.inventory.switch_equip(slot);
                if self.inventory.equipped() != before {
                    self.weapon.on_equip_changed(&mut self.timers);
                }
                Ok(())
            }
            PlayerCommand::DropItem => {
                if let Some(item) = self.inventory.drop_equipped() {
                    self.weapon.on_equip_changed(&mut self.timers);
                    let position = self
                        .spatial
                        .position(EntityId::PLAYER)
                        .unwrap_or(WorldPos::ORIGIN);
                    self.spawn_pickup(item, position);
                    self.events.push(SessionEvent::Dropped { handle: item.handle });
                }
                Ok(())
            }
        }
    }

    fn fire(&mut self, aim: WorldPos) -> Result<(), RuntimeError> {
        let origin = self
            .spatial
            .position(EntityId::PLAYER)
            .ok_or(RuntimeError::UnknownEntity(EntityId::PLAYER))?;
        let env: CombatEnv<'_> = Env::new(
            Some(&self.spatial),
            Some(&self.spatial),
            Some(&self.catalog),
            Some(&self.rolls),
        );
        let mut services = Services {
            navigator: &mut self.navigator,
            presentation: &mut self.presentation,
            timers: &mut self.timers,
        };
        let outcome = self.weapon.pull_trigger(
            &mut self.inventory,
            &mut self.player,
            origin,
            aim,
            &env,
            &mut services,
        )?;

        match outcome {
            Some(TriggerOutcome::Fired { hit, damage }) => {
                self.events.push(SessionEvent::ShotFired);
                if let Some(hit) = hit {
                    self.events.push(SessionEvent::ShotHit {
                        target: hit.entity,
                        damage,
                    });
                    self.damage_enemy(hit.entity, damage);
                }
            }
            Some(TriggerOutcome::Healed { amount, temporary }) => {
                self.events.push(SessionEvent::Healed { amount, temporary });
            }
            None => {}
        }
        Ok(())
    }

    fn interact(&mut self) -> Result<(), RuntimeError> {
        let Some(pickup_id) = self.item_in_range else {
            return Ok(());
        };
        let Some(pickup) = self.pickups.get(&pickup_id) else {
            self.item_in_range = None;
            return Ok(());
        };
        let definition = self
            .catalog
            .definition(pickup.item.handle)
            .ok_or(CombatError::UnknownItem(pickup.item.handle))?;

        let Some(pickup) = self.pickups.remove(&pickup_id) else {
            return Ok(());
        };
        self.item_in_range = None;
        self.events.push(SessionEvent::PickedUp {
            handle: pickup.item.handle,
        });

        let displaced = self.inventory.pick_up(pickup.item, &definition);
        self.weapon.on_equip_changed(&mut self.timers);
        if let Some(displaced) = displaced {
            // The displaced occupant drops at the player's feet.
            let position = self
                .spatial
                .position(EntityId::PLAYER)
                .unwrap_or(pickup.position);
            self.spawn_pickup(displaced, position);
            self.events.push(SessionEvent::Dropped {
                handle: displaced.handle,
            });
        }
        Ok(())
    }

    /// Advances the session by `dt` seconds.
    pub fn tick(&mut self, dt: Seconds) -> Result<(), RuntimeError> {
        for event in self.timers.advance(dt) {
            self.dispatch_timer(event)?;
        }

        let attacks = self.tick_enemies(dt);
        self.apply_attacks(&attacks);

        self.navigator.step(dt, &mut self.spatial);
        self.scan_pickups();
        Ok(())
    }

    fn dispatch_timer(&mut self, event: TimerEvent) -> Result<(), RuntimeError> {
        match event {
            TimerEvent::FireCooldown { owner, .. } | TimerEvent::ReloadComplete { owner, .. }
                if owner == EntityId::PLAYER =>
            {
                let env: CombatEnv<'_> = Env::new(None, None, Some(&self.catalog), None);
                self.weapon
                    .handle_timer(event, &mut self.inventory, &self.config, &env)?;
            }
            TimerEvent::TempHealthDecay { owner } => {
                if owner == EntityId::PLAYER {
                    self.player.decay_temporary_health();
                } else if let Some(enemy) = self.enemies.get_mut(&owner) {
                    enemy.combatant.decay_temporary_health();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn tick_enemies(&mut self, dt: Seconds) -> Vec<AttackEvent> {
        let Some(player_position) = self.spatial.position(EntityId::PLAYER) else {
            return Vec::new();
        };

        let mut attacks = Vec::new();
        for (&id, enemy) in self.enemies.iter_mut() {
            let Some(position) = self.spatial.position(id) else {
                continue;
            };

            // Stand-in perception: the target is sighted inside chase range.
            if position.distance(player_position) <= enemy.behavior.profile().chase_threshold {
                enemy.behavior.on_target_sighted(EntityId::PLAYER);
            }

            let env: CombatEnv<'_> =
                Env::new(None, Some(&self.spatial), None, Some(&self.rolls));
            let mut services = Services {
                navigator: &mut self.navigator,
                presentation: &mut self.presentation,
                timers: &mut self.timers,
            };
            if let Some(attack) =
                enemy
                    .behavior
                    .tick(dt, position, player_position, &env, &mut services)
            {
                attacks.push(attack);
            }
        }
        attacks
    }

    fn apply_attacks(&mut self, attacks: &[AttackEvent]) {
        for attack in attacks {
            if attack.target != EntityId::PLAYER || self.player.is_dead() {
                continue;
            }
            self.player.damage(attack.damage);
            self.events.push(SessionEvent::PlayerDamaged {
                amount: attack.damage,
            });
            if self.player.is_dead() {
                tracing::debug!("player died");
                self.events.push(SessionEvent::PlayerDied);
                // Drops pending cooldown/reload callbacks with the player.
                self.weapon.on_equip_changed(&mut self.timers);
            }
        }
    }

    fn damage_enemy(&mut self, target: EntityId, amount: u32) {
        let Some(position) = self.spatial.position(target) else {
            return;
        };
        let report = {
            let Some(enemy) = self.enemies.get_mut(&target) else {
                return;
            };
            let env: CombatEnv<'_> =
                Env::new(None, Some(&self.spatial), None, Some(&self.rolls));
            let mut services = Services {
                navigator: &mut self.navigator,
                presentation: &mut self.presentation,
                timers: &mut self.timers,
            };
            enemy
                .behavior
                .take_damage(amount, &mut enemy.combatant, position, &env, &mut services)
        };

        for id in report.alerted {
            if let Some(other) = self.enemies.get_mut(&id) {
                other.behavior.force_chase();
                self.events.push(SessionEvent::Alerted { enemy: id });
            }
        }

        if report.died {
            tracing::debug!("enemy {} died", target);
            self.enemies.remove(&target);
            self.spatial.remove(target);
            self.navigator.stop(target);
            self.events.push(SessionEvent::EnemyKilled { enemy: target });
        }
    }

    fn scan_pickups(&mut self) {
        let Some(player_position) = self.spatial.position(EntityId::PLAYER) else {
            self.item_in_range = None;
            return;
        };
        self.item_in_range = self
            .pickups
            .iter()
            .filter_map(|(&id, pickup)| {
                let distance = pickup.position.distance(player_position);
                (distance <= PICKUP_RADIUS).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);
    }
}
