//! Melee enemy behavior: a two-state controller (Idle, Chase) with an
//! attack sub-mode gated by distance rather than stored as a state.
//!
//! Perception is external: the host reports "target sighted" events, and the
//! controller clears its own sight flag when the target leaves chase range.
//! Damaging an enemy alerts every enemy inside its alert radius before the
//! death check runs, so a dying victim still raises the pack.

use arrayvec::ArrayVec;
use strum::Display;

use crate::config::CombatConfig;
use crate::env::{AnimationCue, CombatEnv, Services, mix_seed};
use crate::state::{AssetId, Combatant, EntityId, Seconds, WorldPos};

/// Behavior state. Death ends the actor and is not tracked here.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Chase,
}

/// Fixed-at-spawn tuning for one enemy.
#[derive(Clone, Debug)]
pub struct EnemyProfile {
    /// The designated target (the player).
    pub target: EntityId,
    pub start_location: WorldPos,
    pub chase_threshold: f32,
    pub attack_threshold: f32,
    pub attack_damage: u32,
    pub attack_interval: Seconds,
    pub alert_radius: f32,
    /// Growl on roughly one tick in this many chances to growl.
    pub growl_one_in: u32,
    pub growl_sounds: ArrayVec<AssetId, { CombatConfig::MAX_GROWL_SOUNDS }>,
}

/// An attack the enemy landed this tick; the caller applies the damage to
/// the target's combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackEvent {
    pub target: EntityId,
    pub damage: u32,
}

/// Result of damaging an enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyDamageReport {
    /// Enemies inside the alert radius that must be forced into Chase.
    pub alerted: Vec<EntityId>,
    pub died: bool,
}

/// Finite-state controller driving one enemy combatant.
#[derive(Debug)]
pub struct EnemyBehavior {
    owner: EntityId,
    profile: EnemyProfile,
    state: EnemyState,
    /// Accumulates every tick regardless of state.
    time_since_last_attack: Seconds,
    can_see_target: bool,
    roll_nonce: u64,
}

impl EnemyBehavior {
    pub fn new(owner: EntityId, profile: EnemyProfile) -> Self {
        Self {
            owner,
            profile,
            state: EnemyState::Idle,
            time_since_last_attack: 0.0,
            can_see_target: false,
            roll_nonce: 0,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn can_see_target(&self) -> bool {
        self.can_see_target
    }

    pub fn profile(&self) -> &EnemyProfile {
        &self.profile
    }

    /// Perception event from the host. Only the designated target counts.
    pub fn on_target_sighted(&mut self, seen: EntityId) {
        if seen == self.profile.target {
            self.can_see_target = true;
        }
    }

    /// Forces the enemy into Chase regardless of its own perception state.
    /// Used by alert propagation and by direct hits.
    pub fn force_chase(&mut self) {
        self.state = EnemyState::Chase;
    }

    /// Runs one tick of the state machine. Returns an attack for the caller
    /// to apply to the target's combatant.
    pub fn tick(
        &mut self,
        dt: Seconds,
        position: WorldPos,
        target_position: WorldPos,
        env: &CombatEnv<'_>,
        services: &mut Services<'_>,
    ) -> Option<AttackEvent> {
        self.time_since_last_attack += dt;
        let distance = position.distance(target_position);

        match self.state {
            EnemyState::Idle => {
                if self.can_see_target {
                    self.state = EnemyState::Chase;
                } else if position != self.profile.start_location {
                    services
                        .navigator
                        .move_to_point(self.owner, self.profile.start_location);
                }
                None
            }
            EnemyState::Chase => {
                if distance <= self.profile.attack_threshold {
                    services.navigator.stop(self.owner);
                    if self.time_since_last_attack >= self.profile.attack_interval {
                        self.time_since_last_attack = 0.0;
                        services
                            .presentation
                            .play_animation(self.owner, AnimationCue::Attack);
                        self.maybe_growl(position, env, services, false);
                        return Some(AttackEvent {
                            target: self.profile.target,
                            damage: self.profile.attack_damage,
                        });
                    }
                    None
                } else if distance <= self.profile.chase_threshold {
                    if !services.navigator.is_navigating(self.owner) {
                        services
                            .navigator
                            .move_to_entity(self.owner, self.profile.target);
                        self.maybe_growl(position, env, services, false);
                    }
                    None
                } else {
                    // Target got away; walk back home next tick.
                    self.can_see_target = false;
                    self.state = EnemyState::Idle;
                    None
                }
            }
        }
    }

    /// Applies damage to this enemy's combatant, alerting nearby enemies
    /// first. The alert sweep runs before the death check so a lethal hit
    /// still raises the pack.
    pub fn take_damage(
        &mut self,
        amount: u32,
        combatant: &mut Combatant,
        position: WorldPos,
        env: &CombatEnv<'_>,
        services: &mut Services<'_>,
    ) -> EnemyDamageReport {
        if combatant.is_dead() {
            return EnemyDamageReport::default();
        }

        let mut alerted = Vec::new();
        if self.state != EnemyState::Chase
            && let Some(proximity) = env.proximity()
        {
            alerted = proximity.actors_within(position, self.profile.alert_radius);
            alerted.retain(|id| *id != self.owner);
        }
        self.force_chase();

        combatant.damage(amount);
        if combatant.is_dead() {
            self.maybe_growl(position, env, services, true);
            services
                .presentation
                .play_animation(self.owner, AnimationCue::Death);
        } else {
            self.maybe_growl(position, env, services, false);
        }

        EnemyDamageReport {
            alerted,
            died: combatant.is_dead(),
        }
    }

    fn maybe_growl(
        &mut self,
        position: WorldPos,
        env: &CombatEnv<'_>,
        services: &mut Services<'_>,
        guaranteed: bool,
    ) {
        if self.profile.growl_sounds.is_empty() {
            return;
        }
        let Some(rolls) = env.rolls() else {
            return;
        };

        let chance_seed = mix_seed(self.owner.0, self.roll_nonce);
        self.roll_nonce += 1;
        if !guaranteed && !rolls.one_in(chance_seed, self.profile.growl_one_in) {
            return;
        }

        let pick_seed = mix_seed(self.owner.0, self.roll_nonce);
        self.roll_nonce += 1;
        let index = rolls.pick(pick_seed, self.profile.growl_sounds.len() as u32) as usize;
        services
            .presentation
            .play_sound_at(self.profile.growl_sounds[index], position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        CombatEnv, Env, Navigator, PcgRoll, Presentation, ProximityOracle, TimerEvent, TimerId,
        TimerScheduler,
    };

    const TARGET: EntityId = EntityId::PLAYER;
    const ENEMY: EntityId = EntityId(1);

    fn profile() -> EnemyProfile {
        let mut growl_sounds = ArrayVec::new();
        growl_sounds.push(AssetId(30));
        growl_sounds.push(AssetId(31));
        EnemyProfile {
            target: TARGET,
            start_location: WorldPos::new(100.0, 0.0, 0.0),
            chase_threshold: 2000.0,
            attack_threshold: 100.0,
            attack_damage: 30,
            attack_interval: 0.8,
            alert_radius: 500.0,
            growl_one_in: 5,
            growl_sounds,
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum NavCall {
        MoveToPoint(EntityId, WorldPos),
        MoveToEntity(EntityId, EntityId),
        Stop(EntityId),
    }

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Vec<NavCall>,
        navigating: bool,
    }

    impl Navigator for RecordingNavigator {
        fn move_to_point(&mut self, actor: EntityId, goal: WorldPos) {
            self.calls.push(NavCall::MoveToPoint(actor, goal));
            self.navigating = true;
        }
        fn move_to_entity(&mut self, actor: EntityId, target: EntityId) {
            self.calls.push(NavCall::MoveToEntity(actor, target));
            self.navigating = true;
        }
        fn stop(&mut self, actor: EntityId) {
            self.calls.push(NavCall::Stop(actor));
            self.navigating = false;
        }
        fn is_navigating(&self, _actor: EntityId) -> bool {
            self.navigating
        }
    }

    #[derive(Default)]
    struct CueLog {
        cues: Vec<AnimationCue>,
        sounds: Vec<AssetId>,
    }

    impl Presentation for CueLog {
        fn play_sound(&mut self, sound: AssetId) {
            self.sounds.push(sound);
        }
        fn play_sound_at(&mut self, sound: AssetId, _location: WorldPos) {
            self.sounds.push(sound);
        }
        fn play_animation(&mut self, _actor: EntityId, cue: AnimationCue) {
            self.cues.push(cue);
        }
    }

    #[derive(Default)]
    struct NullTimers;

    impl TimerScheduler for NullTimers {
        fn schedule(&mut self, _delay: Seconds, _event: TimerEvent) -> TimerId {
            TimerId(0)
        }
        fn schedule_repeating(&mut self, _interval: Seconds, _event: TimerEvent) -> TimerId {
            TimerId(0)
        }
        fn cancel(&mut self, _id: TimerId) {}
    }

    struct PackNearby;

    impl ProximityOracle for PackNearby {
        fn actors_within(&self, _center: WorldPos, _radius: f32) -> Vec<EntityId> {
            vec![ENEMY, EntityId(2), EntityId(3)]
        }
    }

    struct Harness {
        behavior: EnemyBehavior,
        navigator: RecordingNavigator,
        presentation: CueLog,
        timers: NullTimers,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                behavior: EnemyBehavior::new(ENEMY, profile()),
                navigator: RecordingNavigator::default(),
                presentation: CueLog::default(),
                timers: NullTimers,
            }
        }

        fn tick(
            &mut self,
            dt: Seconds,
            position: WorldPos,
            target_position: WorldPos,
        ) -> Option<AttackEvent> {
            static ROLLS: PcgRoll = PcgRoll;
            let env: CombatEnv<'_> = Env::new(None, None, None, Some(&ROLLS));
            let mut services = Services {
                navigator: &mut self.navigator,
                presentation: &mut self.presentation,
                timers: &mut self.timers,
            };
            self.behavior
                .tick(dt, position, target_position, &env, &mut services)
        }
    }

    fn far_target() -> WorldPos {
        WorldPos::new(9000.0, 0.0, 0.0)
    }

    #[test]
    fn idle_at_start_location_issues_no_navigation() {
        let mut harness = Harness::new();
        harness.tick(0.016, profile().start_location, far_target());
        assert_eq!(harness.behavior.state(), EnemyState::Idle);
        assert!(harness.navigator.calls.is_empty());
    }

    #[test]
    fn idle_away_from_start_walks_home() {
        let mut harness = Harness::new();
        let here = WorldPos::new(500.0, 0.0, 0.0);
        harness.tick(0.016, here, far_target());
        assert_eq!(
            harness.navigator.calls,
            vec![NavCall::MoveToPoint(ENEMY, profile().start_location)]
        );
    }

    #[test]
    fn sighting_the_designated_target_triggers_chase() {
        let mut harness = Harness::new();
        harness.behavior.on_target_sighted(EntityId(42));
        assert!(!harness.behavior.can_see_target(), "wrong actor ignored");

        harness.behavior.on_target_sighted(TARGET);
        assert!(harness.behavior.can_see_target());
        harness.tick(0.016, profile().start_location, far_target());
        assert_eq!(harness.behavior.state(), EnemyState::Chase);
    }

    #[test]
    fn chase_in_attack_range_stops_and_attacks_on_cadence() {
        let mut harness = Harness::new();
        harness.behavior.force_chase();
        let position = WorldPos::ORIGIN;
        let target = WorldPos::new(50.0, 0.0, 0.0);

        // Cadence not reached yet after a single short tick.
        assert!(harness.tick(0.016, position, target).is_none());
        assert_eq!(harness.navigator.calls, vec![NavCall::Stop(ENEMY)]);

        // Accumulate past the attack interval.
        let attack = harness.tick(1.0, position, target).expect("attack lands");
        assert_eq!(
            attack,
            AttackEvent {
                target: TARGET,
                damage: 30
            }
        );
        assert_eq!(harness.presentation.cues, vec![AnimationCue::Attack]);

        // Timer was reset; an immediate follow-up tick cannot attack.
        assert!(harness.tick(0.016, position, target).is_none());
    }

    #[test]
    fn attack_timer_accumulates_while_idle() {
        let mut harness = Harness::new();
        harness.tick(2.0, profile().start_location, far_target());
        harness.behavior.force_chase();

        // Interval already banked during Idle; the first Chase tick attacks.
        let attack = harness.tick(0.016, WorldPos::ORIGIN, WorldPos::new(10.0, 0.0, 0.0));
        assert!(attack.is_some());
    }

    #[test]
    fn chase_at_mid_range_paths_to_the_target_once() {
        let mut harness = Harness::new();
        harness.behavior.force_chase();
        let position = WorldPos::ORIGIN;
        let target = WorldPos::new(800.0, 0.0, 0.0);

        harness.tick(0.016, position, target);
        harness.tick(0.016, position, target);
        let pursuit_commands = harness
            .navigator
            .calls
            .iter()
            .filter(|call| matches!(call, NavCall::MoveToEntity(..)))
            .count();
        assert_eq!(pursuit_commands, 1, "no re-path while already navigating");
    }

    #[test]
    fn chase_beyond_leash_returns_to_idle_and_clears_sight() {
        let mut harness = Harness::new();
        harness.behavior.on_target_sighted(TARGET);
        harness.behavior.force_chase();

        harness.tick(0.016, WorldPos::ORIGIN, WorldPos::new(2500.0, 0.0, 0.0));
        assert_eq!(harness.behavior.state(), EnemyState::Idle);
        assert!(!harness.behavior.can_see_target());
    }

    #[test]
    fn damage_alerts_the_pack_before_the_death_check() {
        let mut harness = Harness::new();
        let mut combatant = Combatant::new(100);
        static PACK: PackNearby = PackNearby;
        static ROLLS: PcgRoll = PcgRoll;
        let env: CombatEnv<'_> = Env::new(None, Some(&PACK), None, Some(&ROLLS));
        let mut services = Services {
            navigator: &mut harness.navigator,
            presentation: &mut harness.presentation,
            timers: &mut harness.timers,
        };

        let report = harness.behavior.take_damage(
            100,
            &mut combatant,
            WorldPos::ORIGIN,
            &env,
            &mut services,
        );
        assert!(report.died, "lethal hit");
        assert_eq!(
            report.alerted,
            vec![EntityId(2), EntityId(3)],
            "victim excluded, pack alerted even on a lethal hit"
        );
        assert_eq!(harness.behavior.state(), EnemyState::Chase);
        assert_eq!(
            harness.presentation.cues,
            vec![AnimationCue::Death],
            "death animation plays"
        );
        assert!(
            !harness.presentation.sounds.is_empty(),
            "death growl is guaranteed"
        );
    }

    #[test]
    fn damage_while_chasing_skips_the_alert_sweep() {
        let mut harness = Harness::new();
        harness.behavior.force_chase();
        let mut combatant = Combatant::new(100);
        static PACK: PackNearby = PackNearby;
        let env: CombatEnv<'_> = Env::new(None, Some(&PACK), None, None);
        let mut services = Services {
            navigator: &mut harness.navigator,
            presentation: &mut harness.presentation,
            timers: &mut harness.timers,
        };

        let report = harness.behavior.take_damage(
            10,
            &mut combatant,
            WorldPos::ORIGIN,
            &env,
            &mut services,
        );
        assert!(report.alerted.is_empty());
        assert!(!report.died);
        assert_eq!(combatant.current_health(), 90);
    }

    #[test]
    fn damage_to_a_dead_enemy_is_a_no_op() {
        let mut harness = Harness::new();
        let mut combatant = Combatant::new(10);
        combatant.damage(10);
        let env = CombatEnv::empty();
        let mut services = Services {
            navigator: &mut harness.navigator,
            presentation: &mut harness.presentation,
            timers: &mut harness.timers,
        };

        let report = harness.behavior.take_damage(
            50,
            &mut combatant,
            WorldPos::ORIGIN,
            &env,
            &mut services,
        );
        assert_eq!(report, EnemyDamageReport::default());
        assert_eq!(harness.behavior.state(), EnemyState::Idle);
    }
}
