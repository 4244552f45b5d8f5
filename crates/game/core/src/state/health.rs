//! Health and temporary-health model shared by the player and enemies.
//!
//! Temporary health is a decaying buffer consumed before permanent health.
//! A single `damage` call drains temporary health OR current health, never
//! both; the overflow from a hit that empties the temporary buffer is lost
//! rather than spilling into current health.

/// Health-bearing entity subject to damage and healing.
///
/// Invariants:
/// - `current_health <= max_health`
/// - `temporary_health <= max_health - current_health`
/// - `is_dead` becomes true exactly when `current_health` reaches 0 and is
///   terminal: a dead combatant accepts no further mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    max_health: u32,
    current_health: u32,
    temporary_health: u32,
    is_dead: bool,
}

impl Combatant {
    /// Creates a combatant at full health.
    pub fn new(max_health: u32) -> Self {
        debug_assert!(max_health > 0, "max_health must be positive");
        Self {
            max_health,
            current_health: max_health,
            temporary_health: 0,
            is_dead: false,
        }
    }

    /// Creates a combatant with a specific starting health (clamped to max).
    /// Enemy spawners use this to roll starting health.
    pub fn with_current(max_health: u32, current_health: u32) -> Self {
        let mut combatant = Self::new(max_health);
        combatant.current_health = current_health.clamp(1, max_health);
        combatant
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn temporary_health(&self) -> u32 {
        self.temporary_health
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Applies damage. Temporary health absorbs the hit first; only when the
    /// buffer is already empty does current health take damage. No-op when
    /// dead.
    pub fn damage(&mut self, amount: u32) {
        if self.is_dead || amount == 0 {
            return;
        }

        if self.temporary_health > 0 {
            self.temporary_health = self.temporary_health.saturating_sub(amount);
        } else {
            self.current_health = self.current_health.saturating_sub(amount);
            if self.current_health == 0 {
                self.is_dead = true;
            }
        }
        self.check_invariants();
    }

    /// Restores health. Temporary heals fill the decaying buffer up to the
    /// combined ceiling of `max_health`; permanent heals raise current health
    /// directly. No-op when dead or already at full current health.
    pub fn heal(&mut self, amount: u32, temporary: bool) {
        if self.is_dead || amount == 0 || self.current_health >= self.max_health {
            return;
        }

        if temporary {
            let headroom = self.max_health - self.current_health;
            self.temporary_health = (self.temporary_health + amount).min(headroom);
        } else {
            self.current_health = (self.current_health + amount).min(self.max_health);
            // Permanent healing can shrink the temporary buffer's headroom.
            self.temporary_health = self
                .temporary_health
                .min(self.max_health - self.current_health);
        }
        self.check_invariants();
    }

    /// Drops the temporary buffer by one point. Driven by a repeating timer;
    /// has no effect once the buffer is empty or the combatant is dead.
    pub fn decay_temporary_health(&mut self) {
        if self.is_dead {
            return;
        }
        self.temporary_health = self.temporary_health.saturating_sub(1);
    }

    fn check_invariants(&self) {
        debug_assert!(self.current_health <= self.max_health);
        debug_assert!(self.temporary_health <= self.max_health - self.current_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_reduces_current_health() {
        let mut combatant = Combatant::new(100);
        combatant.damage(30);
        assert_eq!(combatant.current_health(), 70);
        assert!(!combatant.is_dead());
    }

    #[test]
    fn temporary_health_absorbs_damage_without_spillover() {
        let mut combatant = Combatant::new(100);
        combatant.damage(30);
        combatant.heal(50, true);
        assert_eq!(combatant.temporary_health(), 30, "capped at max - current");

        combatant.damage(10);
        assert_eq!(combatant.temporary_health(), 20);
        assert_eq!(combatant.current_health(), 70);

        // A hit larger than the buffer empties it but does not spill over.
        combatant.damage(50);
        assert_eq!(combatant.temporary_health(), 0);
        assert_eq!(combatant.current_health(), 70);
    }

    #[test]
    fn lethal_damage_is_terminal() {
        let mut combatant = Combatant::new(50);
        combatant.damage(50);
        assert!(combatant.is_dead());
        assert_eq!(combatant.current_health(), 0);

        // Dead combatants accept no further mutation.
        combatant.heal(10, false);
        assert_eq!(combatant.current_health(), 0);
        combatant.damage(10);
        assert!(combatant.is_dead());
    }

    #[test]
    fn heal_never_exceeds_max() {
        let mut combatant = Combatant::new(100);
        combatant.damage(10);
        combatant.heal(500, false);
        assert_eq!(combatant.current_health(), 100);

        combatant.heal(10, true);
        assert_eq!(combatant.temporary_health(), 0, "no-op at full health");
    }

    #[test]
    fn permanent_heal_shrinks_temporary_headroom() {
        let mut combatant = Combatant::new(100);
        combatant.damage(40);
        combatant.heal(40, true);
        assert_eq!(combatant.temporary_health(), 40);

        combatant.heal(30, false);
        assert_eq!(combatant.current_health(), 90);
        assert_eq!(combatant.temporary_health(), 10);
    }

    #[test]
    fn zero_amounts_are_idempotent() {
        let mut combatant = Combatant::new(100);
        combatant.damage(25);
        let before = combatant.clone();
        combatant.damage(0);
        combatant.heal(0, true);
        combatant.heal(0, false);
        assert_eq!(combatant, before);
    }

    #[test]
    fn decay_drains_one_point_and_saturates() {
        let mut combatant = Combatant::new(100);
        combatant.damage(10);
        combatant.heal(3, true);
        for _ in 0..5 {
            combatant.decay_temporary_health();
        }
        assert_eq!(combatant.temporary_health(), 0);
        assert_eq!(combatant.current_health(), 90);
    }
}
