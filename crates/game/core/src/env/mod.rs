mod items;
mod rng;
mod services;

pub use items::{
    CatalogOracle, HealingSpec, ItemDefinition, ItemHandle, ItemInstance, ItemKind, SlotKind,
    WeaponSpec,
};
pub use rng::{PcgRoll, RollOracle, mix_seed};
pub use services::{
    AnimationCue, Navigator, Presentation, Services, TimerEvent, TimerId, TimerScheduler,
};

use crate::state::{EntityId, WorldPos};

/// Result of a ray query against the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: WorldPos,
}

/// Synchronous ray query against the world (hit tests for gunfire).
pub trait RayOracle {
    fn cast(&self, origin: WorldPos, direction: WorldPos, range: f32) -> Option<RayHit>;
}

/// Synchronous radius query (alert propagation).
pub trait ProximityOracle {
    fn actors_within(&self, center: WorldPos, radius: f32) -> Vec<EntityId>;
}

/// Aggregates the read-only oracles core operations consume.
///
/// A missing oracle behaves like a query that finds nothing; external
/// lookups coming up empty are valid outcomes, not errors.
#[derive(Clone, Copy)]
pub struct Env<'a, R, P, C, D>
where
    R: RayOracle + ?Sized,
    P: ProximityOracle + ?Sized,
    C: CatalogOracle + ?Sized,
    D: RollOracle + ?Sized,
{
    rays: Option<&'a R>,
    proximity: Option<&'a P>,
    catalog: Option<&'a C>,
    rolls: Option<&'a D>,
}

pub type CombatEnv<'a> = Env<
    'a,
    dyn RayOracle + 'a,
    dyn ProximityOracle + 'a,
    dyn CatalogOracle + 'a,
    dyn RollOracle + 'a,
>;

impl<'a, R, P, C, D> Env<'a, R, P, C, D>
where
    R: RayOracle + ?Sized,
    P: ProximityOracle + ?Sized,
    C: CatalogOracle + ?Sized,
    D: RollOracle + ?Sized,
{
    pub fn new(
        rays: Option<&'a R>,
        proximity: Option<&'a P>,
        catalog: Option<&'a C>,
        rolls: Option<&'a D>,
    ) -> Self {
        Self {
            rays,
            proximity,
            catalog,
            rolls,
        }
    }

    pub fn with_all(rays: &'a R, proximity: &'a P, catalog: &'a C, rolls: &'a D) -> Self {
        Self::new(Some(rays), Some(proximity), Some(catalog), Some(rolls))
    }

    pub fn empty() -> Self {
        Self {
            rays: None,
            proximity: None,
            catalog: None,
            rolls: None,
        }
    }

    pub fn rays(&self) -> Option<&'a R> {
        self.rays
    }

    pub fn proximity(&self) -> Option<&'a P> {
        self.proximity
    }

    pub fn catalog(&self) -> Option<&'a C> {
        self.catalog
    }

    pub fn rolls(&self) -> Option<&'a D> {
        self.rolls
    }
}

impl<'a, R, P, C, D> Env<'a, R, P, C, D>
where
    R: RayOracle + 'a,
    P: ProximityOracle + 'a,
    C: CatalogOracle + 'a,
    D: RollOracle + 'a,
{
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        let rays: Option<&'a dyn RayOracle> = self.rays.map(|rays| rays as _);
        let proximity: Option<&'a dyn ProximityOracle> = self.proximity.map(|prox| prox as _);
        let catalog: Option<&'a dyn CatalogOracle> = self.catalog.map(|catalog| catalog as _);
        let rolls: Option<&'a dyn RollOracle> = self.rolls.map(|rolls| rolls as _);
        Env::new(rays, proximity, catalog, rolls)
    }
}
