//! World-side collaborator implementations backing a session.
//!
//! These stand in for the host engine's spatial queries, pathing, and
//! audio/animation playback: a position index answering ray and radius
//! queries, a straight-line navigator, and a recording presentation sink.

use std::collections::HashMap;

use combat_core::{
    AnimationCue, AssetId, EntityId, Navigator, Presentation, ProximityOracle, RayHit, RayOracle,
    Seconds, WorldPos,
};

/// Positions of every live actor, answering the core's read-side spatial
/// queries.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    positions: HashMap<EntityId, WorldPos>,
    /// Lateral tolerance for ray picks; actors are treated as spheres of
    /// this radius.
    pub hit_radius: f32,
}

impl SpatialIndex {
    pub fn new(hit_radius: f32) -> Self {
        Self {
            positions: HashMap::new(),
            hit_radius,
        }
    }

    pub fn insert(&mut self, entity: EntityId, position: WorldPos) {
        self.positions.insert(entity, position);
    }

    pub fn remove(&mut self, entity: EntityId) {
        self.positions.remove(&entity);
    }

    pub fn position(&self, entity: EntityId) -> Option<WorldPos> {
        self.positions.get(&entity).copied()
    }
}

impl RayOracle for SpatialIndex {
    fn cast(&self, origin: WorldPos, direction: WorldPos, range: f32) -> Option<RayHit> {
        let length =
            (direction.x * direction.x + direction.y * direction.y + direction.z * direction.z)
                .sqrt();
        if length <= f32::EPSILON || range <= 0.0 {
            return None;
        }
        let (dx, dy, dz) = (
            direction.x / length,
            direction.y / length,
            direction.z / length,
        );

        let mut best: Option<(f32, RayHit)> = None;
        for (&entity, &position) in &self.positions {
            let (ox, oy, oz) = (
                position.x - origin.x,
                position.y - origin.y,
                position.z - origin.z,
            );
            let t = ox * dx + oy * dy + oz * dz;
            // t == 0 is the shooter's own position.
            if t <= 0.0 || t > range {
                continue;
            }
            let (cx, cy, cz) = (ox - t * dx, oy - t * dy, oz - t * dz);
            let lateral = (cx * cx + cy * cy + cz * cz).sqrt();
            if lateral > self.hit_radius {
                continue;
            }
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((
                    t,
                    RayHit {
                        entity,
                        point: position,
                    },
                ));
            }
        }
        best.map(|(_, hit)| hit)
    }
}

impl ProximityOracle for SpatialIndex {
    fn actors_within(&self, center: WorldPos, radius: f32) -> Vec<EntityId> {
        let mut hits: Vec<EntityId> = self
            .positions
            .iter()
            .filter(|(_, position)| position.distance(center) <= radius)
            .map(|(&entity, _)| entity)
            .collect();
        hits.sort();
        hits
    }
}

#[derive(Clone, Copy, Debug)]
enum NavGoal {
    Point(WorldPos),
    Entity(EntityId),
}

/// Straight-line navigator: no pathfinding, actors walk directly toward
/// their goal at a fixed speed. Entity pursuit halts at `standoff` so a
/// chaser never lands on its target's exact position, which would put it
/// behind the target's ray origin and out of reach of hit tests.
#[derive(Debug)]
pub struct SteeringNavigator {
    goals: HashMap<EntityId, NavGoal>,
    pub speed: f32,
    pub standoff: f32,
}

impl SteeringNavigator {
    pub fn new(speed: f32, standoff: f32) -> Self {
        Self {
            goals: HashMap::new(),
            speed,
            standoff,
        }
    }

    /// Moves every navigating actor toward its goal; arrival clears the
    /// goal for point goals. Entity goals persist until `stop`.
    pub fn step(&mut self, dt: Seconds, spatial: &mut SpatialIndex) {
        let mut arrived = Vec::new();
        for (&actor, &goal) in &self.goals {
            let Some(position) = spatial.position(actor) else {
                arrived.push(actor);
                continue;
            };
            let (goal_position, stop_short) = match goal {
                NavGoal::Point(point) => (Some(point), 0.0),
                NavGoal::Entity(target) => (spatial.position(target), self.standoff),
            };
            let Some(goal_position) = goal_position else {
                arrived.push(actor);
                continue;
            };

            let distance = position.distance(goal_position);
            let remaining = distance - stop_short;
            if remaining <= 0.0 {
                continue;
            }
            let step = self.speed * dt;
            let travel = remaining.min(step);
            if travel >= distance {
                spatial.insert(actor, goal_position);
                if matches!(goal, NavGoal::Point(_)) {
                    arrived.push(actor);
                }
                continue;
            }
            let scale = travel / distance;
            spatial.insert(
                actor,
                WorldPos::new(
                    position.x + (goal_position.x - position.x) * scale,
                    position.y + (goal_position.y - position.y) * scale,
                    position.z + (goal_position.z - position.z) * scale,
                ),
            );
        }
        for actor in arrived {
            self.goals.remove(&actor);
        }
    }
}

impl Navigator for SteeringNavigator {
    fn move_to_point(&mut self, actor: EntityId, goal: WorldPos) {
        self.goals.insert(actor, NavGoal::Point(goal));
    }

    fn move_to_entity(&mut self, actor: EntityId, target: EntityId) {
        self.goals.insert(actor, NavGoal::Entity(target));
    }

    fn stop(&mut self, actor: EntityId) {
        self.goals.remove(&actor);
    }

    fn is_navigating(&self, actor: EntityId) -> bool {
        self.goals.contains_key(&actor)
    }
}

/// One recorded presentation call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresentationCall {
    Sound(AssetId),
    SoundAt(AssetId, WorldPos),
    Animation(EntityId, AnimationCue),
}

/// Presentation sink that records calls for the host to flush to its audio
/// and animation layers after each tick.
#[derive(Debug, Default)]
pub struct PresentationLog {
    pub calls: Vec<PresentationCall>,
}

impl PresentationLog {
    pub fn drain(&mut self) -> Vec<PresentationCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Presentation for PresentationLog {
    fn play_sound(&mut self, sound: AssetId) {
        tracing::debug!("play sound {:?}", sound);
        self.calls.push(PresentationCall::Sound(sound));
    }

    fn play_sound_at(&mut self, sound: AssetId, location: WorldPos) {
        tracing::debug!("play sound {:?} at {:?}", sound, location);
        self.calls.push(PresentationCall::SoundAt(sound, location));
    }

    fn play_animation(&mut self, actor: EntityId, cue: AnimationCue) {
        tracing::debug!("play animation {:?} on {}", cue, actor);
        self.calls.push(PresentationCall::Animation(actor, cue));
    }
}
