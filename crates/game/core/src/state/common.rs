use std::fmt;

/// Duration or elapsed time in seconds.
pub type Seconds = f32;

/// Unique identifier for any actor tracked by the host world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Continuous world-space position (also used for direction vectors in ray
/// queries).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Opaque handle to a host-side asset (mesh, icon, sound clip). The core
/// never interprets these; they flow through to the presentation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = WorldPos::new(0.0, 0.0, 0.0);
        let b = WorldPos::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn entity_id_displays_with_hash_prefix() {
        assert_eq!(EntityId(7).to_string(), "#7");
        assert_eq!(EntityId::PLAYER, EntityId(0));
    }
}
