//! Item catalog oracle and definitions.
//!
//! Catalog records are immutable and owned by the host; the core references
//! them by handle. The only mutable per-item state is the magazine of a
//! weapon instance, which lives on [`ItemInstance`] so two dropped copies of
//! the same weapon track ammo independently.

use crate::state::{AssetId, Seconds};

/// Reference to an item definition stored outside the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

/// Read-only lookup of item definitions.
pub trait CatalogOracle {
    fn definition(&self, handle: ItemHandle) -> Option<ItemDefinition>;
}

/// Static description of a weapon or healing item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub handle: ItemHandle,
    pub name: String,
    pub slot: SlotKind,
    pub kind: ItemKind,
    pub mesh: AssetId,
    pub icon: AssetId,
}

/// Which of the paired equip slots an item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    Primary,
    Secondary,
}

/// Tagged item category; replaces runtime downcasts on a base item type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon(WeaponSpec),
    Healing(HealingSpec),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponSpec {
    pub damage: u32,
    pub capacity: u32,
    pub automatic: bool,
    pub fire_interval: Seconds,
    pub range: f32,
    pub sound: AssetId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealingSpec {
    pub heal_amount: u32,
    pub temporary: bool,
}

/// One physical copy of a catalog item. Created when the world spawns a
/// pickup, carried through inventories, and handed back to the world on drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub handle: ItemHandle,
    /// Rounds in the magazine. Meaningless for healing items.
    pub mag_ammo: u32,
}

impl ItemInstance {
    /// Creates an instance of a definition with a full magazine.
    pub fn of(definition: &ItemDefinition) -> Self {
        let mag_ammo = match &definition.kind {
            ItemKind::Weapon(spec) => spec.capacity,
            ItemKind::Healing(_) => 0,
        };
        Self {
            handle: definition.handle,
            mag_ammo,
        }
    }

    pub fn with_ammo(handle: ItemHandle, mag_ammo: u32) -> Self {
        Self { handle, mag_ammo }
    }
}
