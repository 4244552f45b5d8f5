//! Item catalog loading and the static in-memory catalog.

use std::collections::HashMap;
use std::path::Path;

use combat_core::{
    AssetId, CatalogOracle, HealingSpec, ItemDefinition, ItemHandle, ItemKind, SlotKind, WeaponSpec,
};
use serde::{Deserialize, Serialize};

use crate::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub items: Vec<ItemDefinition>,
}

/// In-memory catalog backing [`CatalogOracle`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<ItemHandle, ItemDefinition>,
}

impl StaticCatalog {
    pub fn new(items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|definition| (definition.handle, definition))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CatalogOracle for StaticCatalog {
    fn definition(&self, handle: ItemHandle) -> Option<ItemDefinition> {
        self.items.get(&handle).cloned()
    }
}

/// Load an item catalog from a RON file.
pub fn load_catalog(path: &Path) -> LoadResult<StaticCatalog> {
    let content = read_file(path)?;
    let file: CatalogFile =
        ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {e}"))?;
    Ok(StaticCatalog::new(file.items))
}

/// Built-in catalog: a primary rifle, a secondary pistol, a medkit, and
/// pain pills (temporary health).
pub fn default_catalog() -> StaticCatalog {
    StaticCatalog::new([
        ItemDefinition {
            handle: ItemHandle(1),
            name: "Rifle".into(),
            slot: SlotKind::Primary,
            kind: ItemKind::Weapon(WeaponSpec {
                damage: 25,
                capacity: 30,
                automatic: true,
                fire_interval: 0.1,
                range: 5000.0,
                sound: AssetId(101),
            }),
            mesh: AssetId(201),
            icon: AssetId(301),
        },
        ItemDefinition {
            handle: ItemHandle(2),
            name: "Pistol".into(),
            slot: SlotKind::Secondary,
            kind: ItemKind::Weapon(WeaponSpec {
                damage: 15,
                capacity: 12,
                automatic: false,
                fire_interval: 0.25,
                range: 3000.0,
                sound: AssetId(102),
            }),
            mesh: AssetId(202),
            icon: AssetId(302),
        },
        ItemDefinition {
            handle: ItemHandle(3),
            name: "Medkit".into(),
            slot: SlotKind::Primary,
            kind: ItemKind::Healing(HealingSpec {
                heal_amount: 80,
                temporary: false,
            }),
            mesh: AssetId(203),
            icon: AssetId(303),
        },
        ItemDefinition {
            handle: ItemHandle(4),
            name: "Pain Pills".into(),
            slot: SlotKind::Secondary,
            kind: ItemKind::Healing(HealingSpec {
                heal_amount: 50,
                temporary: true,
            }),
            mesh: AssetId(204),
            icon: AssetId(304),
        },
    ])
}
