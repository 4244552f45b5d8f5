//! Equip slots and pickup/drop/switch rules.
//!
//! An actor holds up to four items: a primary and secondary weapon and a
//! primary and secondary healing item. The equipped item is tracked as a
//! slot index rather than a second reference to the item, so "equipped must
//! alias a held slot" holds by construction and a drop can never leave a
//! dangling equip behind.

use strum::Display;

use crate::env::{ItemDefinition, ItemInstance, ItemKind, SlotKind};

/// One of the four fixed inventory positions.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    PrimaryWeapon,
    SecondaryWeapon,
    PrimaryHealing,
    SecondaryHealing,
}

impl EquipSlot {
    /// The slot an item belongs to, keyed by `(kind, slot type)`.
    pub fn for_item(definition: &ItemDefinition) -> Self {
        match (&definition.kind, definition.slot) {
            (ItemKind::Weapon(_), SlotKind::Primary) => Self::PrimaryWeapon,
            (ItemKind::Weapon(_), SlotKind::Secondary) => Self::SecondaryWeapon,
            (ItemKind::Healing(_), SlotKind::Primary) => Self::PrimaryHealing,
            (ItemKind::Healing(_), SlotKind::Secondary) => Self::SecondaryHealing,
        }
    }
}

/// Per-actor item slots plus the shared reserve ammo pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    primary_weapon: Option<ItemInstance>,
    secondary_weapon: Option<ItemInstance>,
    primary_healing: Option<ItemInstance>,
    secondary_healing: Option<ItemInstance>,
    equipped: Option<EquipSlot>,
    /// Reserve rounds shared across weapons.
    pub reserve_ammo: u32,
}

impl Inventory {
    pub fn new(reserve_ammo: u32) -> Self {
        Self {
            reserve_ammo,
            ..Self::default()
        }
    }

    /// Stores a picked-up item in its slot and equips it. If the slot was
    /// occupied, the occupant is returned so the caller can hand it to the
    /// world as a new pickup.
    pub fn pick_up(
        &mut self,
        item: ItemInstance,
        definition: &ItemDefinition,
    ) -> Option<ItemInstance> {
        debug_assert_eq!(item.handle, definition.handle);
        let slot = EquipSlot::for_item(definition);
        let displaced = self.slot_mut(slot).replace(item);
        self.equipped = Some(slot);
        displaced
    }

    /// Removes and returns the equipped item; `None` when nothing is
    /// equipped.
    pub fn drop_equipped(&mut self) -> Option<ItemInstance> {
        let slot = self.equipped.take()?;
        self.slot_mut(slot).take()
    }

    /// Equips the item held in `slot`, or clears the equip if the slot is
    /// empty. Never moves items between slots.
    pub fn switch_equip(&mut self, slot: EquipSlot) {
        self.equipped = self.item(slot).is_some().then_some(slot);
    }

    /// Removes the item in `slot`, clearing the equip if it pointed there.
    /// Used when a consumable is spent.
    pub fn clear_slot(&mut self, slot: EquipSlot) -> Option<ItemInstance> {
        if self.equipped == Some(slot) {
            self.equipped = None;
        }
        self.slot_mut(slot).take()
    }

    pub fn equipped(&self) -> Option<EquipSlot> {
        self.equipped
    }

    pub fn equipped_item(&self) -> Option<&ItemInstance> {
        self.item(self.equipped?)
    }

    pub fn equipped_item_mut(&mut self) -> Option<&mut ItemInstance> {
        let slot = self.equipped?;
        self.slot_mut(slot).as_mut()
    }

    pub fn item(&self, slot: EquipSlot) -> Option<&ItemInstance> {
        match slot {
            EquipSlot::PrimaryWeapon => self.primary_weapon.as_ref(),
            EquipSlot::SecondaryWeapon => self.secondary_weapon.as_ref(),
            EquipSlot::PrimaryHealing => self.primary_healing.as_ref(),
            EquipSlot::SecondaryHealing => self.secondary_healing.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<ItemInstance> {
        match slot {
            EquipSlot::PrimaryWeapon => &mut self.primary_weapon,
            EquipSlot::SecondaryWeapon => &mut self.secondary_weapon,
            EquipSlot::PrimaryHealing => &mut self.primary_healing,
            EquipSlot::SecondaryHealing => &mut self.secondary_healing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{HealingSpec, ItemHandle, WeaponSpec};
    use crate::state::AssetId;

    fn weapon_def(handle: u32, slot: SlotKind) -> ItemDefinition {
        ItemDefinition {
            handle: ItemHandle(handle),
            name: format!("weapon-{handle}"),
            slot,
            kind: ItemKind::Weapon(WeaponSpec {
                damage: 20,
                capacity: 30,
                automatic: false,
                fire_interval: 0.2,
                range: 5000.0,
                sound: AssetId(1),
            }),
            mesh: AssetId(2),
            icon: AssetId(3),
        }
    }

    fn healing_def(handle: u32, slot: SlotKind) -> ItemDefinition {
        ItemDefinition {
            handle: ItemHandle(handle),
            name: format!("heal-{handle}"),
            slot,
            kind: ItemKind::Healing(HealingSpec {
                heal_amount: 25,
                temporary: false,
            }),
            mesh: AssetId(2),
            icon: AssetId(3),
        }
    }

    #[test]
    fn pick_up_equips_and_routes_by_slot() {
        let mut inventory = Inventory::new(120);
        let rifle = weapon_def(1, SlotKind::Primary);
        let pistol = weapon_def(2, SlotKind::Secondary);
        let medkit = healing_def(3, SlotKind::Primary);

        assert!(
            inventory
                .pick_up(ItemInstance::of(&rifle), &rifle)
                .is_none()
        );
        assert_eq!(inventory.equipped(), Some(EquipSlot::PrimaryWeapon));

        assert!(
            inventory
                .pick_up(ItemInstance::of(&pistol), &pistol)
                .is_none()
        );
        assert_eq!(inventory.equipped(), Some(EquipSlot::SecondaryWeapon));

        assert!(
            inventory
                .pick_up(ItemInstance::of(&medkit), &medkit)
                .is_none()
        );
        assert_eq!(inventory.equipped(), Some(EquipSlot::PrimaryHealing));
        assert!(inventory.item(EquipSlot::PrimaryWeapon).is_some());
        assert!(inventory.item(EquipSlot::SecondaryWeapon).is_some());
    }

    #[test]
    fn pick_up_into_occupied_slot_displaces_the_occupant() {
        let mut inventory = Inventory::new(0);
        let old = weapon_def(1, SlotKind::Primary);
        let new = weapon_def(9, SlotKind::Primary);

        inventory.pick_up(ItemInstance::with_ammo(ItemHandle(1), 7), &old);
        let displaced = inventory
            .pick_up(ItemInstance::of(&new), &new)
            .expect("occupant should be handed back");
        assert_eq!(displaced.handle, ItemHandle(1));
        assert_eq!(displaced.mag_ammo, 7, "displaced weapon keeps its ammo");
        assert_eq!(
            inventory.equipped_item().unwrap().handle,
            ItemHandle(9),
            "new item is equipped"
        );
    }

    #[test]
    fn drop_equipped_never_leaves_a_dangling_equip() {
        let mut inventory = Inventory::new(0);
        let rifle = weapon_def(1, SlotKind::Primary);
        inventory.pick_up(ItemInstance::of(&rifle), &rifle);

        let dropped = inventory.drop_equipped().expect("rifle was equipped");
        assert_eq!(dropped.handle, ItemHandle(1));
        assert_eq!(inventory.equipped(), None);
        assert!(inventory.item(EquipSlot::PrimaryWeapon).is_none());

        // Dropping with nothing equipped is a no-op.
        assert!(inventory.drop_equipped().is_none());
    }

    #[test]
    fn switch_equip_only_lands_on_held_slots() {
        let mut inventory = Inventory::new(0);
        let pistol = weapon_def(2, SlotKind::Secondary);
        inventory.pick_up(ItemInstance::of(&pistol), &pistol);

        inventory.switch_equip(EquipSlot::PrimaryWeapon);
        assert_eq!(inventory.equipped(), None, "empty slot clears the equip");

        inventory.switch_equip(EquipSlot::SecondaryWeapon);
        assert_eq!(inventory.equipped(), Some(EquipSlot::SecondaryWeapon));
    }

    #[test]
    fn clear_slot_unequips_when_needed() {
        let mut inventory = Inventory::new(0);
        let pills = healing_def(4, SlotKind::Secondary);
        inventory.pick_up(ItemInstance::of(&pills), &pills);

        let spent = inventory.clear_slot(EquipSlot::SecondaryHealing);
        assert!(spent.is_some());
        assert_eq!(inventory.equipped(), None);
    }
}
