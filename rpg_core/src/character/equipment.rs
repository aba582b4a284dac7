//! Equipment slots and the equip/unequip rules

use crate::character::Character;
use crate::data::GameData;
use crate::types::{EquipmentSlot, ItemType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Item ids held in each slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub offhand: Option<String>,
    #[serde(default)]
    pub accessory_1: Option<String>,
    #[serde(default)]
    pub accessory_2: Option<String>,
    #[serde(default)]
    pub accessory_3: Option<String>,
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> Option<&str> {
        self.slot_ref(slot).as_deref()
    }

    fn slot_ref(&self, slot: EquipmentSlot) -> &Option<String> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Offhand => &self.offhand,
            EquipmentSlot::Accessory1 => &self.accessory_1,
            EquipmentSlot::Accessory2 => &self.accessory_2,
            EquipmentSlot::Accessory3 => &self.accessory_3,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<String> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Offhand => &mut self.offhand,
            EquipmentSlot::Accessory1 => &mut self.accessory_1,
            EquipmentSlot::Accessory2 => &mut self.accessory_2,
            EquipmentSlot::Accessory3 => &mut self.accessory_3,
        }
    }

    /// Put an item in a slot, returning what was there
    pub fn set(&mut self, slot: EquipmentSlot, item_id: impl Into<String>) -> Option<String> {
        self.slot_mut(slot).replace(item_id.into())
    }

    pub fn clear(&mut self, slot: EquipmentSlot) -> Option<String> {
        self.slot_mut(slot).take()
    }

    /// Occupied slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &str)> + '_ {
        EquipmentSlot::all()
            .iter()
            .filter_map(move |slot| self.get(*slot).map(|id| (*slot, id)))
    }

    pub fn is_equipped(&self, item_id: &str) -> bool {
        self.iter().any(|(_, id)| id == item_id)
    }

    pub fn first_free_accessory(&self) -> Option<EquipmentSlot> {
        EquipmentSlot::accessories()
            .iter()
            .copied()
            .find(|slot| self.get(*slot).is_none())
    }
}

/// Why an equip attempt was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("'{0}' cannot be equipped")]
    NotEquippable(String),
    #[error("requires level {required} (current level {current})")]
    LevelTooLow { required: u32, current: u32 },
    #[error("only a {required} can use this item")]
    WrongClass { required: String },
    #[error("all accessory slots are full; choose one to replace")]
    AccessorySlotsFull,
    #[error("{0} is not an accessory slot")]
    NotAnAccessorySlot(EquipmentSlot),
}

/// An item removed from a slot while loading a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnequipNotice {
    pub slot: EquipmentSlot,
    pub item_id: String,
    pub reason: String,
}

impl Character {
    /// Equip an item by id.
    ///
    /// Accessories take the first free accessory slot; when all three are
    /// full, `replace` must name the accessory slot to overwrite. Other types
    /// overwrite their own slot. The inventory is not touched.
    pub fn equip(
        &mut self,
        item_id: &str,
        data: &GameData,
        replace: Option<EquipmentSlot>,
    ) -> Result<EquipmentSlot, EquipError> {
        let item = data
            .item(item_id)
            .ok_or_else(|| EquipError::UnknownItem(item_id.to_string()))?;

        if !item.item_type.is_equippable() {
            return Err(EquipError::NotEquippable(item.name.clone()));
        }
        if let Some(required) = item.requirements.level {
            if self.level < required {
                return Err(EquipError::LevelTooLow {
                    required,
                    current: self.level,
                });
            }
        }
        if let Some(ref required) = item.requirements.class {
            if *required != self.class_id {
                return Err(EquipError::WrongClass {
                    required: required.clone(),
                });
            }
        }

        let slot = match item.item_type.fixed_slot() {
            Some(slot) => slot,
            None => match self.equipment.first_free_accessory() {
                Some(slot) => slot,
                None => match replace {
                    Some(slot) if slot.is_accessory() => slot,
                    Some(slot) => return Err(EquipError::NotAnAccessorySlot(slot)),
                    None => return Err(EquipError::AccessorySlotsFull),
                },
            },
        };

        let previous = self.equipment.set(slot, item_id);
        info!(slot = %slot, item = %item_id, previous = ?previous, "{} equips {}", self.name, item.name);
        self.recompute_stats(data);
        Ok(slot)
    }

    /// Clear a slot and return its previous occupant
    pub fn unequip(&mut self, slot: EquipmentSlot, data: &GameData) -> Option<String> {
        let previous = self.equipment.clear(slot);
        self.recompute_stats(data);
        previous
    }

    /// Drop every equipped item that no longer passes the equip rules.
    ///
    /// Used after loading a save: the item must still exist, fit its slot and
    /// meet level and class requirements. Stats are recomputed afterwards.
    pub fn validate_equipment(&mut self, data: &GameData) -> Vec<UnequipNotice> {
        let mut notices = Vec::new();

        for slot in EquipmentSlot::all().iter().copied() {
            let Some(item_id) = self.equipment.get(slot).map(str::to_string) else {
                continue;
            };

            let reason = match data.item(&item_id) {
                None => Some("item no longer exists".to_string()),
                Some(item) if item.item_type != slot.expected_item_type() => Some(format!(
                    "{} cannot go in the {} slot",
                    item_type_name(item.item_type),
                    slot
                )),
                Some(item) => item.requirement_violation(self.level, &self.class_id),
            };

            if let Some(reason) = reason {
                warn!(slot = %slot, item = %item_id, reason = %reason, "unequipping invalid item");
                self.equipment.clear(slot);
                notices.push(UnequipNotice {
                    slot,
                    item_id,
                    reason,
                });
            }
        }

        self.recompute_stats(data);
        notices
    }
}

fn item_type_name(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Weapon => "a weapon",
        ItemType::Armor => "armor",
        ItemType::Accessory => "an accessory",
        ItemType::Offhand => "an offhand item",
        ItemType::Consumable => "a consumable",
        ItemType::Material => "a material",
    }
}
