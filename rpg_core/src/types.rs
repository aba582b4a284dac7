//! Core types shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Equipment slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Offhand,
    #[serde(rename = "accessory_1")]
    Accessory1,
    #[serde(rename = "accessory_2")]
    Accessory2,
    #[serde(rename = "accessory_3")]
    Accessory3,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Offhand,
            EquipmentSlot::Accessory1,
            EquipmentSlot::Accessory2,
            EquipmentSlot::Accessory3,
        ]
    }

    /// The three accessory slots, in fill order
    pub fn accessories() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Accessory1,
            EquipmentSlot::Accessory2,
            EquipmentSlot::Accessory3,
        ]
    }

    pub fn is_accessory(self) -> bool {
        matches!(
            self,
            EquipmentSlot::Accessory1 | EquipmentSlot::Accessory2 | EquipmentSlot::Accessory3
        )
    }

    /// Whether an item in this slot feeds the stat recompute.
    ///
    /// The offhand slot is held but never contributes bonuses.
    pub fn contributes_stats(self) -> bool {
        !matches!(self, EquipmentSlot::Offhand)
    }

    /// Item type an item must have to sit in this slot
    pub fn expected_item_type(self) -> ItemType {
        match self {
            EquipmentSlot::Weapon => ItemType::Weapon,
            EquipmentSlot::Armor => ItemType::Armor,
            EquipmentSlot::Offhand => ItemType::Offhand,
            _ => ItemType::Accessory,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::Offhand => "offhand",
            EquipmentSlot::Accessory1 => "accessory_1",
            EquipmentSlot::Accessory2 => "accessory_2",
            EquipmentSlot::Accessory3 => "accessory_3",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentSlot::all()
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| format!("unknown equipment slot '{}'", s))
    }
}

/// Item category from the items table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    Offhand,
    Consumable,
    #[serde(other)]
    Material,
}

impl ItemType {
    /// Weapon, armor, accessory and offhand items can be equipped
    pub fn is_equippable(self) -> bool {
        matches!(
            self,
            ItemType::Weapon | ItemType::Armor | ItemType::Accessory | ItemType::Offhand
        )
    }

    /// Slot an item of this type lands in; accessories pick their slot at equip time
    pub fn fixed_slot(self) -> Option<EquipmentSlot> {
        match self {
            ItemType::Weapon => Some(EquipmentSlot::Weapon),
            ItemType::Armor => Some(EquipmentSlot::Armor),
            ItemType::Offhand => Some(EquipmentSlot::Offhand),
            _ => None,
        }
    }
}

/// Character rank derived from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Novice,
    Adept,
    Veteran,
    Elite,
    Champion,
    Legend,
}

impl Rank {
    pub fn for_level(level: u32) -> Rank {
        match level {
            0..=4 => Rank::Novice,
            5..=9 => Rank::Adept,
            10..=14 => Rank::Veteran,
            15..=19 => Rank::Elite,
            20..=29 => Rank::Champion,
            _ => Rank::Legend,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
