//! Item records

use crate::types::ItemType;
use serde::{Deserialize, Serialize};

/// One entry of the items table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    #[serde(default)]
    pub requirements: Requirements,

    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default)]
    pub defense_bonus: i32,
    #[serde(default)]
    pub speed_bonus: i32,
    #[serde(default)]
    pub hp_bonus: i32,
    #[serde(default)]
    pub mp_bonus: i32,
    #[serde(default)]
    pub attack_penalty: i32,
    #[serde(default)]
    pub defense_penalty: i32,
    #[serde(default)]
    pub speed_penalty: i32,

    /// Weapons with this flag unlock spellcasting
    #[serde(default)]
    pub magic_weapon: bool,

    /// Consumable effect
    #[serde(default)]
    pub effect: Option<ConsumableEffect>,
    /// Magnitude of the consumable effect
    #[serde(default)]
    pub value: i32,
}

fn default_rarity() -> String {
    "common".to_string()
}

/// Level and class gates for equipping an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableEffect {
    Heal,
    MpRestore,
    #[serde(other)]
    Other,
}

impl ItemDef {
    /// Why a character of `level` and `class_id` cannot wear this item, if anything
    pub fn requirement_violation(&self, level: u32, class_id: &str) -> Option<String> {
        if let Some(required) = self.requirements.level {
            if level < required {
                return Some(format!("requires level {}", required));
            }
        }
        if let Some(ref required) = self.requirements.class {
            if required != class_id {
                return Some(format!("requires class {}", required));
            }
        }
        None
    }

    pub fn is_consumable(&self) -> bool {
        self.item_type == ItemType::Consumable
    }

    /// Price a shop pays when buying this item back
    pub fn sell_price(&self) -> u32 {
        self.price / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_item_defaults() {
        let item: ItemDef =
            serde_json::from_str(r#"{"name": "Rusty Sword", "type": "weapon", "attack_bonus": 4}"#)
                .unwrap();
        assert_eq!(item.item_type, ItemType::Weapon);
        assert_eq!(item.attack_bonus, 4);
        assert_eq!(item.rarity, "common");
        assert!(!item.magic_weapon);
        assert!(item.requirements.level.is_none());
    }

    #[test]
    fn test_requirement_violation() {
        let item: ItemDef = serde_json::from_str(
            r#"{"name": "Staff", "type": "weapon", "requirements": {"level": 5, "class": "mage"}}"#,
        )
        .unwrap();
        assert!(item.requirement_violation(4, "mage").is_some());
        assert!(item.requirement_violation(5, "warrior").is_some());
        assert!(item.requirement_violation(5, "mage").is_none());
    }

    #[test]
    fn test_sell_price_halves() {
        let item: ItemDef =
            serde_json::from_str(r#"{"name": "Potion", "type": "consumable", "price": 25}"#).unwrap();
        assert_eq!(item.sell_price(), 12);
    }
}
