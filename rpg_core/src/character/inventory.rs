//! Inventory - ordered multiset of item ids

use crate::character::Character;
use crate::data::{ConsumableEffect, GameData, ItemDef};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(Vec<String>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item_id: impl Into<String>) {
        self.0.push(item_id.into());
    }

    /// Remove the first copy of an item
    pub fn remove_one(&mut self, item_id: &str) -> bool {
        match self.0.iter().position(|id| id == item_id) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.0.iter().any(|id| id == item_id)
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.0.iter().filter(|id| *id == item_id).count() as u32
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumable items held, one entry per copy, in acquisition order
    pub fn consumables<'a>(&'a self, data: &'a GameData) -> Vec<(&'a str, &'a ItemDef)> {
        self.0
            .iter()
            .filter_map(|id| {
                data.item(id)
                    .filter(|item| item.is_consumable())
                    .map(|item| (id.as_str(), item))
            })
            .collect()
    }
}

impl From<Vec<String>> for Inventory {
    fn from(items: Vec<String>) -> Self {
        Inventory(items)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UseItemError {
    #[error("no '{0}' in inventory")]
    NotCarried(String),
    #[error("'{0}' cannot be used")]
    NotConsumable(String),
}

/// What drinking or eating an item restored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUse {
    pub item_id: String,
    pub healed: i32,
    pub mp_restored: i32,
}

impl Character {
    /// Consume one copy of a consumable and apply its effect
    pub fn use_item(&mut self, item_id: &str, data: &GameData) -> Result<ItemUse, UseItemError> {
        if !self.inventory.contains(item_id) {
            return Err(UseItemError::NotCarried(item_id.to_string()));
        }
        let item = data
            .item(item_id)
            .filter(|item| item.is_consumable())
            .ok_or_else(|| UseItemError::NotConsumable(item_id.to_string()))?;

        let mut used = ItemUse {
            item_id: item_id.to_string(),
            healed: 0,
            mp_restored: 0,
        };
        match item.effect {
            Some(ConsumableEffect::Heal) => used.healed = self.heal(item.value),
            Some(ConsumableEffect::MpRestore) => used.mp_restored = self.restore_mp(item.value),
            Some(ConsumableEffect::Other) | None => {}
        }
        self.inventory.remove_one(item_id);
        debug!(item = %item_id, healed = used.healed, mp = used.mp_restored, "item used");
        Ok(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_data, warrior};

    #[test]
    fn test_remove_one_keeps_duplicates() {
        let mut inv = Inventory::from(vec![
            "herb".to_string(),
            "health_potion".to_string(),
            "herb".to_string(),
        ]);
        assert!(inv.remove_one("herb"));
        assert_eq!(inv.count("herb"), 1);
        assert_eq!(inv.iter().next().map(String::as_str), Some("health_potion"));
        assert!(!inv.remove_one("dragon_scale"));
    }

    #[test]
    fn test_consumables_filter() {
        let data = sample_data();
        let inv = Inventory::from(vec![
            "herb".to_string(),
            "mana_potion".to_string(),
            "rusty_sword".to_string(),
        ]);
        let consumables: Vec<_> = inv.consumables(&data).into_iter().map(|(id, _)| id).collect();
        assert_eq!(consumables, vec!["mana_potion"]);
    }

    #[test]
    fn test_use_item_heals_and_consumes() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.inventory.add("health_potion");
        hero.inventory.add("health_potion");
        hero.hp = 10;

        let used = hero.use_item("health_potion", &data).unwrap();
        assert_eq!(used.healed, 30);
        assert_eq!(hero.hp, 40);
        assert_eq!(hero.inventory.count("health_potion"), 1);
    }

    #[test]
    fn test_use_item_refusals_leave_state() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.inventory.add("herb");

        assert_eq!(
            hero.use_item("mana_potion", &data).unwrap_err(),
            UseItemError::NotCarried("mana_potion".to_string())
        );
        assert_eq!(
            hero.use_item("herb", &data).unwrap_err(),
            UseItemError::NotConsumable("herb".to_string())
        );
        assert_eq!(hero.inventory.count("herb"), 1);
    }
}
