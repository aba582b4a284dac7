//! Shop and inn - Gold for items and rest

use crate::character::Character;
use crate::data::{AreaDef, GameData};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("costs {price} gold, you have {gold}")]
    InsufficientGold { price: u32, gold: u32 },
    #[error("no '{0}' in inventory")]
    NotCarried(String),
    #[error("unequip '{0}' before selling it")]
    Equipped(String),
    #[error("cannot rest in {0}")]
    CannotRest(String),
}

/// A completed rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestReceipt {
    pub cost: u32,
    pub hp_restored: i32,
    pub mp_restored: i32,
}

impl Character {
    /// Buy one copy of an item at its listed price
    pub fn buy_item(&mut self, item_id: &str, data: &GameData) -> Result<u32, ShopError> {
        let item = data
            .item(item_id)
            .ok_or_else(|| ShopError::UnknownItem(item_id.to_string()))?;
        if self.gold < item.price {
            return Err(ShopError::InsufficientGold {
                price: item.price,
                gold: self.gold,
            });
        }
        self.gold -= item.price;
        self.inventory.add(item_id);
        info!(item = %item_id, price = item.price, "item bought");
        Ok(item.price)
    }

    /// Sell one copy for half its price; equipped items must come off first
    pub fn sell_item(&mut self, item_id: &str, data: &GameData) -> Result<u32, ShopError> {
        if !self.inventory.contains(item_id) {
            return Err(ShopError::NotCarried(item_id.to_string()));
        }
        if self.equipment.is_equipped(item_id) {
            return Err(ShopError::Equipped(item_id.to_string()));
        }
        let price = data.item(item_id).map_or(0, |item| item.sell_price());
        self.inventory.remove_one(item_id);
        self.gold = self.gold.saturating_add(price);
        info!(item = %item_id, price, "item sold");
        Ok(price)
    }

    /// Pay the inn and recover fully
    pub fn rest_at(&mut self, area: &AreaDef) -> Result<RestReceipt, ShopError> {
        if !area.can_rest {
            return Err(ShopError::CannotRest(area.name.clone()));
        }
        if self.gold < area.rest_cost {
            return Err(ShopError::InsufficientGold {
                price: area.rest_cost,
                gold: self.gold,
            });
        }
        self.gold -= area.rest_cost;
        let (hp, mp) = (self.hp, self.mp);
        self.restore_full();
        info!(area = %area.name, cost = area.rest_cost, "rested");
        Ok(RestReceipt {
            cost: area.rest_cost,
            hp_restored: self.hp - hp,
            mp_restored: self.mp - mp,
        })
    }
}
