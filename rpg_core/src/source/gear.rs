//! GearSource - Stats from equipped items

use crate::data::ItemDef;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::EquipmentSlot;

/// Stats from an equipped item
pub struct GearSource {
    /// Which slot this item is in
    pub slot: EquipmentSlot,
    /// Item id in the items table
    pub item_id: String,
    /// The equipped item
    pub item: ItemDef,
}

impl GearSource {
    pub fn new(slot: EquipmentSlot, item_id: impl Into<String>, item: ItemDef) -> Self {
        GearSource {
            slot,
            item_id: item_id.into(),
            item,
        }
    }
}

impl StatSource for GearSource {
    fn id(&self) -> &str {
        &self.item_id
    }

    fn priority(&self) -> i32 {
        0 // Gear applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        if !self.slot.contributes_stats() {
            return;
        }

        stats.attack += self.item.attack_bonus;
        stats.defense += self.item.defense_bonus;
        stats.speed += self.item.speed_bonus;
        stats.max_mp += self.item.mp_bonus;
        stats.max_hp += self.item.hp_bonus;

        stats.attack_penalty += self.item.attack_penalty;
        stats.defense_penalty += self.item.defense_penalty;
        stats.speed_penalty += self.item.speed_penalty;
    }
}
