//! Character - The player's hero
//!
//! Stored base stats never change except on level-up. Everything derived
//! (`stats`) is rebuilt from sources by [`Character::recompute_stats`], and
//! buffs are layered on top when an effective value is read.

mod companion;
mod equipment;
mod inventory;
mod leveling;

pub use companion::{Companion, CompanionEquipment, CompanionError, CompanionRecord};
pub use equipment::{EquipError, Equipment, UnequipNotice};
pub use inventory::{Inventory, ItemUse, UseItemError};
pub use leveling::{experience_threshold_after, LevelUp};

use crate::buff::{ActiveBuff, ActiveBuffs, BuffModifiers};
use crate::config::ProgressionConstants;
use crate::data::{ClassDef, CompanionDef, GameData, ItemDef, Table};
use crate::source::{BaseStatsSource, CompanionSource, GearSource, StatSource};
use crate::stat_block::{BaseStats, EffectiveStats, StatBlock};
use crate::types::Rank;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub uuid: Uuid,
    pub class_id: String,
    /// Snapshot of the class entry taken at creation
    pub class_data: ClassDef,

    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub rank: Rank,

    pub base: BaseStats,
    pub stats: StatBlock,
    pub hp: i32,
    pub mp: i32,

    pub gold: u32,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub companions: Vec<Companion>,
    pub active_buffs: ActiveBuffs,
    /// Last kill time per boss name
    pub bosses_killed: BTreeMap<String, DateTime<Utc>>,

    /// Halves the next plain enemy attack
    pub defending: bool,
}

/// What a round of buff upkeep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuffTick {
    pub healed: i32,
    pub mp_restored: i32,
    pub expired: Vec<String>,
}

impl BuffTick {
    pub fn any_expired(&self) -> bool {
        !self.expired.is_empty()
    }
}

impl Character {
    /// Create a level 1 character from a class entry
    pub fn new(
        name: impl Into<String>,
        class_id: impl Into<String>,
        class: &ClassDef,
        progression: &ProgressionConstants,
    ) -> Character {
        let base = BaseStats::from(class.base_stats);
        let mut character = Character {
            name: name.into(),
            uuid: Uuid::new_v4(),
            class_id: class_id.into(),
            class_data: class.clone(),
            level: 1,
            experience: 0,
            experience_to_next: progression.first_level_threshold.max(1),
            rank: Rank::for_level(1),
            base,
            stats: StatBlock::default(),
            hp: base.max_hp,
            mp: base.max_mp,
            gold: progression.starting_gold,
            inventory: Inventory::new(),
            equipment: Equipment::default(),
            companions: Vec::new(),
            active_buffs: ActiveBuffs::new(),
            bosses_killed: BTreeMap::new(),
            defending: false,
        };
        character.stats = StatBlock::from_sources(&[Box::new(BaseStatsSource::new(base))]);
        character
    }

    // === Effective Stats ===

    pub fn effective(&self) -> EffectiveStats {
        EffectiveStats::compute(&self.stats, &self.active_buffs)
    }

    pub fn effective_attack(&self) -> i32 {
        self.effective().attack
    }

    pub fn effective_defense(&self) -> i32 {
        self.effective().defense
    }

    pub fn effective_speed(&self) -> i32 {
        self.effective().speed
    }

    pub fn effective_max_hp(&self) -> i32 {
        self.effective().max_hp
    }

    pub fn effective_max_mp(&self) -> i32 {
        self.effective().max_mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    // === Resources ===

    /// Heal up to effective max hp, returning the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.effective_max_hp()).max(before);
        self.hp - before
    }

    /// Restore mp up to effective max mp, returning the amount restored
    pub fn restore_mp(&mut self, amount: i32) -> i32 {
        let before = self.mp;
        self.mp = (self.mp + amount.max(0)).min(self.effective_max_mp()).max(before);
        self.mp - before
    }

    /// Restore hp and mp to their effective maxima
    pub fn restore_full(&mut self) {
        self.hp = self.effective_max_hp();
        self.mp = self.effective_max_mp();
    }

    /// Take a hit.
    ///
    /// Defense lowers the hit to no less than 1, absorb shields soak what they
    /// can, and the rest comes off hp. Returns the hp actually lost.
    pub fn take_damage(&mut self, incoming: i32) -> i32 {
        let base_damage = (incoming - self.effective_defense()).max(1);
        let remaining = self.active_buffs.absorb(base_damage).max(0);
        let before = self.hp;
        self.hp = (self.hp - remaining).max(0);
        debug!(incoming, base_damage, taken = remaining, "{} takes damage", self.name);
        before - self.hp
    }

    pub fn clamp_resources(&mut self) {
        self.hp = self.hp.clamp(0, self.effective_max_hp());
        self.mp = self.mp.clamp(0, self.effective_max_mp());
    }

    // === Buffs ===

    pub fn apply_buff(&mut self, name: impl Into<String>, duration: i32, modifiers: BuffModifiers) {
        let buff = ActiveBuff::new(name, duration, modifiers);
        debug!(buff = %buff.name, duration, "{} gains a buff", self.name);
        self.active_buffs.push(buff);
    }

    /// One round of buff upkeep.
    ///
    /// Per-turn regeneration from every buff lands first, then each duration
    /// drops by one and expired buffs are removed.
    pub fn tick_buffs(&mut self) -> BuffTick {
        let mut tick = BuffTick::default();
        for (mp_per_turn, heal_per_turn) in self.active_buffs.per_turn() {
            if mp_per_turn != 0 {
                tick.mp_restored += self.restore_mp(mp_per_turn);
            }
            if heal_per_turn != 0 {
                tick.healed += self.heal(heal_per_turn);
            }
        }
        tick.expired = self.active_buffs.decrement();
        tick
    }

    // === Stat Recompute ===

    /// Sources feeding the stat block
    pub fn stat_sources(
        &self,
        items: &Table<ItemDef>,
        companions: Option<&Table<CompanionDef>>,
    ) -> Vec<Box<dyn StatSource>> {
        let mut sources: Vec<Box<dyn StatSource>> = vec![Box::new(BaseStatsSource::new(self.base))];

        for (slot, item_id) in self.equipment.iter() {
            if !slot.contributes_stats() {
                continue;
            }
            match items.get(item_id) {
                Some(item) => sources.push(Box::new(GearSource::new(slot, item_id, item.clone()))),
                None => warn!(slot = %slot, item = %item_id, "equipped item missing from items table"),
            }
        }

        if let Some(table) = companions {
            for companion in &self.companions {
                match companion::lookup(table, companion) {
                    Some((id, def)) => sources.push(Box::new(CompanionSource::new(id, def.clone()))),
                    None => warn!(companion = %companion.name, "companion missing from companions table"),
                }
            }
        }

        sources
    }

    /// Rebuild derived stats from base values, equipment and optionally companions.
    ///
    /// Current hp and mp are clamped to the new maxima, never refilled.
    pub fn update_stats_from_equipment(
        &mut self,
        items: &Table<ItemDef>,
        companions: Option<&Table<CompanionDef>>,
    ) {
        let sources = self.stat_sources(items, companions);
        self.stats = StatBlock::from_sources(&sources);
        self.clamp_resources();
    }

    /// Full rebuild including companion bonuses
    pub fn recompute_stats(&mut self, data: &GameData) {
        self.update_stats_from_equipment(&data.items, Some(&data.companions));
    }

    /// Companion table entries for the hired party, in party order
    pub fn companion_defs<'a>(&self, data: &'a GameData) -> Vec<(String, &'a CompanionDef)> {
        self.companions
            .iter()
            .filter_map(|c| {
                companion::lookup(&data.companions, c).map(|(_, def)| (c.name.clone(), def))
            })
            .collect()
    }
}
