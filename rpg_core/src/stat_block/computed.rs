//! Effective stats: derived stats plus active buff modifiers

use crate::buff::{ActiveBuffs, ModifierKey};
use crate::stat_block::StatBlock;
use serde::{Deserialize, Serialize};

/// Stats as combat sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub max_hp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl EffectiveStats {
    /// Apply buff totals to a block.
    ///
    /// Attack, defense, speed and max mp floor at 0; max hp floors at 1.
    pub fn compute(block: &StatBlock, buffs: &ActiveBuffs) -> EffectiveStats {
        EffectiveStats {
            max_hp: (block.max_hp + buffs.total(ModifierKey::HpBonus)).max(1),
            max_mp: (block.max_mp + buffs.total(ModifierKey::MpBonus)).max(0),
            attack: (block.attack + buffs.total(ModifierKey::AttackBonus)).max(0),
            defense: (block.defense + buffs.total(ModifierKey::DefenseBonus)).max(0),
            speed: (block.speed + buffs.total(ModifierKey::SpeedBonus)).max(0),
        }
    }
}
