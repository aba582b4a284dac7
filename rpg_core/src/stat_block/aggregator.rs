//! StatAccumulator - Collects stat contributions before building a StatBlock

use crate::stat_block::StatBlock;

/// Accumulates flat contributions from every stat source
///
/// Penalties are kept apart from bonuses so a breakdown can show both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatAccumulator {
    // === Resources ===
    pub max_hp: i32,
    pub max_mp: i32,

    // === Core ===
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,

    // === Penalties (subtracted) ===
    pub attack_penalty: i32,
    pub defense_penalty: i32,
    pub speed_penalty: i32,

    // === Support (companions only) ===
    pub healing: i32,
    pub spell_power: i32,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write accumulated totals into a block, replacing what it held
    pub fn apply_to(&self, block: &mut StatBlock) {
        block.max_hp = self.max_hp;
        block.max_mp = self.max_mp;
        block.attack = self.attack - self.attack_penalty;
        block.defense = self.defense - self.defense_penalty;
        block.speed = self.speed - self.speed_penalty;
        block.healing = self.healing;
        block.spell_power = self.spell_power;
    }
}
