//! CompanionSource - Passive bonuses from hired companions

use crate::data::CompanionDef;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;

/// Bonuses a hired companion lends the player
///
/// A companion's own equipment never contributes; only the table entry does.
pub struct CompanionSource {
    pub companion_id: String,
    pub def: CompanionDef,
}

impl CompanionSource {
    pub fn new(companion_id: impl Into<String>, def: CompanionDef) -> Self {
        CompanionSource {
            companion_id: companion_id.into(),
            def,
        }
    }
}

impl StatSource for CompanionSource {
    fn id(&self) -> &str {
        &self.companion_id
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.attack += self.def.attack_bonus;
        stats.defense += self.def.defense_bonus;
        stats.speed += self.def.speed_bonus;
        stats.max_hp += self.def.hp_bonus;
        stats.max_mp += self.def.mp_bonus;
        stats.healing += self.def.healing_bonus;
        stats.spell_power += self.def.spell_power_bonus;
    }
}
