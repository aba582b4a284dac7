//! BaseStatsSource - Stored base stats of a character

use crate::source::StatSource;
use crate::stat_block::{BaseStats, StatAccumulator};

/// Stats a character has before gear and companions
pub struct BaseStatsSource {
    pub base: BaseStats,
}

impl BaseStatsSource {
    pub fn new(base: BaseStats) -> Self {
        BaseStatsSource { base }
    }
}

impl StatSource for BaseStatsSource {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.max_hp += self.base.max_hp;
        stats.max_mp += self.base.max_mp;
        stats.attack += self.base.attack;
        stats.defense += self.base.defense;
        stats.speed += self.base.speed;
    }
}
