//! StatBlock - Derived character stats from base values, gear and companions

mod aggregator;
mod computed;

pub use aggregator::StatAccumulator;
pub use computed::EffectiveStats;

use crate::data::StatLine;
use crate::source::StatSource;
use serde::{Deserialize, Serialize};

/// Stored base stats, before equipment and companions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(rename = "base_max_hp")]
    pub max_hp: i32,
    #[serde(rename = "base_max_mp")]
    pub max_mp: i32,
    #[serde(rename = "base_attack")]
    pub attack: i32,
    #[serde(rename = "base_defense")]
    pub defense: i32,
    #[serde(rename = "base_speed")]
    pub speed: i32,
}

impl BaseStats {
    pub fn add(&mut self, bonus: &StatLine) {
        self.max_hp += bonus.hp;
        self.max_mp += bonus.mp;
        self.attack += bonus.attack;
        self.defense += bonus.defense;
        self.speed += bonus.speed;
    }
}

impl From<StatLine> for BaseStats {
    fn from(line: StatLine) -> Self {
        BaseStats {
            max_hp: line.hp,
            max_mp: line.mp,
            attack: line.attack,
            defense: line.defense,
            speed: line.speed,
        }
    }
}

/// Derived stats: base plus equipment plus companion bonuses, before buffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Summed companion healing bonus
    #[serde(default)]
    pub healing: i32,
    /// Summed companion spell power bonus
    #[serde(default)]
    pub spell_power: i32,
}

impl StatBlock {
    /// Build a block from all sources, applied in priority order
    pub fn from_sources(sources: &[Box<dyn StatSource>]) -> StatBlock {
        let mut accumulator = StatAccumulator::new();

        let mut sorted_sources: Vec<_> = sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());

        for source in sorted_sources {
            source.apply(&mut accumulator);
        }

        let mut block = StatBlock::default();
        accumulator.apply_to(&mut block);
        block
    }

    /// Add level-up bonuses directly, matching what a rebuild would produce
    pub fn add_bonus(&mut self, bonus: &StatLine) {
        self.max_hp += bonus.hp;
        self.max_mp += bonus.mp;
        self.attack += bonus.attack;
        self.defense += bonus.defense;
        self.speed += bonus.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemDef;
    use crate::source::{BaseStatsSource, GearSource};
    use crate::types::EquipmentSlot;

    fn sword() -> ItemDef {
        serde_json::from_str(
            r#"{"name": "Sword", "type": "weapon", "attack_bonus": 5, "speed_penalty": 1}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_sources_sums_base_and_gear() {
        let base = BaseStats {
            max_hp: 100,
            max_mp: 50,
            attack: 10,
            defense: 8,
            speed: 10,
        };
        let sources: Vec<Box<dyn StatSource>> = vec![
            Box::new(GearSource::new(EquipmentSlot::Weapon, "sword", sword())),
            Box::new(BaseStatsSource::new(base)),
        ];
        let block = StatBlock::from_sources(&sources);

        assert_eq!(block.max_hp, 100);
        assert_eq!(block.attack, 15);
        assert_eq!(block.speed, 9);
    }

    #[test]
    fn test_base_stats_save_names() {
        let json = serde_json::to_value(BaseStats::default()).unwrap();
        assert!(json.get("base_max_hp").is_some());
        assert!(json.get("base_speed").is_some());
    }
}
