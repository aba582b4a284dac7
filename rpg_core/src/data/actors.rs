//! Enemy, boss and class records

use serde::{Deserialize, Serialize};

/// One entry of the enemies table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub name: String,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub experience_reward: u32,
    pub gold_reward: u32,
    #[serde(default)]
    pub loot_table: Vec<String>,
}

/// One entry of the bosses table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    #[serde(flatten)]
    pub base: EnemyDef,
    #[serde(default = "default_boss_description")]
    pub description: String,
    #[serde(default)]
    pub special_abilities: Vec<BossAbility>,
    #[serde(default)]
    pub phases: Vec<BossPhase>,
}

fn default_boss_description() -> String {
    "A powerful foe.".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossAbility {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub mp_cost: i32,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub stun_chance: Option<f64>,
    #[serde(default)]
    pub heal_amount: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    /// Fraction of max hp at or below which the phase activates
    pub hp_threshold: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_multiplier")]
    pub attack_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub defense_multiplier: f64,
    /// Ability names usable in this phase; empty allows every ability
    #[serde(default)]
    pub special_abilities_unlocked: Vec<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Stat line shared by class base stats and level-up bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub mp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub speed: i32,
}

impl StatLine {
    /// Stats used when a class has no base stat entry
    pub fn fallback_base() -> Self {
        StatLine {
            hp: 100,
            mp: 50,
            attack: 10,
            defense: 8,
            speed: 10,
        }
    }
}

/// One entry of the classes table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "StatLine::fallback_base")]
    pub base_stats: StatLine,
    #[serde(default)]
    pub level_up_bonuses: StatLine,
}

impl Default for ClassDef {
    fn default() -> Self {
        ClassDef {
            name: String::new(),
            description: String::new(),
            base_stats: StatLine::fallback_base(),
            level_up_bonuses: StatLine::default(),
        }
    }
}
