//! Game balance constants

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub battle: BattleConstants,
    #[serde(default)]
    pub encounter: EncounterConstants,
    #[serde(default)]
    pub progression: ProgressionConstants,
    #[serde(default)]
    pub paths: PathConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConstants {
    /// Flee chance when the player is strictly faster than the enemy
    #[serde(default = "default_flee_chance_faster")]
    pub flee_chance_faster: f64,
    /// Flee chance otherwise
    #[serde(default = "default_flee_chance_slower")]
    pub flee_chance_slower: f64,
    /// Chance a boss uses one of its eligible abilities instead of attacking
    #[serde(default = "default_boss_ability_chance")]
    pub boss_ability_chance: f64,
    /// Per-round chance a companion acts, unless the companion overrides it
    #[serde(default = "default_companion_action_chance")]
    pub companion_action_chance: f64,
    /// Share of the player's effective attack a companion strike carries
    #[serde(default = "default_companion_attack_ratio")]
    pub companion_attack_ratio: f64,
    /// Share of summed companion defense healed back after an enemy hit
    #[serde(default = "default_companion_mitigation_ratio")]
    pub companion_mitigation_ratio: f64,
    #[serde(default = "default_loot_drop_chance")]
    pub loot_drop_chance: f64,
}

impl Default for BattleConstants {
    fn default() -> Self {
        BattleConstants {
            flee_chance_faster: 0.7,
            flee_chance_slower: 0.4,
            boss_ability_chance: 0.4,
            companion_action_chance: 0.5,
            companion_attack_ratio: 0.6,
            companion_mitigation_ratio: 0.5,
            loot_drop_chance: 0.5,
        }
    }
}

fn default_flee_chance_faster() -> f64 {
    0.7
}
fn default_flee_chance_slower() -> f64 {
    0.4
}
fn default_boss_ability_chance() -> f64 {
    0.4
}
fn default_companion_action_chance() -> f64 {
    0.5
}
fn default_companion_attack_ratio() -> f64 {
    0.6
}
fn default_companion_mitigation_ratio() -> f64 {
    0.5
}
fn default_loot_drop_chance() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConstants {
    /// Chance that exploring starts a fight
    #[serde(default = "default_explore_encounter_chance")]
    pub explore_encounter_chance: f64,
    /// Chance that arriving in a new area starts a fight
    #[serde(default = "default_travel_encounter_chance")]
    pub travel_encounter_chance: f64,
    /// Chance a random encounter rolls for a boss when the area has any
    #[serde(default = "default_boss_encounter_chance")]
    pub boss_encounter_chance: f64,
    /// Seconds before a killed boss can spawn again
    #[serde(default = "default_boss_respawn_seconds")]
    pub boss_respawn_seconds: i64,
    /// Chance of finding gold on a quiet exploration
    #[serde(default = "default_gold_find_chance")]
    pub gold_find_chance: f64,
    #[serde(default = "default_gold_find_min")]
    pub gold_find_min: u32,
    #[serde(default = "default_gold_find_max")]
    pub gold_find_max: u32,
}

impl Default for EncounterConstants {
    fn default() -> Self {
        EncounterConstants {
            explore_encounter_chance: 0.7,
            travel_encounter_chance: 0.3,
            boss_encounter_chance: 0.8,
            boss_respawn_seconds: 28_800,
            gold_find_chance: 0.3,
            gold_find_min: 5,
            gold_find_max: 20,
        }
    }
}

fn default_explore_encounter_chance() -> f64 {
    0.7
}
fn default_travel_encounter_chance() -> f64 {
    0.3
}
fn default_boss_encounter_chance() -> f64 {
    0.8
}
fn default_boss_respawn_seconds() -> i64 {
    28_800
}
fn default_gold_find_chance() -> f64 {
    0.3
}
fn default_gold_find_min() -> u32 {
    5
}
fn default_gold_find_max() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConstants {
    /// Area new characters start in and defeated characters return to
    #[serde(default = "default_starting_area")]
    pub starting_area: String,
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,
    #[serde(default = "default_first_level_threshold")]
    pub first_level_threshold: u32,
    #[serde(default = "default_max_companions")]
    pub max_companions: usize,
}

impl Default for ProgressionConstants {
    fn default() -> Self {
        ProgressionConstants {
            starting_area: default_starting_area(),
            starting_gold: 100,
            first_level_threshold: 100,
            max_companions: 4,
        }
    }
}

fn default_starting_area() -> String {
    "starting_village".to_string()
}
fn default_starting_gold() -> u32 {
    100
}
fn default_first_level_threshold() -> u32 {
    100
}
fn default_max_companions() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConstants {
    /// Directory holding the JSON data tables; the embedded tables are used when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_saves_dir")]
    pub saves_dir: PathBuf,
}

impl Default for PathConstants {
    fn default() -> Self {
        PathConstants {
            data_dir: None,
            saves_dir: default_saves_dir(),
        }
    }
}

fn default_saves_dir() -> PathBuf {
    PathBuf::from("data/saves")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.battle.flee_chance_faster - 0.7).abs() < f64::EPSILON);
        assert!((constants.battle.boss_ability_chance - 0.4).abs() < f64::EPSILON);
        assert_eq!(constants.encounter.boss_respawn_seconds, 28_800);
        assert_eq!(constants.progression.starting_area, "starting_village");
        assert_eq!(constants.progression.max_companions, 4);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[battle]
flee_chance_faster = 0.9

[progression]
starting_gold = 250
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.battle.flee_chance_faster - 0.9).abs() < f64::EPSILON);
        assert!((constants.battle.flee_chance_slower - 0.4).abs() < f64::EPSILON);
        assert_eq!(constants.progression.starting_gold, 250);
        assert_eq!(constants.progression.first_level_threshold, 100);
        assert!((constants.encounter.explore_encounter_chance - 0.7).abs() < f64::EPSILON);
    }
}
