//! Configuration loading from TOML and JSON files

mod constants;

pub use constants::{
    BattleConstants, EncounterConstants, GameConstants, PathConstants, ProgressionConstants,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load a JSON file and deserialize it
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: T = serde_json::from_str(&content)?;
    Ok(value)
}

/// Load balance constants from a TOML file
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = load_toml(path)?;
    validate_constants(&constants)?;
    Ok(constants)
}

/// Get the default balance constants
pub fn default_constants() -> GameConstants {
    let toml = include_str!("../../config/balance.toml");
    parse_toml(toml).unwrap_or_default()
}

/// Hard cap on hired companions
pub const MAX_PARTY_SIZE: usize = 4;

/// Smallest first threshold that still grows under the x1.5 rule
const MIN_FIRST_LEVEL_THRESHOLD: u32 = 2;

fn validate_constants(constants: &GameConstants) -> Result<(), ConfigError> {
    let chances = [
        ("battle.flee_chance_faster", constants.battle.flee_chance_faster),
        ("battle.flee_chance_slower", constants.battle.flee_chance_slower),
        ("battle.boss_ability_chance", constants.battle.boss_ability_chance),
        ("battle.companion_action_chance", constants.battle.companion_action_chance),
        ("battle.loot_drop_chance", constants.battle.loot_drop_chance),
        ("encounter.explore_encounter_chance", constants.encounter.explore_encounter_chance),
        ("encounter.travel_encounter_chance", constants.encounter.travel_encounter_chance),
        ("encounter.boss_encounter_chance", constants.encounter.boss_encounter_chance),
        ("encounter.gold_find_chance", constants.encounter.gold_find_chance),
    ];
    for (name, value) in chances {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be within 0..=1, got {}",
                name, value
            )));
        }
    }
    if constants.progression.first_level_threshold < MIN_FIRST_LEVEL_THRESHOLD {
        return Err(ConfigError::ValidationError(format!(
            "progression.first_level_threshold must be at least {}, got {}",
            MIN_FIRST_LEVEL_THRESHOLD, constants.progression.first_level_threshold
        )));
    }
    if !(1..=MAX_PARTY_SIZE).contains(&constants.progression.max_companions) {
        return Err(ConfigError::ValidationError(format!(
            "progression.max_companions must be within 1..={}, got {}",
            MAX_PARTY_SIZE, constants.progression.max_companions
        )));
    }
    if constants.encounter.gold_find_min > constants.encounter.gold_find_max {
        return Err(ConfigError::ValidationError(
            "encounter.gold_find_min exceeds gold_find_max".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_balance_parses() {
        let toml = include_str!("../../config/balance.toml");
        let constants: GameConstants = parse_toml(toml).unwrap();
        assert!(validate_constants(&constants).is_ok());
        assert_eq!(constants.progression.starting_area, "starting_village");
    }

    #[test]
    fn test_out_of_range_chance_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[battle]\nloot_drop_chance = 1.5").unwrap();

        let err = load_constants(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_party_size_capped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[progression]\nmax_companions = 9").unwrap();
        let err = load_constants(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("max_companions")));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[progression]\nmax_companions = 0").unwrap();
        assert!(matches!(load_constants(file.path()), Err(ConfigError::ValidationError(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[progression]\nmax_companions = 2").unwrap();
        assert_eq!(load_constants(file.path()).unwrap().progression.max_companions, 2);
    }

    #[test]
    fn test_first_threshold_must_grow() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[progression]\nfirst_level_threshold = 1").unwrap();
        let err = load_constants(file.path()).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("first_level_threshold"))
        );
    }
}
