//! Static game data tables
//!
//! Every table is a JSON object keyed by id. Tables are loaded once, checked
//! for dangling references, and then only read.

mod actors;
mod companions;
mod items;
mod magic;
mod world;

pub use actors::{BossAbility, BossDef, BossPhase, ClassDef, EnemyDef, StatLine};
pub use companions::{AbilityChance, CompanionAbility, CompanionAbilityKind, CompanionDef};
pub use items::{ConsumableEffect, ItemDef, Requirements};
pub use magic::{EffectDef, SpellDef, SpellKind};
pub use world::{AreaDef, MissionDef, MissionKind, MissionReward, MissionTarget, TargetCount};

use crate::config::{load_json, ConfigError};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

pub type Table<T> = BTreeMap<String, T>;

/// All lookup tables the engine reads
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub items: Table<ItemDef>,
    pub enemies: Table<EnemyDef>,
    pub areas: Table<AreaDef>,
    pub missions: Table<MissionDef>,
    pub bosses: Table<BossDef>,
    pub classes: Table<ClassDef>,
    pub spells: Table<SpellDef>,
    pub effects: Table<EffectDef>,
    pub companions: Table<CompanionDef>,
}

impl GameData {
    /// Load every table from `dir`.
    ///
    /// Items, enemies, areas and classes are required; the other tables are
    /// empty when their file is missing.
    pub fn load_from_dir(dir: &Path) -> Result<GameData, ConfigError> {
        let data = GameData {
            items: load_json(&dir.join("items.json"))?,
            enemies: load_json(&dir.join("enemies.json"))?,
            areas: load_json(&dir.join("areas.json"))?,
            classes: load_json(&dir.join("classes.json"))?,
            missions: load_optional(dir, "missions.json")?,
            bosses: load_optional(dir, "bosses.json")?,
            spells: load_optional(dir, "spells.json")?,
            effects: load_optional(dir, "effects.json")?,
            companions: load_optional(dir, "companions.json")?,
        };
        data.validate()?;
        debug!(
            items = data.items.len(),
            enemies = data.enemies.len(),
            areas = data.areas.len(),
            "loaded game data from {}",
            dir.display()
        );
        Ok(data)
    }

    /// The tables bundled with the crate
    pub fn builtin() -> Result<GameData, ConfigError> {
        let data = GameData {
            items: serde_json::from_str(include_str!("../../data/items.json"))?,
            enemies: serde_json::from_str(include_str!("../../data/enemies.json"))?,
            areas: serde_json::from_str(include_str!("../../data/areas.json"))?,
            classes: serde_json::from_str(include_str!("../../data/classes.json"))?,
            missions: serde_json::from_str(include_str!("../../data/missions.json"))?,
            bosses: serde_json::from_str(include_str!("../../data/bosses.json"))?,
            spells: serde_json::from_str(include_str!("../../data/spells.json"))?,
            effects: serde_json::from_str(include_str!("../../data/effects.json"))?,
            companions: serde_json::from_str(include_str!("../../data/companions.json"))?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Check cross-table references.
    ///
    /// Areas must only name known enemies, bosses and areas. Loose references
    /// elsewhere (loot tables, spell effects, mission rewards) are logged and
    /// skipped at use time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (area_id, area) in &self.areas {
            for enemy in &area.possible_enemies {
                if !self.enemies.contains_key(enemy) {
                    return Err(dangling("area", area_id, "enemy", enemy));
                }
            }
            for boss in &area.possible_bosses {
                if !self.bosses.contains_key(boss) {
                    return Err(dangling("area", area_id, "boss", boss));
                }
            }
            for next in &area.connections {
                if !self.areas.contains_key(next) {
                    return Err(dangling("area", area_id, "connection", next));
                }
            }
        }

        for (boss_id, boss) in &self.bosses {
            for phase in &boss.phases {
                if !(0.0..=1.0).contains(&phase.hp_threshold) {
                    return Err(ConfigError::ValidationError(format!(
                        "boss '{}' has a phase threshold outside 0..=1",
                        boss_id
                    )));
                }
            }
        }

        let loot = self
            .enemies
            .iter()
            .flat_map(|(id, e)| e.loot_table.iter().map(move |item| (id, item)))
            .chain(
                self.bosses
                    .iter()
                    .flat_map(|(id, b)| b.base.loot_table.iter().map(move |item| (id, item))),
            );
        for (owner, item) in loot {
            if !self.items.contains_key(item) {
                warn!(owner = %owner, item = %item, "loot table references unknown item");
            }
        }

        for (spell_id, spell) in &self.spells {
            for effect in &spell.effects {
                if !self.effects.contains_key(effect) {
                    warn!(spell = %spell_id, effect = %effect, "spell references unknown effect");
                }
            }
        }

        Ok(())
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    pub fn area(&self, id: &str) -> Option<&AreaDef> {
        self.areas.get(id)
    }

    /// Find a companion by id, falling back to its display name
    pub fn companion(&self, id_or_name: &str) -> Option<(&str, &CompanionDef)> {
        if let Some((id, def)) = self.companions.get_key_value(id_or_name) {
            return Some((id.as_str(), def));
        }
        self.companions
            .iter()
            .find(|(_, def)| def.name == id_or_name)
            .map(|(id, def)| (id.as_str(), def))
    }

    /// Display name for an item id, or the id itself when unknown
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.items.get(id).map(|i| i.name.as_str()).unwrap_or(id)
    }
}

fn load_optional<T: DeserializeOwned + Default>(dir: &Path, file: &str) -> Result<T, ConfigError> {
    let path = dir.join(file);
    if path.exists() {
        load_json(&path)
    } else {
        debug!("optional data file {} not found", path.display());
        Ok(T::default())
    }
}

fn dangling(kind: &str, id: &str, field: &str, target: &str) -> ConfigError {
    ConfigError::ValidationError(format!(
        "{} '{}' references unknown {} '{}'",
        kind, id, field, target
    ))
}
