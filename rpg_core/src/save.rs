//! Save files - One pretty-printed JSON document per save
//!
//! Filenames embed the player's name, uuid prefix, timestamp, class and level.
//! Loading re-validates equipment and recomputes stats, so a save written
//! against older data still yields a consistent character.

use crate::buff::ActiveBuffs;
use crate::character::{Character, CompanionRecord, Equipment, Inventory, UnequipNotice};
use crate::data::{ClassDef, GameData};
use crate::mission::{MissionLog, MissionProgress};
use crate::stat_block::{BaseStats, StatBlock};
use crate::types::Rank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const SAVE_VERSION: &str = "3.1";

/// Prefix marking saves written after an unexpected fault
pub const EMERGENCY_PREFIX: &str = "err_save_unstable_";

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The player as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub uuid: Uuid,
    pub character_class: String,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub rank: Rank,
    pub hp: i32,
    pub mp: i32,
    /// Derived stats at save time; informational, rebuilt on load
    #[serde(default)]
    pub max_hp: i32,
    #[serde(default)]
    pub max_mp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub speed: i32,
    pub base_stats: BaseStats,
    pub class_data: ClassDef,
    pub gold: u32,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub companions: Vec<CompanionRecord>,
    #[serde(default)]
    pub active_buffs: ActiveBuffs,
    #[serde(default)]
    pub bosses_killed: BTreeMap<String, DateTime<Utc>>,
}

impl PlayerSnapshot {
    pub fn capture(player: &Character) -> Self {
        PlayerSnapshot {
            name: player.name.clone(),
            uuid: player.uuid,
            character_class: player.class_id.clone(),
            level: player.level,
            experience: player.experience,
            experience_to_next: player.experience_to_next,
            rank: player.rank,
            hp: player.hp,
            mp: player.mp,
            max_hp: player.stats.max_hp,
            max_mp: player.stats.max_mp,
            attack: player.stats.attack,
            defense: player.stats.defense,
            speed: player.stats.speed,
            base_stats: player.base,
            class_data: player.class_data.clone(),
            gold: player.gold,
            inventory: player.inventory.clone(),
            equipment: player.equipment.clone(),
            companions: player.companions.iter().cloned().map(CompanionRecord::from).collect(),
            active_buffs: player.active_buffs.clone(),
            bosses_killed: player.bosses_killed.clone(),
        }
    }

    /// Rebuild the character, dropping equipment that no longer validates
    pub fn restore(self, data: &GameData) -> (Character, Vec<UnequipNotice>) {
        let mut player = Character {
            name: self.name,
            uuid: self.uuid,
            class_id: self.character_class,
            class_data: self.class_data,
            level: self.level.max(1),
            experience: self.experience,
            experience_to_next: self.experience_to_next.max(1),
            rank: Rank::for_level(self.level.max(1)),
            base: self.base_stats,
            stats: StatBlock::default(),
            hp: self.hp,
            mp: self.mp,
            gold: self.gold,
            inventory: self.inventory,
            equipment: self.equipment,
            companions: self
                .companions
                .into_iter()
                .map(|record| record.normalize(data))
                .collect(),
            active_buffs: self.active_buffs,
            bosses_killed: self.bosses_killed,
            defending: false,
        };
        // Also recomputes and clamps hp and mp
        let notices = player.validate_equipment(data);
        (player, notices)
    }
}

/// One save file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    pub player: PlayerSnapshot,
    pub current_area: String,
    #[serde(default)]
    pub visited_areas: Vec<String>,
    #[serde(default)]
    pub mission_progress: BTreeMap<String, MissionProgress>,
    #[serde(default)]
    pub completed_missions: Vec<String>,
    pub save_version: String,
    pub save_time: DateTime<Utc>,
    #[serde(default)]
    pub bosses_killed: BTreeMap<String, DateTime<Utc>>,
}

/// A game rebuilt from a save
#[derive(Debug)]
pub struct LoadedGame {
    pub player: Character,
    pub current_area: String,
    pub visited_areas: Vec<String>,
    pub missions: MissionLog,
    /// Items unequipped because they failed validation
    pub notices: Vec<UnequipNotice>,
}

impl SaveRecord {
    pub fn capture(
        player: &Character,
        current_area: &str,
        visited_areas: &[String],
        missions: &MissionLog,
        now: DateTime<Utc>,
    ) -> Self {
        SaveRecord {
            player: PlayerSnapshot::capture(player),
            current_area: current_area.to_string(),
            visited_areas: visited_areas.to_vec(),
            mission_progress: missions.progress.clone(),
            completed_missions: missions.completed_missions.clone(),
            save_version: SAVE_VERSION.to_string(),
            save_time: now,
            bosses_killed: player.bosses_killed.clone(),
        }
    }

    pub fn restore(self, data: &GameData, fallback_area: &str) -> LoadedGame {
        if self.save_version != SAVE_VERSION {
            warn!(version = %self.save_version, "loading save from a different version");
        }

        let (mut player, notices) = self.player.restore(data);
        // Older saves only kept the kill map at the top level
        for (boss, killed_at) in self.bosses_killed {
            player.bosses_killed.entry(boss).or_insert(killed_at);
        }

        let current_area = if data.areas.contains_key(&self.current_area) {
            self.current_area
        } else {
            warn!(area = %self.current_area, fallback = %fallback_area, "saved area no longer exists");
            fallback_area.to_string()
        };

        LoadedGame {
            player,
            current_area,
            visited_areas: self.visited_areas,
            missions: MissionLog {
                progress: self.mission_progress,
                completed_missions: self.completed_missions,
            },
            notices,
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// `{prefix}{name}_{uuid8}_save_{timestamp}_{class}_{level}.json`
fn compose_file_name(
    prefix: &str,
    name: &str,
    uuid: &Uuid,
    time: DateTime<Utc>,
    class_id: &str,
    level: u32,
) -> String {
    let uuid: String = uuid.to_string().chars().take(8).collect();
    format!(
        "{}{}_{}_save_{}_{}_{}.json",
        sanitize(prefix),
        sanitize(name),
        uuid,
        time.format("%Y-%m-%d_%H-%M-%S"),
        sanitize(class_id),
        level
    )
}

pub fn save_file_name(prefix: &str, player: &Character, now: DateTime<Utc>) -> String {
    compose_file_name(prefix, &player.name, &player.uuid, now, &player.class_id, player.level)
}

/// Write a save into `dir`, creating it if needed
pub fn write_save(dir: &Path, prefix: &str, record: &SaveRecord) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(dir)?;
    let snapshot = &record.player;
    let path = dir.join(compose_file_name(
        prefix,
        &snapshot.name,
        &snapshot.uuid,
        record.save_time,
        &snapshot.character_class,
        snapshot.level,
    ));
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "game saved");
    Ok(path)
}

pub fn read_save(path: &Path) -> Result<SaveRecord, SaveError> {
    let content = fs::read_to_string(path)?;
    let record: SaveRecord = serde_json::from_str(&content)?;
    info!(path = %path.display(), player = %record.player.name, "save read");
    Ok(record)
}

/// Save files in `dir`, sorted by name; a missing directory has none
pub fn list_saves(dir: &Path) -> Result<Vec<PathBuf>, SaveError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut saves: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    saves.sort();
    Ok(saves)
}

/// Write the diagnostic log that goes with an emergency save
pub fn write_error_log(
    dir: &Path,
    player_name: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "{}{}_error_{}.log",
        EMERGENCY_PREFIX,
        sanitize(player_name),
        now.format("%Y-%m-%d_%H-%M-%S")
    ));
    let body = format!(
        "time: {}\nplayer: {}\nversion: {}\n\n{}\n",
        now.to_rfc3339(),
        player_name,
        SAVE_VERSION,
        message
    );
    fs::write(&path, body)?;
    warn!(path = %path.display(), "error log written");
    Ok(path)
}
