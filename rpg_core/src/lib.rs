//! rpg_core - Battle and progression engine for a text RPG
//!
//! This library provides:
//! - StatBlock: Character stats aggregated from base, gear and companion sources
//! - Character: Equipment, inventory, buffs, leveling and companions
//! - Battle: The round-by-round fight between the player and one foe
//! - MissionLog, EventBus: Mission tracking and lifecycle hooks
//! - GameSession: World navigation, shops and save files around it all

pub mod buff;
pub mod character;
pub mod combat;
pub mod config;
pub mod data;
pub mod encounter;
pub mod foe;
pub mod hooks;
pub mod mission;
pub mod prelude;
pub mod save;
pub mod session;
pub mod shop;
pub mod source;
pub mod stat_block;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export core types for convenience
pub use character::{Character, EquipError, LevelUp};
pub use combat::{Battle, BattleInput, BattleOutcome, BattleReport, PlayerAction};
pub use config::{default_constants, ConfigError, GameConstants};
pub use data::GameData;
pub use foe::{Boss, Enemy, Foe};
pub use hooks::{EventBus, EventKind, GameEvent, HookDecision, HookResponse};
pub use mission::{MissionLog, MissionTracker};
pub use session::{ExploreOutcome, GameSession, SessionError};
pub use stat_block::StatBlock;
pub use types::{EquipmentSlot, ItemType, Rank};
