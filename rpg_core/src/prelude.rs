//! Prelude module for convenient imports
//!
//! ```rust
//! use rpg_core::prelude::*;
//! ```

// Core types
pub use crate::character::{Character, Companion, Inventory};
pub use crate::stat_block::{BaseStats, EffectiveStats, StatBlock};
pub use crate::types::{EquipmentSlot, ItemType, Rank};

// Battle
pub use crate::combat::{
    Battle, BattleEvent, BattleInput, BattleOutcome, BattleReport, PlayerAction, ScriptedInput,
    TurnView,
};
pub use crate::foe::{Boss, Enemy, Foe};

// World
pub use crate::data::GameData;
pub use crate::encounter::Encounter;
pub use crate::hooks::{EventBus, EventKind, GameEvent, HookResponse};
pub use crate::mission::{MissionLog, MissionTracker};
pub use crate::session::{ExploreOutcome, GameSession, SessionError, TravelOutcome};

// Sources
pub use crate::source::StatSource;

// Config
pub use crate::config::{default_constants, GameConstants};
