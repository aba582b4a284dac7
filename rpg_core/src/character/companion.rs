//! Hired companions and the tavern rules

use crate::character::Character;
use crate::config::{ProgressionConstants, MAX_PARTY_SIZE};
use crate::data::{CompanionDef, GameData, Table};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// A companion in the player's party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Carried for display only; never feeds the player's stats
    #[serde(default)]
    pub equipment: CompanionEquipment,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionEquipment {
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub accessory: Option<String>,
}

/// Companion entry as found in save files.
///
/// Older saves list companions by bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompanionRecord {
    Full(Companion),
    Name(String),
}

impl CompanionRecord {
    /// Resolve into a full companion, looking bare names up in the table
    pub fn normalize(self, data: &GameData) -> Companion {
        match self {
            CompanionRecord::Full(companion) => companion,
            CompanionRecord::Name(name) => {
                let (id, display) = match data.companion(&name) {
                    Some((id, def)) => (id.to_string(), def.name.clone()),
                    None => (name.clone(), name),
                };
                Companion {
                    id,
                    name: display,
                    level: 1,
                    equipment: CompanionEquipment::default(),
                }
            }
        }
    }
}

impl From<Companion> for CompanionRecord {
    fn from(companion: Companion) -> Self {
        CompanionRecord::Full(companion)
    }
}

/// Find a companion's table entry by id, then by display name
pub(crate) fn lookup<'a>(
    table: &'a Table<CompanionDef>,
    companion: &Companion,
) -> Option<(&'a str, &'a CompanionDef)> {
    if let Some((id, def)) = table.get_key_value(&companion.id) {
        return Some((id.as_str(), def));
    }
    table
        .iter()
        .find(|(_, def)| def.name == companion.name)
        .map(|(id, def)| (id.as_str(), def))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompanionError {
    #[error("unknown companion '{0}'")]
    Unknown(String),
    #[error("party is full ({max} companions)")]
    PartyFull { max: usize },
    #[error("hiring costs {price} gold, you have {gold}")]
    InsufficientGold { price: u32, gold: u32 },
    #[error("no companion at position {0}")]
    NoSuchCompanion(usize),
}

impl Character {
    /// Hire a companion from the tavern
    pub fn hire_companion(
        &mut self,
        companion_id: &str,
        data: &GameData,
        progression: &ProgressionConstants,
    ) -> Result<&Companion, CompanionError> {
        let (id, def) = data
            .companion(companion_id)
            .ok_or_else(|| CompanionError::Unknown(companion_id.to_string()))?;

        let max = progression.max_companions.min(MAX_PARTY_SIZE);
        if self.companions.len() >= max {
            return Err(CompanionError::PartyFull { max });
        }
        if self.gold < def.price {
            return Err(CompanionError::InsufficientGold {
                price: def.price,
                gold: self.gold,
            });
        }

        self.gold -= def.price;
        self.companions.push(Companion {
            id: id.to_string(),
            name: def.name.clone(),
            level: 1,
            equipment: CompanionEquipment::default(),
        });
        info!(companion = %def.name, price = def.price, "{} hired a companion", self.name);
        self.recompute_stats(data);

        self.companions
            .last()
            .ok_or_else(|| CompanionError::Unknown(companion_id.to_string()))
    }

    /// Dismiss the companion at `index`
    pub fn dismiss_companion(
        &mut self,
        index: usize,
        data: &GameData,
    ) -> Result<Companion, CompanionError> {
        if index >= self.companions.len() {
            return Err(CompanionError::NoSuchCompanion(index));
        }
        let companion = self.companions.remove(index);
        info!(companion = %companion.name, "{} dismissed a companion", self.name);
        self.recompute_stats(data);
        Ok(companion)
    }
}
