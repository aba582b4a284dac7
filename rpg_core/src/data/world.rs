//! Area and mission records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the areas table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub possible_enemies: Vec<String>,
    #[serde(default)]
    pub possible_bosses: Vec<String>,
    /// Area ids reachable from here
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default)]
    pub can_rest: bool,
    #[serde(default)]
    pub rest_cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    Kill,
    Collect,
}

/// Target amount for a mission: a single count, or one count per item for multi-item collects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetCount {
    Single(u32),
    PerItem(BTreeMap<String, u32>),
}

impl Default for TargetCount {
    fn default() -> Self {
        TargetCount::Single(1)
    }
}

/// What a target field names: one enemy or item, or several items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissionTarget {
    One(String),
    Many(Vec<String>),
}

impl MissionTarget {
    pub fn names(&self) -> Vec<&str> {
        match self {
            MissionTarget::One(name) => vec![name.as_str()],
            MissionTarget::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// One entry of the missions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MissionKind,
    pub target: MissionTarget,
    #[serde(default)]
    pub target_count: TargetCount,
    #[serde(default)]
    pub reward: MissionReward,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionReward {
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub items: Vec<String>,
}
