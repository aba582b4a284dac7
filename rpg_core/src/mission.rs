//! Mission tracking
//!
//! Battles report kills and loot through [`MissionTracker`]; [`MissionLog`]
//! is the tracker the session owns and saves.

use crate::character::{Character, Inventory, LevelUp};
use crate::data::{GameData, MissionKind, MissionReward, TargetCount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// Receives progress events from battles
pub trait MissionTracker {
    /// Record `count` kills of an enemy or pickups of an item.
    ///
    /// Returns ids of missions completed by this update.
    fn update_mission_progress(&mut self, kind: MissionKind, target: &str, count: u32)
        -> Vec<String>;
}

/// Progress on one accepted mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionProgress {
    #[serde(rename = "type")]
    pub kind: MissionKind,
    /// Enemy name or item ids this mission counts
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub current_count: u32,
    #[serde(default)]
    pub target_count: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub current_counts: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub target_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub completed: bool,
}

impl MissionProgress {
    fn is_per_item(&self) -> bool {
        !self.target_counts.is_empty()
    }

    fn targets_met(&self) -> bool {
        if self.is_per_item() {
            self.target_counts
                .iter()
                .all(|(item, need)| self.current_counts.get(item).copied().unwrap_or(0) >= *need)
        } else {
            self.current_count >= self.target_count
        }
    }

    /// Progress line such as `2/3` or `herb 1/2, goblin_ear 1/1`
    pub fn describe(&self) -> String {
        if self.is_per_item() {
            self.target_counts
                .iter()
                .map(|(item, need)| {
                    let have = self.current_counts.get(item).copied().unwrap_or(0);
                    format!("{} {}/{}", item, have.min(*need), need)
                })
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            format!("{}/{}", self.current_count.min(self.target_count), self.target_count)
        }
    }

    /// Apply an event; true if it moved this mission to completed
    fn record(&mut self, kind: MissionKind, target: &str, count: u32) -> bool {
        if self.completed || self.kind != kind {
            return false;
        }
        let matched = match kind {
            MissionKind::Kill => self.targets.iter().any(|t| t.eq_ignore_ascii_case(target)),
            MissionKind::Collect if self.is_per_item() => {
                match self.current_counts.get_mut(target) {
                    Some(current) => {
                        *current += count;
                        self.completed = self.targets_met();
                        return self.completed;
                    }
                    None => false,
                }
            }
            MissionKind::Collect => self.targets.iter().any(|t| t == target),
        };
        if !matched {
            return false;
        }
        self.current_count += count;
        self.completed = self.targets_met();
        self.completed
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    #[error("unknown mission '{0}'")]
    Unknown(String),
    #[error("mission '{0}' is already accepted")]
    AlreadyAccepted(String),
    #[error("mission '{0}' was already finished")]
    AlreadyFinished(String),
    #[error("mission '{0}' is not accepted")]
    NotAccepted(String),
    #[error("mission '{0}' is not complete yet")]
    NotComplete(String),
}

/// Rewards handed out by a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedReward {
    pub mission_id: String,
    pub reward: MissionReward,
    pub level_ups: Vec<LevelUp>,
}

/// Accepted missions and their progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionLog {
    #[serde(default)]
    pub progress: BTreeMap<String, MissionProgress>,
    #[serde(default)]
    pub completed_missions: Vec<String>,
}

impl MissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, mission_id: &str, data: &GameData) -> Result<&MissionProgress, MissionError> {
        let mission = data
            .missions
            .get(mission_id)
            .ok_or_else(|| MissionError::Unknown(mission_id.to_string()))?;
        if self.progress.contains_key(mission_id) {
            return Err(MissionError::AlreadyAccepted(mission_id.to_string()));
        }
        if self.completed_missions.iter().any(|m| m == mission_id) {
            return Err(MissionError::AlreadyFinished(mission_id.to_string()));
        }

        let targets = mission.target.names().into_iter().map(str::to_string).collect();
        let progress = match (&mission.kind, &mission.target_count) {
            (MissionKind::Collect, TargetCount::PerItem(counts)) => MissionProgress {
                kind: mission.kind,
                targets,
                current_count: 0,
                target_count: 0,
                current_counts: counts.keys().map(|k| (k.clone(), 0)).collect(),
                target_counts: counts.clone(),
                completed: false,
            },
            (_, count) => MissionProgress {
                kind: mission.kind,
                targets,
                current_count: 0,
                target_count: match count {
                    TargetCount::Single(n) => *n,
                    TargetCount::PerItem(counts) => counts.values().sum(),
                },
                current_counts: BTreeMap::new(),
                target_counts: BTreeMap::new(),
                completed: false,
            },
        };

        info!(mission = %mission_id, "mission accepted");
        Ok(self.progress.entry(mission_id.to_string()).or_insert(progress))
    }

    /// Re-derive collect progress from what the inventory holds.
    ///
    /// Returns ids of missions completed by the sync.
    pub fn sync_collect_from_inventory(&mut self, inventory: &Inventory) -> Vec<String> {
        let mut completed = Vec::new();
        for (mission_id, progress) in self.progress.iter_mut() {
            if progress.completed || progress.kind != MissionKind::Collect {
                continue;
            }
            if progress.is_per_item() {
                for (item, current) in progress.current_counts.iter_mut() {
                    *current = inventory.count(item);
                }
            } else {
                progress.current_count = progress.targets.iter().map(|t| inventory.count(t)).sum();
            }
            if progress.targets_met() {
                progress.completed = true;
                completed.push(mission_id.clone());
            }
        }
        completed
    }

    /// Accepted missions ready to claim
    pub fn claimable(&self) -> Vec<&str> {
        self.progress
            .iter()
            .filter(|(_, p)| p.completed)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Hand out a completed mission's rewards and retire it
    pub fn claim(
        &mut self,
        mission_id: &str,
        player: &mut Character,
        data: &GameData,
    ) -> Result<ClaimedReward, MissionError> {
        let mission = data
            .missions
            .get(mission_id)
            .ok_or_else(|| MissionError::Unknown(mission_id.to_string()))?;
        let progress = self
            .progress
            .get(mission_id)
            .ok_or_else(|| MissionError::NotAccepted(mission_id.to_string()))?;
        if !progress.completed {
            return Err(MissionError::NotComplete(mission_id.to_string()));
        }

        let reward = mission.reward.clone();
        let level_ups = player.gain_experience(reward.experience);
        player.gold = player.gold.saturating_add(reward.gold);
        for item in &reward.items {
            player.inventory.add(item.clone());
        }

        self.progress.remove(mission_id);
        self.completed_missions.push(mission_id.to_string());
        info!(mission = %mission_id, experience = reward.experience, gold = reward.gold, "mission rewards claimed");

        Ok(ClaimedReward {
            mission_id: mission_id.to_string(),
            reward,
            level_ups,
        })
    }
}

impl MissionTracker for MissionLog {
    fn update_mission_progress(
        &mut self,
        kind: MissionKind,
        target: &str,
        count: u32,
    ) -> Vec<String> {
        let mut completed = Vec::new();
        for (mission_id, progress) in self.progress.iter_mut() {
            if progress.record(kind, target, count) {
                info!(mission = %mission_id, "mission complete");
                completed.push(mission_id.clone());
            }
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_data, warrior};

    #[test]
    fn test_kill_progress_is_case_insensitive() {
        let data = sample_data();
        let mut log = MissionLog::new();
        log.accept("goblin_trouble", &data).unwrap();

        assert!(log.update_mission_progress(MissionKind::Kill, "goblin", 1).is_empty());
        assert!(log.update_mission_progress(MissionKind::Kill, "GOBLIN", 1).is_empty());
        assert!(log.update_mission_progress(MissionKind::Kill, "Wolf", 1).is_empty());
        assert_eq!(
            log.update_mission_progress(MissionKind::Kill, "Goblin", 1),
            vec!["goblin_trouble".to_string()]
        );
        assert_eq!(log.claimable(), vec!["goblin_trouble"]);
    }

    #[test]
    fn test_collect_is_exact_match() {
        let data = sample_data();
        let mut log = MissionLog::new();
        log.accept("wolf_pelts", &data).unwrap();

        log.update_mission_progress(MissionKind::Collect, "Wolf_Pelt", 1);
        assert_eq!(log.progress["wolf_pelts"].current_count, 0);
        log.update_mission_progress(MissionKind::Collect, "wolf_pelt", 2);
        assert!(log.progress["wolf_pelts"].completed);
    }

    #[test]
    fn test_multi_item_collect() {
        let data = sample_data();
        let mut log = MissionLog::new();
        log.accept("herbalist", &data).unwrap();

        log.update_mission_progress(MissionKind::Collect, "herb", 2);
        assert!(!log.progress["herbalist"].completed);
        assert_eq!(log.progress["herbalist"].describe(), "goblin_ear 0/1, herb 2/2");
        let done = log.update_mission_progress(MissionKind::Collect, "goblin_ear", 1);
        assert_eq!(done, vec!["herbalist".to_string()]);
    }

    #[test]
    fn test_sync_from_inventory() {
        let data = sample_data();
        let mut log = MissionLog::new();
        log.accept("herbalist", &data).unwrap();
        let inv = Inventory::from(vec![
            "herb".to_string(),
            "goblin_ear".to_string(),
            "herb".to_string(),
        ]);

        assert_eq!(log.sync_collect_from_inventory(&inv), vec!["herbalist".to_string()]);
    }

    #[test]
    fn test_accept_refusals() {
        let data = sample_data();
        let mut log = MissionLog::new();
        assert_eq!(
            log.accept("nope", &data).unwrap_err(),
            MissionError::Unknown("nope".to_string())
        );
        log.accept("goblin_trouble", &data).unwrap();
        assert_eq!(
            log.accept("goblin_trouble", &data).unwrap_err(),
            MissionError::AlreadyAccepted("goblin_trouble".to_string())
        );
    }

    #[test]
    fn test_claim_grants_and_retires() {
        let data = sample_data();
        let mut hero = warrior(&data);
        let mut log = MissionLog::new();
        log.accept("wolf_pelts", &data).unwrap();

        assert_eq!(
            log.claim("wolf_pelts", &mut hero, &data).unwrap_err(),
            MissionError::NotComplete("wolf_pelts".to_string())
        );

        log.update_mission_progress(MissionKind::Collect, "wolf_pelt", 2);
        let claimed = log.claim("wolf_pelts", &mut hero, &data).unwrap();
        assert_eq!(claimed.reward.gold, 30);
        assert_eq!(hero.gold, 130);
        assert_eq!(hero.experience, 40);
        assert!(hero.inventory.contains("health_potion"));
        assert!(log.progress.is_empty());
        assert_eq!(log.completed_missions, vec!["wolf_pelts".to_string()]);
        assert_eq!(
            log.accept("wolf_pelts", &data).unwrap_err(),
            MissionError::AlreadyFinished("wolf_pelts".to_string())
        );
    }
}
