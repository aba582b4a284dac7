//! Experience and level-ups

use crate::character::Character;
use crate::types::Rank;
use tracing::info;

/// Growth applied to the experience threshold on every level-up
const THRESHOLD_GROWTH: f64 = 1.5;

/// One level gained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub rank: Rank,
    pub rank_changed: bool,
}

/// Threshold for the next level after reaching one with `threshold`.
///
/// Always strictly larger than `threshold` (saturating at `u32::MAX`).
pub fn experience_threshold_after(threshold: u32) -> u32 {
    let grown = (threshold as f64 * THRESHOLD_GROWTH).floor() as u32;
    grown.max(threshold.saturating_add(1))
}

impl Character {
    /// Add experience, levelling up as many times as it covers
    pub fn gain_experience(&mut self, amount: u32) -> Vec<LevelUp> {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = Vec::new();
        while self.experience >= self.experience_to_next {
            gained.push(self.level_up());
        }
        gained
    }

    /// Raise the level by one.
    ///
    /// Class bonuses go into both the stored base and the derived block so no
    /// table lookup is needed; a later rebuild gives the same numbers.
    fn level_up(&mut self) -> LevelUp {
        let previous_rank = self.rank;

        self.experience -= self.experience_to_next;
        self.level += 1;
        self.experience_to_next = experience_threshold_after(self.experience_to_next);

        let bonus = self.class_data.level_up_bonuses;
        self.base.add(&bonus);
        self.stats.add_bonus(&bonus);
        self.restore_full();

        self.rank = Rank::for_level(self.level);
        info!(level = self.level, rank = %self.rank, "{} reached a new level", self.name);

        LevelUp {
            level: self.level,
            rank: self.rank,
            rank_changed: self.rank != previous_rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_data, warrior};

    #[test]
    fn test_threshold_growth() {
        assert_eq!(experience_threshold_after(100), 150);
        assert_eq!(experience_threshold_after(150), 225);
        assert_eq!(experience_threshold_after(225), 337);
        assert_eq!(experience_threshold_after(1), 2);
        assert_eq!(experience_threshold_after(0), 1);
    }

    #[test]
    fn test_single_level_up() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.hp = 5;
        let attack = hero.effective_attack();

        let gained = hero.gain_experience(120);
        assert_eq!(gained.len(), 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 20);
        assert_eq!(hero.experience_to_next, 150);
        assert_eq!(hero.effective_attack(), attack + 3);
        assert_eq!(hero.hp, hero.effective_max_hp());
        assert_eq!(hero.mp, hero.effective_max_mp());
    }

    #[test]
    fn test_multi_level_and_rank() {
        let data = sample_data();
        let mut hero = warrior(&data);

        // 100 + 150 + 225 + 337 = 812 reaches level 5
        let gained = hero.gain_experience(812);
        assert_eq!(hero.level, 5);
        assert_eq!(hero.experience, 0);
        assert_eq!(gained.last().map(|l| l.rank), Some(Rank::Adept));
        assert!(gained.last().map(|l| l.rank_changed).unwrap_or(false));
    }

    #[test]
    fn test_level_up_matches_rebuild() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.equip("rusty_sword", &data, None).unwrap();
        hero.gain_experience(300);

        let stats = hero.stats;
        hero.recompute_stats(&data);
        assert_eq!(hero.stats, stats);
    }
}
