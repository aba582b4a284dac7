//! Random encounters and the boss respawn cooldown

use crate::character::Character;
use crate::config::EncounterConstants;
use crate::data::{AreaDef, GameData};
use crate::foe::{Boss, Enemy, Foe};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// What an area throws at the player; ids refer to the enemies or bosses table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encounter {
    Enemy(String),
    Boss(String),
}

impl Encounter {
    /// Build a fresh foe for the encounter
    pub fn spawn(&self, data: &GameData) -> Option<Foe> {
        match self {
            Encounter::Enemy(id) => data.enemies.get(id).map(|def| Foe::from(Enemy::from_def(def))),
            Encounter::Boss(id) => data.bosses.get(id).map(|def| Foe::from(Boss::from_def(def))),
        }
    }
}

/// Whether a boss may spawn: never killed, or the respawn time has passed
pub fn boss_available(
    player: &Character,
    boss_name: &str,
    now: DateTime<Utc>,
    respawn_seconds: i64,
) -> bool {
    match player.bosses_killed.get(boss_name) {
        Some(killed_at) => now.signed_duration_since(*killed_at) >= Duration::seconds(respawn_seconds),
        None => true,
    }
}

/// Pick a foe for an area.
///
/// Areas with bosses first roll for one; a boss still on cooldown falls
/// through to the regular enemy pool. `None` when the area has nothing to
/// offer.
pub fn roll_encounter<R: Rng + ?Sized>(
    area: &AreaDef,
    data: &GameData,
    player: &Character,
    constants: &EncounterConstants,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Encounter> {
    if !area.possible_bosses.is_empty() && rng.gen::<f64>() < constants.boss_encounter_chance {
        if let Some(boss_id) = area.possible_bosses.choose(rng) {
            match data.bosses.get(boss_id) {
                Some(def) if boss_available(player, &def.base.name, now, constants.boss_respawn_seconds) => {
                    return Some(Encounter::Boss(boss_id.clone()));
                }
                Some(def) => debug!(boss = %def.base.name, "boss still on cooldown"),
                None => debug!(boss = %boss_id, "boss missing from table"),
            }
        }
    }

    area.possible_enemies
        .choose(rng)
        .map(|id| Encounter::Enemy(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixed_draw, sample_data, warrior};
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_boss_cooldown_window() {
        let data = sample_data();
        let mut hero = warrior(&data);
        assert!(boss_available(&hero, "Goblin King", noon(), 28_800));

        hero.bosses_killed.insert("Goblin King".to_string(), noon());
        assert!(!boss_available(&hero, "Goblin King", noon() + Duration::hours(7), 28_800));
        assert!(boss_available(&hero, "Goblin King", noon() + Duration::hours(8), 28_800));
    }

    #[test]
    fn test_boss_roll() {
        let data = sample_data();
        let hero = warrior(&data);
        let constants = EncounterConstants::default();
        let mut rng = StepRng::new(0, 0);

        let encounter = roll_encounter(&data.areas["dark_forest"], &data, &hero, &constants, noon(), &mut rng);
        assert_eq!(encounter, Some(Encounter::Boss("goblin_king".to_string())));
        assert!(encounter.unwrap().spawn(&data).unwrap().is_boss());
    }

    #[test]
    fn test_boss_on_cooldown_falls_through() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.bosses_killed.insert("Goblin King".to_string(), noon() - Duration::hours(1));
        let constants = EncounterConstants::default();
        let mut rng = StepRng::new(0, 0);

        let encounter = roll_encounter(&data.areas["dark_forest"], &data, &hero, &constants, noon(), &mut rng);
        assert_eq!(encounter, Some(Encounter::Enemy("goblin".to_string())));
    }

    #[test]
    fn test_regular_roll_and_empty_area() {
        let data = sample_data();
        let hero = warrior(&data);
        let constants = EncounterConstants::default();
        let mut rng = fixed_draw(0.9);

        let encounter = roll_encounter(&data.areas["dark_forest"], &data, &hero, &constants, noon(), &mut rng);
        assert_eq!(encounter, Some(Encounter::Enemy("goblin".to_string())));

        let village = roll_encounter(&data.areas["starting_village"], &data, &hero, &constants, noon(), &mut rng);
        assert_eq!(village, None);
    }
}
