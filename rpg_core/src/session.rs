//! Game session - One player walking the world
//!
//! [`GameSession`] owns the loaded tables, the player and everything else a
//! menu-driven frontend needs between battles. It is the only place battles
//! get started from, and it applies their aftermath (respawn, mission
//! bookkeeping) to the world state.

use crate::character::{
    Character, CompanionError, EquipError, ItemUse, UnequipNotice, UseItemError,
};
use crate::combat::{Battle, BattleInput, BattleReport};
use crate::config::GameConstants;
use crate::encounter::{boss_available, roll_encounter, Encounter};
use crate::data::GameData;
use crate::hooks::{EventBus, GameEvent};
use crate::mission::{ClaimedReward, MissionError, MissionLog};
use crate::save::{self, SaveError, SaveRecord, EMERGENCY_PREFIX};
use crate::shop::{RestReceipt, ShopError};
use crate::types::EquipmentSlot;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),
    #[error("unknown area '{0}'")]
    UnknownArea(String),
    #[error("{to} cannot be reached from {from}")]
    NotConnected { from: String, to: String },
    #[error("no boss '{0}' in this area")]
    BossNotHere(String),
    #[error("{0} has not returned yet")]
    BossOnCooldown(String),
    #[error("no '{0}' in inventory")]
    NotCarried(String),
    #[error(transparent)]
    Equip(#[from] EquipError),
    #[error(transparent)]
    Shop(#[from] ShopError),
    #[error(transparent)]
    Companion(#[from] CompanionError),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error(transparent)]
    UseItem(#[from] UseItemError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// What a round of exploring turned up
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreOutcome {
    /// A hook took over the exploration
    Handled,
    Battle(BattleReport),
    FoundGold(u32),
    Quiet,
}

/// Arrival in a new area
#[derive(Debug, Clone, PartialEq)]
pub struct TravelOutcome {
    pub area: String,
    pub first_visit: bool,
    pub encounter: Option<BattleReport>,
}

/// Files written by an emergency save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencySave {
    pub save: PathBuf,
    pub log: PathBuf,
}

pub struct GameSession<R: Rng> {
    pub data: GameData,
    pub constants: GameConstants,
    pub player: Character,
    pub current_area: String,
    pub visited_areas: Vec<String>,
    pub missions: MissionLog,
    pub hooks: EventBus,
    rng: R,
}

impl<R: Rng> GameSession<R> {
    /// Start a fresh character in the starting area
    pub fn new_game(
        data: GameData,
        constants: GameConstants,
        name: &str,
        class_id: &str,
        rng: R,
    ) -> Result<Self, SessionError> {
        let class = data
            .class(class_id)
            .ok_or_else(|| SessionError::UnknownClass(class_id.to_string()))?;
        let start = constants.progression.starting_area.clone();
        if data.area(&start).is_none() {
            return Err(SessionError::UnknownArea(start));
        }

        let mut player = Character::new(name, class_id, class, &constants.progression);
        player.recompute_stats(&data);
        info!(player = %player.name, class = %class_id, area = %start, "new game");

        Ok(GameSession {
            data,
            constants,
            player,
            visited_areas: vec![start.clone()],
            current_area: start,
            missions: MissionLog::new(),
            hooks: EventBus::new(),
            rng,
        })
    }

    /// Rebuild a session from a save record.
    ///
    /// Equipment that no longer passes validation is unequipped and reported.
    pub fn from_save(
        data: GameData,
        constants: GameConstants,
        record: SaveRecord,
        rng: R,
    ) -> (Self, Vec<UnequipNotice>) {
        let loaded = record.restore(&data, &constants.progression.starting_area);
        let mut visited_areas = loaded.visited_areas;
        if !visited_areas.contains(&loaded.current_area) {
            visited_areas.push(loaded.current_area.clone());
        }
        let session = GameSession {
            data,
            constants,
            player: loaded.player,
            current_area: loaded.current_area,
            visited_areas,
            missions: loaded.missions,
            hooks: EventBus::new(),
            rng,
        };
        (session, loaded.notices)
    }

    pub fn load(
        path: &Path,
        data: GameData,
        constants: GameConstants,
        rng: R,
    ) -> Result<(Self, Vec<UnequipNotice>), SessionError> {
        let record = save::read_save(path)?;
        Ok(Self::from_save(data, constants, record, rng))
    }

    pub fn area(&self) -> Option<&crate::data::AreaDef> {
        self.data.area(&self.current_area)
    }

    // === World ===

    /// Look around the current area
    pub fn explore(&mut self, input: &mut dyn BattleInput) -> ExploreOutcome {
        let event = GameEvent::Explore {
            area: self.current_area.clone(),
        };
        if self.hooks.publish(&event).is_suppressed() {
            return ExploreOutcome::Handled;
        }

        for mission_id in self.missions.sync_collect_from_inventory(&self.player.inventory) {
            self.hooks.publish(&GameEvent::MissionComplete { mission_id });
        }

        if self.rng.gen::<f64>() < self.constants.encounter.explore_encounter_chance {
            if let Some(report) = self.random_encounter(input) {
                return ExploreOutcome::Battle(report);
            }
            return ExploreOutcome::Quiet;
        }

        let encounter = &self.constants.encounter;
        if self.rng.gen::<f64>() < encounter.gold_find_chance {
            let (low, high) = (encounter.gold_find_min, encounter.gold_find_max.max(encounter.gold_find_min));
            let gold = self.rng.gen_range(low..=high);
            self.player.gold = self.player.gold.saturating_add(gold);
            info!(gold, area = %self.current_area, "found gold");
            return ExploreOutcome::FoundGold(gold);
        }
        ExploreOutcome::Quiet
    }

    /// Move to a connected area; arriving may start a fight
    pub fn travel(
        &mut self,
        area_id: &str,
        input: &mut dyn BattleInput,
    ) -> Result<TravelOutcome, SessionError> {
        if self.data.area(area_id).is_none() {
            return Err(SessionError::UnknownArea(area_id.to_string()));
        }
        let connected = self
            .area()
            .map_or(false, |here| here.connections.iter().any(|c| c == area_id));
        if !connected {
            return Err(SessionError::NotConnected {
                from: self.current_area.clone(),
                to: area_id.to_string(),
            });
        }

        self.current_area = area_id.to_string();
        let first_visit = !self.visited_areas.iter().any(|a| a == area_id);
        if first_visit {
            self.visited_areas.push(area_id.to_string());
        }
        info!(area = %area_id, first_visit, "travelled");
        self.hooks.publish(&GameEvent::AreaEntered {
            area: area_id.to_string(),
        });

        let encounter = if self.rng.gen::<f64>() < self.constants.encounter.travel_encounter_chance {
            self.random_encounter(input)
        } else {
            None
        };

        Ok(TravelOutcome {
            area: area_id.to_string(),
            first_visit,
            encounter,
        })
    }

    /// Challenge one of the current area's bosses directly
    pub fn fight_boss(
        &mut self,
        boss_id: &str,
        input: &mut dyn BattleInput,
    ) -> Result<BattleReport, SessionError> {
        let here = self.area().map_or(false, |a| a.possible_bosses.iter().any(|b| b == boss_id));
        let def = match self.data.bosses.get(boss_id) {
            Some(def) if here => def,
            _ => return Err(SessionError::BossNotHere(boss_id.to_string())),
        };
        let now = Utc::now();
        if !boss_available(
            &self.player,
            &def.base.name,
            now,
            self.constants.encounter.boss_respawn_seconds,
        ) {
            return Err(SessionError::BossOnCooldown(def.base.name.clone()));
        }

        let encounter = Encounter::Boss(boss_id.to_string());
        self.battle(&encounter, input, now)
            .ok_or_else(|| SessionError::BossNotHere(boss_id.to_string()))
    }

    fn random_encounter(&mut self, input: &mut dyn BattleInput) -> Option<BattleReport> {
        let now = Utc::now();
        let area = self.data.area(&self.current_area)?;
        let encounter = roll_encounter(
            area,
            &self.data,
            &self.player,
            &self.constants.encounter,
            now,
            &mut self.rng,
        )?;
        self.battle(&encounter, input, now)
    }

    fn battle(
        &mut self,
        encounter: &Encounter,
        input: &mut dyn BattleInput,
        now: DateTime<Utc>,
    ) -> Option<BattleReport> {
        let Some(foe) = encounter.spawn(&self.data) else {
            warn!(?encounter, "encounter names a missing foe");
            return None;
        };
        debug!(?encounter, area = %self.current_area, "encounter");

        let report = Battle::new(
            &mut self.player,
            foe,
            &self.data,
            &self.constants,
            &mut self.hooks,
            &mut self.rng,
        )
        .at(now)
        .run(input, &mut self.missions);

        if let Some(ref area) = report.respawn_area {
            if self.data.area(area).is_some() {
                self.current_area = area.clone();
            }
        }
        Some(report)
    }

    // === Town ===

    pub fn rest(&mut self) -> Result<RestReceipt, SessionError> {
        let area = self
            .data
            .area(&self.current_area)
            .ok_or_else(|| SessionError::UnknownArea(self.current_area.clone()))?;
        Ok(self.player.rest_at(area)?)
    }

    pub fn buy(&mut self, item_id: &str) -> Result<u32, SessionError> {
        let price = self.player.buy_item(item_id, &self.data)?;
        self.hooks.publish(&GameEvent::ItemAcquired {
            item_id: item_id.to_string(),
        });
        Ok(price)
    }

    pub fn sell(&mut self, item_id: &str) -> Result<u32, SessionError> {
        Ok(self.player.sell_item(item_id, &self.data)?)
    }

    pub fn use_item(&mut self, item_id: &str) -> Result<ItemUse, SessionError> {
        Ok(self.player.use_item(item_id, &self.data)?)
    }

    /// Equip a carried item; the copy stays in the inventory
    pub fn equip(
        &mut self,
        item_id: &str,
        replace: Option<EquipmentSlot>,
    ) -> Result<EquipmentSlot, SessionError> {
        if !self.player.inventory.contains(item_id) {
            return Err(SessionError::NotCarried(item_id.to_string()));
        }
        Ok(self.player.equip(item_id, &self.data, replace)?)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<String> {
        self.player.unequip(slot, &self.data)
    }

    pub fn hire(&mut self, companion_id: &str) -> Result<String, SessionError> {
        let id = self
            .player
            .hire_companion(companion_id, &self.data, &self.constants.progression)?
            .id
            .clone();
        self.hooks.publish(&GameEvent::CompanionHired {
            companion_id: id.clone(),
        });
        Ok(id)
    }

    pub fn dismiss(&mut self, index: usize) -> Result<String, SessionError> {
        Ok(self.player.dismiss_companion(index, &self.data)?.name)
    }

    // === Missions ===

    pub fn accept_mission(&mut self, mission_id: &str) -> Result<(), SessionError> {
        self.missions.accept(mission_id, &self.data)?;
        // Items already carried count toward a fresh collect mission
        for mission_id in self.missions.sync_collect_from_inventory(&self.player.inventory) {
            self.hooks.publish(&GameEvent::MissionComplete { mission_id });
        }
        Ok(())
    }

    pub fn claim_mission(&mut self, mission_id: &str) -> Result<ClaimedReward, SessionError> {
        let claimed = self.missions.claim(mission_id, &mut self.player, &self.data)?;
        for level_up in &claimed.level_ups {
            self.hooks.publish(&GameEvent::LevelUp {
                level: level_up.level,
            });
        }
        Ok(claimed)
    }

    // === Saving ===

    pub fn snapshot(&self, now: DateTime<Utc>) -> SaveRecord {
        SaveRecord::capture(
            &self.player,
            &self.current_area,
            &self.visited_areas,
            &self.missions,
            now,
        )
    }

    pub fn save(&self) -> Result<PathBuf, SessionError> {
        let record = self.snapshot(Utc::now());
        Ok(save::write_save(&self.constants.paths.saves_dir, "", &record)?)
    }

    /// Last-resort save after a fault, with a diagnostic log beside it
    pub fn emergency_save(&self, message: &str) -> Result<EmergencySave, SessionError> {
        let now = Utc::now();
        let dir = &self.constants.paths.saves_dir;
        warn!(player = %self.player.name, %message, "writing emergency save");
        let save = save::write_save(dir, EMERGENCY_PREFIX, &self.snapshot(now))?;
        let log = save::write_error_log(dir, &self.player.name, message, now)?;
        Ok(EmergencySave { save, log })
    }
}

impl<R: Rng> std::fmt::Debug for GameSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("player", &self.player.name)
            .field("current_area", &self.current_area)
            .field("visited_areas", &self.visited_areas)
            .field("missions", &self.missions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BattleOutcome, ScriptedInput};
    use crate::hooks::{EventKind, HookResponse};
    use crate::testing::{fixed_draw, sample_data};
    use rand::rngs::mock::StepRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session<R: Rng>(constants: GameConstants, rng: R) -> GameSession<R> {
        GameSession::new_game(sample_data(), constants, "Tester", "warrior", rng).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = session(GameConstants::default(), StepRng::new(0, 0));
        assert_eq!(game.current_area, "starting_village");
        assert_eq!(game.visited_areas, vec!["starting_village".to_string()]);
        assert_eq!(game.player.gold, 100);
        assert_eq!(game.player.effective_attack(), 14);

        let err = GameSession::new_game(
            sample_data(),
            GameConstants::default(),
            "Tester",
            "bard",
            StepRng::new(0, 0),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::UnknownClass(_)));
    }

    #[test]
    fn test_explore_finds_gold() {
        let mut constants = GameConstants::default();
        constants.encounter.explore_encounter_chance = 0.0;
        let mut game = session(constants, fixed_draw(0.1));

        let outcome = game.explore(&mut ScriptedInput::default());
        assert_eq!(outcome, ExploreOutcome::FoundGold(5));
        assert_eq!(game.player.gold, 105);
    }

    #[test]
    fn test_explore_veto() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        game.hooks.subscribe(EventKind::Explore, |_| HookResponse::Handled);

        let outcome = game.explore(&mut ScriptedInput::default());
        assert_eq!(outcome, ExploreOutcome::Handled);
        assert_eq!(game.player.gold, 100);
    }

    #[test]
    fn test_village_explore_has_no_enemies() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        let outcome = game.explore(&mut ScriptedInput::default());
        assert_eq!(outcome, ExploreOutcome::Quiet);
    }

    #[test]
    fn test_travel_rules() {
        let mut constants = GameConstants::default();
        constants.encounter.travel_encounter_chance = 0.0;
        let mut game = session(constants, StepRng::new(0, 0));
        let entered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&entered);
        game.hooks.subscribe(EventKind::AreaEntered, move |event| {
            sink.borrow_mut().push(event.clone());
            HookResponse::Continue
        });

        assert!(matches!(
            game.travel("old_crypt", &mut ScriptedInput::default()),
            Err(SessionError::NotConnected { .. })
        ));
        assert!(matches!(
            game.travel("atlantis", &mut ScriptedInput::default()),
            Err(SessionError::UnknownArea(_))
        ));

        let outcome = game.travel("dark_forest", &mut ScriptedInput::default()).unwrap();
        assert!(outcome.first_visit);
        assert_eq!(outcome.encounter, None);
        assert_eq!(game.current_area, "dark_forest");
        assert_eq!(game.visited_areas.len(), 2);
        assert_eq!(entered.borrow().len(), 1);
    }

    #[test]
    fn test_forest_fight_progresses_missions() {
        let mut constants = GameConstants::default();
        constants.encounter.travel_encounter_chance = 0.0;
        constants.encounter.boss_encounter_chance = 0.0;
        let mut game = session(constants, StepRng::new(0, 0));
        game.accept_mission("goblin_trouble").unwrap();
        game.travel("dark_forest", &mut ScriptedInput::default()).unwrap();

        let ExploreOutcome::Battle(report) = game.explore(&mut ScriptedInput::default()) else {
            panic!("expected a battle");
        };
        assert_eq!(report.foe, "Goblin");
        assert_eq!(report.outcome, BattleOutcome::Victory);
        assert_eq!(game.missions.progress["goblin_trouble"].current_count, 1);
        assert!(game.player.inventory.contains("goblin_ear"));
    }

    #[test]
    fn test_fight_boss_checks_area_and_cooldown() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        assert!(matches!(
            game.fight_boss("goblin_king", &mut ScriptedInput::default()),
            Err(SessionError::BossNotHere(_))
        ));

        game.current_area = "dark_forest".to_string();
        game.player.bosses_killed.insert("Goblin King".to_string(), Utc::now());
        assert!(matches!(
            game.fight_boss("goblin_king", &mut ScriptedInput::default()),
            Err(SessionError::BossOnCooldown(_))
        ));
    }

    #[test]
    fn test_defeat_moves_player_home() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        game.current_area = "dark_forest".to_string();
        game.player.hp = 1;

        let report = game
            .fight_boss("goblin_king", &mut ScriptedInput::default())
            .unwrap();
        assert_eq!(report.outcome, BattleOutcome::Defeat);
        assert_eq!(game.current_area, "starting_village");
        assert_eq!(game.player.hp, game.player.stats.max_hp / 2);
    }

    #[test]
    fn test_shop_and_equip_through_session() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        let acquired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&acquired);
        game.hooks.subscribe(EventKind::ItemAcquired, move |_| {
            *counter.borrow_mut() += 1;
            HookResponse::Continue
        });

        assert!(matches!(
            game.equip("rusty_sword", None),
            Err(SessionError::NotCarried(_))
        ));
        game.buy("rusty_sword").unwrap();
        assert_eq!(game.equip("rusty_sword", None).unwrap(), EquipmentSlot::Weapon);
        assert_eq!(game.player.effective_attack(), 17);
        assert!(matches!(
            game.sell("rusty_sword"),
            Err(SessionError::Shop(ShopError::Equipped(_)))
        ));
        assert_eq!(*acquired.borrow(), 1);
    }

    #[test]
    fn test_collect_mission_claim() {
        let mut game = session(GameConstants::default(), StepRng::new(0, 0));
        game.player.inventory.add("wolf_pelt");
        game.player.inventory.add("wolf_pelt");
        game.accept_mission("wolf_pelts").unwrap();
        assert!(game.missions.progress["wolf_pelts"].completed);

        let claimed = game.claim_mission("wolf_pelts").unwrap();
        assert_eq!(claimed.reward.gold, 30);
        assert_eq!(game.player.gold, 130);
        assert_eq!(game.player.experience, 40);
        assert!(game.player.inventory.contains("health_potion"));
        assert!(matches!(
            game.claim_mission("wolf_pelts"),
            Err(SessionError::Mission(MissionError::NotAccepted(_)))
        ));
    }

    #[test]
    fn test_save_and_emergency_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut constants = GameConstants::default();
        constants.paths.saves_dir = dir.path().to_path_buf();
        let mut game = session(constants.clone(), StepRng::new(0, 0));
        game.player.gold = 321;

        let path = game.save().unwrap();
        let (loaded, notices) =
            GameSession::load(&path, sample_data(), constants, StepRng::new(0, 0)).unwrap();
        assert!(notices.is_empty());
        assert_eq!(loaded.player.gold, 321);
        assert_eq!(loaded.current_area, "starting_village");

        let emergency = game.emergency_save("boom").unwrap();
        let save_name = emergency.save.file_name().unwrap().to_string_lossy().to_string();
        assert!(save_name.starts_with(EMERGENCY_PREFIX));
        let log = std::fs::read_to_string(&emergency.log).unwrap();
        assert!(log.contains("boom"));
    }
}
