//! Battle end - Rewards on victory, respawn on defeat

use super::{Battle, BattleOutcome, BattleRewards};
use crate::data::MissionKind;
use crate::hooks::GameEvent;
use crate::mission::MissionTracker;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

impl<'a, R: Rng> Battle<'a, R> {
    pub(crate) fn resolve_victory(&mut self, missions: &mut dyn MissionTracker) {
        self.report.outcome = BattleOutcome::Victory;
        let foe_name = self.foe.name().to_string();

        if self.foe.is_boss() {
            self.player.bosses_killed.insert(foe_name.clone(), self.now);
        }

        let enemy = self.foe.enemy();
        let mut rewards = BattleRewards {
            experience: enemy.experience_reward,
            gold: enemy.gold_reward,
            ..BattleRewards::default()
        };

        let level_ups = self.player.gain_experience(rewards.experience);
        for level_up in &level_ups {
            self.hooks.publish(&GameEvent::LevelUp {
                level: level_up.level,
            });
        }
        self.report.level_ups = level_ups;
        self.player.gold = self.player.gold.saturating_add(rewards.gold);

        let mut completed = missions.update_mission_progress(MissionKind::Kill, &foe_name, 1);

        let loot_table = &self.foe.enemy().loot_table;
        if !loot_table.is_empty() && self.rng.gen::<f64>() < self.constants.battle.loot_drop_chance {
            if let Some(item_id) = loot_table.choose(self.rng).cloned() {
                self.player.inventory.add(item_id.clone());
                self.hooks.publish(&GameEvent::ItemAcquired {
                    item_id: item_id.clone(),
                });
                completed.extend(missions.update_mission_progress(MissionKind::Collect, &item_id, 1));
                rewards.loot = Some(item_id);
            }
        }

        for (_, def) in self.player.companion_defs(self.data) {
            if def.post_battle_heal > 0 {
                rewards.post_battle_heal += self.player.heal(def.post_battle_heal);
            }
        }

        for mission_id in &completed {
            self.hooks.publish(&GameEvent::MissionComplete {
                mission_id: mission_id.clone(),
            });
        }
        self.report.missions_completed = completed;

        info!(
            foe = %foe_name,
            experience = rewards.experience,
            gold = rewards.gold,
            loot = ?rewards.loot,
            "victory"
        );
        self.report.rewards = Some(rewards);
    }

    /// Wake up in the starting area with half the stored hp and mp maxima.
    ///
    /// Buff bonuses are not counted; nothing is taken.
    pub(crate) fn resolve_defeat(&mut self) {
        self.report.outcome = BattleOutcome::Defeat;
        self.player.hp = (self.player.stats.max_hp / 2).min(self.player.effective_max_hp());
        self.player.mp = (self.player.stats.max_mp / 2).min(self.player.effective_max_mp());
        let area = self.constants.progression.starting_area.clone();
        info!(foe = %self.foe.name(), respawn = %area, "defeat");
        self.report.respawn_area = Some(area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{BuffModifiers, ModifierKey};
    use crate::combat::{BattleOutcome, ScriptedInput};
    use crate::config::GameConstants;
    use crate::data::EnemyDef;
    use crate::foe::{Boss, Enemy, Foe};
    use crate::hooks::{EventBus, EventKind, HookResponse};
    use crate::mission::MissionLog;
    use crate::testing::{fixed_draw, sample_data, warrior};
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_victory_rewards_loot_and_missions() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.stats.attack = 100;
        let mut missions = MissionLog::new();
        missions.accept("goblin_trouble", &data).unwrap();
        missions.accept("herbalist", &data).unwrap();

        let acquired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&acquired);
        let mut hooks = EventBus::new();
        hooks.subscribe(EventKind::ItemAcquired, move |event| {
            sink.borrow_mut().push(event.clone());
            HookResponse::Continue
        });
        // 0.0 draws: loot drops and the first table entry is picked
        let mut rng = StepRng::new(0, 0);

        let goblin = Foe::from(Enemy::from_def(&data.enemies["goblin"]));
        let report = Battle::new(&mut hero, goblin, &data, &constants, &mut hooks, &mut rng)
            .run(&mut ScriptedInput::default(), &mut missions);

        assert_eq!(report.outcome, BattleOutcome::Victory);
        let rewards = report.rewards.unwrap();
        assert_eq!(rewards.experience, 25);
        assert_eq!(rewards.gold, 10);
        assert_eq!(rewards.loot.as_deref(), Some("goblin_ear"));
        assert_eq!(hero.gold, 110);
        assert_eq!(hero.experience, 25);
        assert!(hero.inventory.contains("goblin_ear"));
        assert_eq!(missions.progress["goblin_trouble"].current_count, 1);
        assert_eq!(missions.progress["herbalist"].current_counts["goblin_ear"], 1);
        assert_eq!(acquired.borrow().len(), 1);
    }

    #[test]
    fn test_no_loot_on_failed_roll() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.stats.attack = 100;
        let mut hooks = EventBus::new();
        let mut rng = fixed_draw(0.75);
        let mut missions = MissionLog::new();

        let wolf = Foe::from(Enemy::from_def(&data.enemies["wolf"]));
        let report = Battle::new(&mut hero, wolf, &data, &constants, &mut hooks, &mut rng)
            .run(&mut ScriptedInput::default(), &mut missions);

        assert_eq!(report.rewards.unwrap().loot, None);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn test_boss_kill_is_timestamped() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.stats.attack = 1000;
        hero.stats.speed = 100;
        let mut hooks = EventBus::new();
        let mut rng = fixed_draw(0.9);
        let mut missions = MissionLog::new();
        let now = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let king = Foe::from(Boss::from_def(&data.bosses["goblin_king"]));
        let report = Battle::new(&mut hero, king, &data, &constants, &mut hooks, &mut rng)
            .at(now)
            .run(&mut ScriptedInput::default(), &mut missions);

        assert_eq!(report.outcome, BattleOutcome::Victory);
        assert_eq!(hero.bosses_killed.get("Goblin King"), Some(&now));
    }

    #[test]
    fn test_level_up_publishes_event() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.stats.attack = 100;
        let levels = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&levels);
        let mut hooks = EventBus::new();
        hooks.subscribe(EventKind::LevelUp, move |event| {
            if let GameEvent::LevelUp { level } = event {
                sink.borrow_mut().push(*level);
            }
            HookResponse::Continue
        });
        let mut rng = fixed_draw(0.9);
        let mut missions = MissionLog::new();

        let mut skeleton = Enemy::from_def(&data.enemies["skeleton"]);
        skeleton.experience_reward = 260;
        let report = Battle::new(&mut hero, Foe::from(skeleton), &data, &constants, &mut hooks, &mut rng)
            .run(&mut ScriptedInput::default(), &mut missions);

        // 100 to reach 2, then 150 to reach 3
        assert_eq!(*levels.borrow(), vec![2, 3]);
        assert_eq!(report.level_ups.len(), 2);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.experience, 10);
    }

    #[test]
    fn test_defeat_halves_and_respawns() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.hp = 5;
        hero.gold = 77;
        hero.inventory.add("herb");
        let mut hooks = EventBus::new();
        let mut rng = StepRng::new(0, 0);
        let mut missions = MissionLog::new();

        let ogre = Foe::from(Enemy::from_def(&EnemyDef {
            name: "Ogre".to_string(),
            hp: 500,
            attack: 100,
            defense: 0,
            speed: 50,
            experience_reward: 0,
            gold_reward: 0,
            loot_table: vec![],
        }));
        let report = Battle::new(&mut hero, ogre, &data, &constants, &mut hooks, &mut rng)
            .run(&mut ScriptedInput::default(), &mut missions);

        assert_eq!(report.outcome, BattleOutcome::Defeat);
        assert_eq!(report.respawn_area.as_deref(), Some("starting_village"));
        assert_eq!(hero.hp, 60);
        assert_eq!(hero.mp, 15);
        assert_eq!(hero.gold, 77);
        assert_eq!(hero.inventory.count("herb"), 1);
    }

    #[test]
    fn test_defeat_ignores_buffed_maxima() {
        let data = sample_data();
        let constants = GameConstants::default();
        let mut hero = warrior(&data);
        hero.apply_buff(
            "Vigor",
            99,
            BuffModifiers::new()
                .with(ModifierKey::HpBonus, 40)
                .with(ModifierKey::MpBonus, 10),
        );
        hero.hp = 5;
        let mut hooks = EventBus::new();
        let mut rng = StepRng::new(0, 0);
        let mut missions = MissionLog::new();

        let ogre = Foe::from(Enemy::from_def(&EnemyDef {
            name: "Ogre".to_string(),
            hp: 500,
            attack: 100,
            defense: 0,
            speed: 50,
            experience_reward: 0,
            gold_reward: 0,
            loot_table: vec![],
        }));
        let report = Battle::new(&mut hero, ogre, &data, &constants, &mut hooks, &mut rng)
            .run(&mut ScriptedInput::default(), &mut missions);

        assert_eq!(report.outcome, BattleOutcome::Defeat);
        assert_eq!(hero.effective_max_hp(), 160);
        assert_eq!(hero.hp, 60);
        assert_eq!(hero.mp, 15);
    }
}
