//! Battle orchestration - One player against one foe, round by round
//!
//! A [`Battle`] borrows everything it mutates for its lifetime and hands back
//! a [`BattleReport`]. Turn order is fixed once at the start: the player acts
//! first when their effective speed is at least the foe's.

mod companion_turn;
mod enemy_turn;
mod input;
mod player_turn;
mod resolution;
mod result;
mod spells;

pub use input::{castable_spells, BattleInput, PlayerAction, ScriptedInput, TurnView};
pub use result::{BattleEvent, BattleOutcome, BattleReport, BattleRewards};

use crate::buff::BuffModifiers;
use crate::character::Character;
use crate::config::GameConstants;
use crate::data::GameData;
use crate::foe::{Foe, FoeHit};
use crate::hooks::{EventBus, GameEvent};
use crate::mission::MissionTracker;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

/// Whether the battle goes on after a player turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TurnResult {
    Continue,
    Fled,
}

pub struct Battle<'a, R: Rng> {
    pub(crate) player: &'a mut Character,
    pub(crate) foe: Foe,
    pub(crate) data: &'a GameData,
    pub(crate) constants: &'a GameConstants,
    pub(crate) hooks: &'a mut EventBus,
    pub(crate) rng: &'a mut R,
    pub(crate) report: BattleReport,
    pub(crate) now: DateTime<Utc>,
}

impl<'a, R: Rng> Battle<'a, R> {
    pub fn new(
        player: &'a mut Character,
        foe: Foe,
        data: &'a GameData,
        constants: &'a GameConstants,
        hooks: &'a mut EventBus,
        rng: &'a mut R,
    ) -> Self {
        let report = BattleReport::new(foe.name(), foe.is_boss());
        Battle {
            player,
            foe,
            data,
            constants,
            hooks,
            rng,
            report,
            now: Utc::now(),
        }
    }

    /// Timestamp recorded for a boss kill
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn foe(&self) -> &Foe {
        &self.foe
    }

    /// Fight to the end and report the result
    pub fn run(
        mut self,
        input: &mut dyn BattleInput,
        missions: &mut dyn MissionTracker,
    ) -> BattleReport {
        let start = GameEvent::BattleStart {
            foe: self.foe.name().to_string(),
            is_boss: self.foe.is_boss(),
        };
        if self.hooks.publish(&start).is_suppressed() {
            info!(foe = %self.foe.name(), "battle start handled by hook");
            return self.report;
        }

        self.player.defending = false;
        let player_first = self.player.effective_speed() >= self.foe.enemy().speed;
        info!(
            foe = %self.foe.name(),
            boss = self.foe.is_boss(),
            player_first,
            "battle started"
        );

        let mut fled = false;
        while self.player.is_alive() && self.foe.is_alive() {
            self.report.rounds += 1;
            let round = self.report.rounds;
            debug!(round, hp = self.player.hp, foe_hp = self.foe.enemy().hp, "round start");

            if player_first {
                if self.player_turn(round, input) == TurnResult::Fled {
                    fled = true;
                    break;
                }
                if self.foe.is_alive() {
                    self.companions_act();
                }
                if self.foe.is_alive() {
                    self.enemy_turn();
                }
            } else {
                self.enemy_turn();
                if self.player.is_alive() {
                    if self.player_turn(round, input) == TurnResult::Fled {
                        fled = true;
                        break;
                    }
                    if self.foe.is_alive() {
                        self.companions_act();
                    }
                }
            }

            self.end_of_round();
        }

        self.player.defending = false;
        if fled {
            self.report.outcome = BattleOutcome::Fled;
        } else if self.player.is_alive() {
            self.resolve_victory(missions);
        } else {
            self.resolve_defeat();
        }

        info!(summary = %self.report.summary(), "battle over");
        self.hooks.publish(&GameEvent::BattleEnd {
            foe: self.report.foe.clone(),
            outcome: self.report.outcome.to_string(),
        });
        self.report
    }

    /// Buff upkeep once both sides have acted
    fn end_of_round(&mut self) {
        let tick = self.player.tick_buffs();
        if tick.healed > 0 || tick.mp_restored > 0 {
            self.report.push(BattleEvent::Regenerated {
                healed: tick.healed,
                mp_restored: tick.mp_restored,
            });
        }
        if tick.any_expired() {
            self.player.recompute_stats(self.data);
            self.report.push(BattleEvent::BuffsExpired {
                names: tick.expired,
            });
        }
    }

    /// Damage the foe and log any phase change
    pub(crate) fn hit_foe(&mut self, incoming: i32) -> i32 {
        let FoeHit {
            damage,
            phase_change,
        } = self.foe.take_damage(incoming);
        if let Some(change) = phase_change {
            self.report.push(BattleEvent::PhaseChange(change));
        }
        damage
    }

    /// Give the player a buff and announce it
    pub(crate) fn grant_buff(&mut self, name: &str, duration: i32, modifiers: BuffModifiers) {
        self.player.apply_buff(name, duration, modifiers);
        self.report.push(BattleEvent::BuffGained {
            name: name.to_string(),
            duration,
        });
        self.hooks.publish(&GameEvent::BuffApplied {
            name: name.to_string(),
            duration,
        });
    }
}
