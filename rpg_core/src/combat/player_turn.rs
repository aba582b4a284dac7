use super::{Battle, BattleEvent, BattleInput, PlayerAction, TurnResult, TurnView};
use crate::hooks::GameEvent;
use rand::Rng;
use tracing::debug;

impl<'a, R: Rng> Battle<'a, R> {
    pub(crate) fn player_turn(&mut self, round: u32, input: &mut dyn BattleInput) -> TurnResult {
        let event = GameEvent::PlayerTurn {
            round,
            foe: self.foe.name().to_string(),
        };
        if self.hooks.publish(&event).is_suppressed() {
            self.report.push(BattleEvent::TurnHandled);
            return TurnResult::Continue;
        }

        let action = {
            let view = TurnView::new(round, self.player, &self.foe, self.data);
            input.choose_action(&view)
        };
        debug!(round, ?action, "player action");

        match action {
            PlayerAction::Attack => {
                let damage = self.hit_foe(self.player.effective_attack());
                self.report.push(BattleEvent::PlayerAttack { damage });
            }
            PlayerAction::UseItem(item_id) => match self.player.use_item(&item_id, self.data) {
                Ok(used) => self.report.push(BattleEvent::ItemUsed {
                    item_id: used.item_id,
                    healed: used.healed,
                    mp_restored: used.mp_restored,
                }),
                Err(err) => self.lose_turn(err.to_string()),
            },
            PlayerAction::Defend => {
                self.player.defending = true;
                self.report.push(BattleEvent::Defending);
            }
            PlayerAction::Flee => return self.try_flee(),
            PlayerAction::CastSpell(spell_id) => self.cast_spell(&spell_id),
            PlayerAction::Invalid(choice) => self.lose_turn(format!("Invalid choice '{}'.", choice)),
        }
        TurnResult::Continue
    }

    fn try_flee(&mut self) -> TurnResult {
        let battle = &self.constants.battle;
        let chance = if self.player.effective_speed() > self.foe.enemy().speed {
            battle.flee_chance_faster
        } else {
            battle.flee_chance_slower
        };
        if self.rng.gen::<f64>() < chance {
            self.report.push(BattleEvent::Fled);
            TurnResult::Fled
        } else {
            self.report.push(BattleEvent::FleeFailed);
            TurnResult::Continue
        }
    }

    pub(crate) fn lose_turn(&mut self, reason: String) {
        debug!(%reason, "turn lost");
        self.report.push(BattleEvent::TurnLost { reason });
    }
}
