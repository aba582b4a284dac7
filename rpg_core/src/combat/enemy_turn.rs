use super::{Battle, BattleEvent};
use crate::buff::{BuffModifiers, ModifierKey};
use crate::data::BossAbility;
use crate::foe::Foe;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Debuff a stunning boss ability leaves on the player
const STUN_BUFF: &str = "Stunned";
const STUN_SPEED_PENALTY: i32 = -999;

impl<'a, R: Rng> Battle<'a, R> {
    pub(crate) fn enemy_turn(&mut self) {
        if let Some(ability) = self.pick_boss_ability() {
            self.boss_ability(&ability);
            return;
        }

        let mut incoming = self.foe.enemy().attack;
        if self.player.defending {
            incoming /= 2;
            self.player.defending = false;
        }
        let damage = self.player.take_damage(incoming);
        self.report.push(BattleEvent::EnemyAttack { damage });
        debug!(incoming, damage, hp = self.player.hp, "enemy attack");

        self.companion_mitigation();
    }

    /// Cooldowns tick every boss turn; an eligible ability fires on a roll
    fn pick_boss_ability(&mut self) -> Option<BossAbility> {
        let Foe::Boss(boss) = &mut self.foe else {
            return None;
        };
        boss.tick_cooldowns();

        let available = boss.available_abilities();
        if available.is_empty() {
            return None;
        }
        if self.rng.gen::<f64>() >= self.constants.battle.boss_ability_chance {
            return None;
        }
        let ability = available.choose(self.rng).map(|a| (*a).clone())?;
        boss.spend_ability(&ability);
        Some(ability)
    }

    fn boss_ability(&mut self, ability: &BossAbility) {
        let mut damage = 0;
        if let Some(raw) = ability.damage {
            // Halves the hit but leaves the guard up
            let incoming = if self.player.defending { raw / 2 } else { raw };
            damage = self.player.take_damage(incoming);
        }

        let mut stunned = false;
        if let Some(chance) = ability.stun_chance {
            if self.rng.gen::<f64>() < chance {
                stunned = true;
                self.player.apply_buff(
                    STUN_BUFF,
                    1,
                    BuffModifiers::new().with(ModifierKey::SpeedBonus, STUN_SPEED_PENALTY),
                );
            }
        }

        let healed = match ability.heal_amount {
            Some(amount) => self.foe.enemy_mut().heal(amount),
            None => 0,
        };

        debug!(ability = %ability.name, damage, healed, stunned, "boss ability");
        self.report.push(BattleEvent::BossAbility {
            ability: ability.name.clone(),
            damage,
            healed,
            stunned,
        });
    }

    /// Companions with defense bonuses give back part of a plain hit
    fn companion_mitigation(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let total: i32 = self
            .player
            .companion_defs(self.data)
            .iter()
            .map(|(_, def)| def.defense_bonus)
            .sum();
        if total <= 0 {
            return;
        }
        let amount = (total as f64 * self.constants.battle.companion_mitigation_ratio) as i32;
        let companion_heal = self.player.heal(amount);
        self.report.push(BattleEvent::Mitigated { companion_heal });
    }
}
