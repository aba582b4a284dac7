use super::{Battle, BattleEvent};
use crate::buff::{BuffModifiers, ModifierKey};
use crate::data::{CompanionAbility, CompanionAbilityKind, CompanionDef};
use rand::Rng;
use tracing::debug;

impl<'a, R: Rng> Battle<'a, R> {
    /// Each hired companion rolls to act, in party order
    pub(crate) fn companions_act(&mut self) {
        let party = self.player.companion_defs(self.data);
        for (name, def) in party {
            if !self.foe.is_alive() {
                break;
            }
            let chance = def
                .action_chance
                .filter(|c| *c > 0.0)
                .unwrap_or(self.constants.battle.companion_action_chance);
            if self.rng.gen::<f64>() < chance {
                self.companion_action(&name, def);
            }
        }
    }

    fn companion_action(&mut self, name: &str, def: &CompanionDef) {
        let mut triggered = None;
        for ability in &def.abilities {
            if ability.chance.map_or(true, |c| c.roll(self.rng)) {
                triggered = Some(ability);
                break;
            }
        }

        match triggered {
            Some(ability) => self.companion_ability(name, def, ability),
            None => self.companion_fallback(name, def),
        }
    }

    fn companion_ability(&mut self, name: &str, def: &CompanionDef, ability: &CompanionAbility) {
        debug!(companion = %name, ability = %ability.name, kind = ?ability.kind, "companion ability");
        match ability.kind {
            CompanionAbilityKind::AttackBoost
            | CompanionAbilityKind::Rage
            | CompanionAbilityKind::CritBoost => {
                let bonus = ability
                    .attack_bonus
                    .filter(|b| *b != 0)
                    .or(ability.crit_damage_bonus)
                    .unwrap_or(0);
                let damage = self.hit_foe(self.companion_strength(def) + bonus);
                self.report.push(BattleEvent::CompanionStrike {
                    companion: name.to_string(),
                    ability: Some(ability.name.clone()),
                    damage,
                });
            }
            CompanionAbilityKind::Taunt => {
                let bonus = ability.defense_bonus.unwrap_or(def.defense_bonus);
                self.grant_buff(
                    &ability.name,
                    ability.duration.unwrap_or(1),
                    BuffModifiers::new().with(ModifierKey::DefenseBonus, bonus),
                );
            }
            CompanionAbilityKind::Heal => {
                let amount = ability
                    .healing
                    .or(ability.heal)
                    .unwrap_or(def.healing_bonus);
                let healed = self.player.heal(amount);
                self.report.push(BattleEvent::CompanionHeal {
                    companion: name.to_string(),
                    healed,
                });
            }
            CompanionAbilityKind::MpRegen => {
                let per_turn = ability.mp_per_turn.unwrap_or(0);
                if per_turn > 0 {
                    self.grant_buff(
                        &ability.name,
                        ability.duration.unwrap_or(3),
                        BuffModifiers::new().with(ModifierKey::MpPerTurn, per_turn),
                    );
                }
            }
            CompanionAbilityKind::SpellPower => {
                let bonus = ability.spell_power_bonus.unwrap_or(0);
                if bonus != 0 {
                    self.grant_buff(
                        &ability.name,
                        ability.duration.unwrap_or(3),
                        BuffModifiers::new().with(ModifierKey::SpellPowerBonus, bonus),
                    );
                }
            }
            CompanionAbilityKind::PartyBuff => {
                let modifiers: BuffModifiers = [
                    (ModifierKey::AttackBonus, ability.attack_bonus),
                    (ModifierKey::DefenseBonus, ability.defense_bonus),
                    (ModifierKey::SpeedBonus, ability.speed_bonus),
                ]
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect();
                if !modifiers.is_empty() {
                    self.grant_buff(&ability.name, ability.duration.unwrap_or(3), modifiers);
                }
            }
            // Triggered but does nothing; still spends the companion's action
            CompanionAbilityKind::Unknown => {}
        }
    }

    /// Plain attack, guard or heal when no ability fired
    fn companion_fallback(&mut self, name: &str, def: &CompanionDef) {
        match self.rng.gen_range(0..3) {
            0 if def.attack_bonus > 0 => {
                let damage = self.hit_foe(self.companion_strength(def));
                self.report.push(BattleEvent::CompanionStrike {
                    companion: name.to_string(),
                    ability: None,
                    damage,
                });
            }
            1 if def.defense_bonus > 0 => {
                self.player.defending = true;
                self.report.push(BattleEvent::CompanionGuard {
                    companion: name.to_string(),
                });
            }
            2 if def.healing_bonus > 0 => {
                let healed = self.player.heal(def.healing_bonus);
                self.report.push(BattleEvent::CompanionHeal {
                    companion: name.to_string(),
                    healed,
                });
            }
            _ => debug!(companion = %name, "companion idles"),
        }
    }

    /// Base damage of a companion strike before ability bonuses
    fn companion_strength(&self, def: &CompanionDef) -> i32 {
        (self.player.effective_attack() as f64 * self.constants.battle.companion_attack_ratio) as i32
            + def.attack_bonus
    }
}
