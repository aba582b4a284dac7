use super::{castable_spells, Battle, BattleEvent};
use crate::buff::{BuffModifiers, ModifierKey};
use crate::data::SpellKind;
use rand::Rng;
use tracing::debug;

/// Buff length for effects that do not name one
const MIN_BUFF_DURATION: i32 = 3;

impl<'a, R: Rng> Battle<'a, R> {
    pub(crate) fn cast_spell(&mut self, spell_id: &str) {
        let data = self.data;
        let Some(weapon) = self.player.equipment.weapon.clone() else {
            return self.lose_turn("You need a magic weapon to cast spells.".to_string());
        };
        let Some((_, spell)) = castable_spells(self.player, data)
            .into_iter()
            .find(|(id, _)| *id == spell_id)
        else {
            return self.lose_turn(format!("{} cannot channel '{}'.", data.item_name(&weapon), spell_id));
        };
        if self.player.mp < spell.mp_cost {
            return self.lose_turn(format!("Not enough MP for {}.", spell.name));
        }

        self.player.mp -= spell.mp_cost;
        debug!(spell = %spell_id, mp_cost = spell.mp_cost, kind = ?spell.kind, "spell cast");

        match spell.kind {
            SpellKind::Damage => {
                let damage = self.hit_foe(spell.power + self.player.effective_attack() / 2);
                self.report.push(BattleEvent::SpellDamage {
                    spell: spell.name.clone(),
                    damage,
                });
                self.note_effects(&spell.name, &spell.effects);
            }
            SpellKind::Heal => {
                let healed = self.player.heal(spell.power);
                self.report.push(BattleEvent::SpellHeal {
                    spell: spell.name.clone(),
                    healed,
                });
                for effect_id in &spell.effects {
                    let Some(effect) = data.effects.get(effect_id) else {
                        continue;
                    };
                    let regenerates = effect
                        .numeric(ModifierKey::HealPerTurn.as_str())
                        .is_some_and(|amount| amount > 0.0);
                    if effect.kind == "healing_over_time" && regenerates {
                        let duration = effect.duration.unwrap_or(MIN_BUFF_DURATION);
                        self.grant_buff(
                            effect_display(effect_id, &effect.name),
                            duration,
                            effect.modifiers(),
                        );
                    } else {
                        self.note_effect(&spell.name, effect_id);
                    }
                }
            }
            SpellKind::Buff => {
                for effect_id in &spell.effects {
                    let (modifiers, duration, name) = match data.effects.get(effect_id) {
                        Some(effect) => (
                            effect.modifiers(),
                            effect
                                .duration
                                .unwrap_or_else(|| spell.power.max(MIN_BUFF_DURATION)),
                            effect_display(effect_id, &effect.name),
                        ),
                        None => (
                            BuffModifiers::new(),
                            spell.power.max(MIN_BUFF_DURATION),
                            effect_id.as_str(),
                        ),
                    };
                    self.grant_buff(name, duration, modifiers);
                }
            }
            SpellKind::Debuff => self.note_effects(&spell.name, &spell.effects),
            SpellKind::Unknown => {
                self.player.mp += spell.mp_cost;
                self.report.push(BattleEvent::SpellFizzled {
                    spell: spell.name.clone(),
                });
            }
        }
    }

    /// Log effects that only color the narration
    fn note_effects(&mut self, spell: &str, effects: &[String]) {
        for effect_id in effects {
            self.note_effect(spell, effect_id);
        }
    }

    fn note_effect(&mut self, spell: &str, effect_id: &str) {
        let effect = match self.data.effects.get(effect_id) {
            Some(def) => effect_display(effect_id, &def.name).to_string(),
            None => effect_id.to_string(),
        };
        self.report.push(BattleEvent::SpellEffect {
            spell: spell.to_string(),
            effect,
        });
    }
}

fn effect_display<'s>(id: &'s str, name: &'s str) -> &'s str {
    if name.is_empty() {
        id
    } else {
        name
    }
}
