//! Boss - Enemy with phases, mana and cooldown-gated abilities

use crate::data::{BossAbility, BossDef, BossPhase};
use crate::foe::Enemy;
use std::collections::BTreeMap;
use tracing::info;

/// Fixed boss mana pool
pub const BOSS_MAX_MP: i32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub enemy: Enemy,
    pub description: String,
    pub special_abilities: Vec<BossAbility>,
    pub phases: Vec<BossPhase>,
    /// Index of the active phase; `None` before the first transition
    pub current_phase: Option<usize>,
    pub mp: i32,
    pub max_mp: i32,
    /// Turns left before an ability can be used again
    pub cooldowns: BTreeMap<String, u32>,
}

/// A phase the boss just entered
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    pub index: usize,
    pub description: String,
    pub attack: i32,
    pub defense: i32,
}

impl Boss {
    pub fn from_def(def: &BossDef) -> Boss {
        Boss {
            enemy: Enemy::from_def(&def.base),
            description: def.description.clone(),
            special_abilities: def.special_abilities.clone(),
            phases: def.phases.clone(),
            current_phase: None,
            mp: BOSS_MAX_MP,
            max_mp: BOSS_MAX_MP,
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> Option<&BossPhase> {
        self.current_phase.and_then(|idx| self.phases.get(idx))
    }

    /// Enter the first later phase whose threshold the boss has fallen to.
    ///
    /// Multipliers apply to the current attack and defense, so successive
    /// phases compound. At most one phase is entered per check.
    pub fn check_phase_transition(&mut self) -> Option<PhaseChange> {
        let fraction = self.enemy.hp_fraction();
        let next = self.phases.iter().enumerate().find(|(idx, phase)| {
            fraction <= phase.hp_threshold && self.current_phase.map_or(true, |cur| *idx > cur)
        });
        let (idx, phase) = next?;

        self.enemy.attack = (self.enemy.attack as f64 * phase.attack_multiplier) as i32;
        self.enemy.defense = (self.enemy.defense as f64 * phase.defense_multiplier) as i32;
        let change = PhaseChange {
            index: idx,
            description: phase.description.clone(),
            attack: self.enemy.attack,
            defense: self.enemy.defense,
        };
        self.current_phase = Some(idx);
        info!(boss = %self.enemy.name, phase = idx, attack = change.attack, defense = change.defense, "boss phase change");
        Some(change)
    }

    /// Count every cooldown down by one turn
    pub fn tick_cooldowns(&mut self) {
        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    /// Abilities usable right now: off cooldown, affordable, and allowed by the phase
    pub fn available_abilities(&self) -> Vec<&BossAbility> {
        let unlocked = self
            .phase()
            .map(|p| p.special_abilities_unlocked.as_slice())
            .unwrap_or(&[]);
        self.special_abilities
            .iter()
            .filter(|a| self.cooldowns.get(&a.name).copied().unwrap_or(0) == 0)
            .filter(|a| self.mp >= a.mp_cost)
            .filter(|a| unlocked.is_empty() || unlocked.contains(&a.name))
            .collect()
    }

    /// Pay for an ability and start its cooldown
    pub fn spend_ability(&mut self, ability: &BossAbility) {
        self.mp -= ability.mp_cost;
        self.cooldowns.insert(ability.name.clone(), ability.cooldown);
    }
}
