//! Player choices during a battle

use crate::character::Character;
use crate::data::{GameData, ItemDef, SpellDef};
use crate::foe::Foe;
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    UseItem(String),
    Defend,
    Flee,
    CastSpell(String),
    /// Unrecognized input; costs the turn
    Invalid(String),
}

/// What the player can see when choosing an action
#[derive(Debug)]
pub struct TurnView<'a> {
    pub round: u32,
    pub player: &'a Character,
    pub foe: &'a Foe,
    /// Consumables held, one entry per distinct item id
    pub consumables: Vec<(&'a str, &'a ItemDef)>,
    /// Spells the equipped weapon can channel; empty without a magic weapon
    pub spells: Vec<(&'a str, &'a SpellDef)>,
}

impl<'a> TurnView<'a> {
    pub fn new(round: u32, player: &'a Character, foe: &'a Foe, data: &'a GameData) -> Self {
        let mut consumables = player.inventory.consumables(data);
        let mut seen = BTreeSet::new();
        consumables.retain(|(id, _)| seen.insert(*id));
        TurnView {
            round,
            player,
            foe,
            consumables,
            spells: castable_spells(player, data),
        }
    }

    pub fn can_cast(&self) -> bool {
        !self.spells.is_empty()
    }
}

/// Spells allowed by the player's equipped magic weapon
pub fn castable_spells<'a>(player: &Character, data: &'a GameData) -> Vec<(&'a str, &'a SpellDef)> {
    let Some(weapon) = player.equipment.weapon.as_deref() else {
        return Vec::new();
    };
    if !data.item(weapon).map_or(false, |item| item.magic_weapon) {
        return Vec::new();
    }
    data.spells
        .iter()
        .filter(|(_, spell)| spell.allowed_weapons.iter().any(|w| w == weapon))
        .map(|(id, spell)| (id.as_str(), spell))
        .collect()
}

/// Source of player decisions; the only blocking point of a battle
pub trait BattleInput {
    fn choose_action(&mut self, view: &TurnView<'_>) -> PlayerAction;
}

/// Plays back a fixed list of actions, then keeps attacking
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedInput {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        ScriptedInput {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl BattleInput for ScriptedInput {
    fn choose_action(&mut self, _view: &TurnView<'_>) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::Attack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foe::Enemy;
    use crate::testing::{sample_data, warrior};

    #[test]
    fn test_spells_need_magic_weapon() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.equipment.weapon = Some("rusty_sword".to_string());
        assert!(castable_spells(&hero, &data).is_empty());

        hero.equipment.weapon = Some("oak_staff".to_string());
        let ids: Vec<_> = castable_spells(&hero, &data).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["fireball", "mend", "slow", "stone_skin"]);
    }

    #[test]
    fn test_view_dedups_consumables() {
        let data = sample_data();
        let mut hero = warrior(&data);
        hero.inventory.add("health_potion");
        hero.inventory.add("health_potion");
        let foe = Foe::from(Enemy::from_def(&data.enemies["goblin"]));

        let view = TurnView::new(1, &hero, &foe, &data);
        assert_eq!(view.consumables.len(), 1);
        assert!(!view.can_cast());
    }

    #[test]
    fn test_scripted_input_falls_back_to_attack() {
        let data = sample_data();
        let hero = warrior(&data);
        let foe = Foe::from(Enemy::from_def(&data.enemies["goblin"]));
        let view = TurnView::new(1, &hero, &foe, &data);

        let mut input = ScriptedInput::new([PlayerAction::Defend]);
        assert_eq!(input.choose_action(&view), PlayerAction::Defend);
        assert_eq!(input.choose_action(&view), PlayerAction::Attack);
        assert_eq!(input.remaining(), 0);
    }
}
