//! Player choices during a battle, read from the terminal

use crate::prompt::Prompt;
use rpg_core::combat::{BattleInput, PlayerAction, TurnView};

pub struct TerminalInput<'p> {
    prompt: &'p mut Prompt,
}

impl<'p> TerminalInput<'p> {
    pub fn new(prompt: &'p mut Prompt) -> Self {
        TerminalInput { prompt }
    }
}

impl BattleInput for TerminalInput<'_> {
    fn choose_action(&mut self, view: &TurnView) -> PlayerAction {
        let foe = view.foe.enemy();
        println!();
        println!("--- Round {} ---", view.round);
        println!(
            "{}: {}/{} HP, {}/{} MP",
            view.player.name,
            view.player.hp,
            view.player.effective_max_hp(),
            view.player.mp,
            view.player.effective_max_mp()
        );
        println!("{}: {}/{} HP", foe.name, foe.hp, foe.max_hp);
        println!("1) Attack  2) Use Item  3) Defend  4) Flee");
        if view.can_cast() {
            println!("5) Cast Spell");
        }

        // A closed stdin keeps trying to run
        let Some(choice) = self.prompt.ask("Action:") else {
            return PlayerAction::Flee;
        };
        match choice.as_str() {
            "1" => PlayerAction::Attack,
            "2" => match self
                .prompt
                .choose("Use which item?", &view.consumables, |(_, item)| item.name.clone())
            {
                Some((id, _)) => PlayerAction::UseItem(id.to_string()),
                None => PlayerAction::Invalid(choice),
            },
            "3" => PlayerAction::Defend,
            "4" => PlayerAction::Flee,
            "5" if view.can_cast() => match self.prompt.choose("Cast which spell?", &view.spells, |(_, spell)| {
                format!("{} ({} MP)", spell.name, spell.mp_cost)
            }) {
                Some((id, _)) => PlayerAction::CastSpell(id.to_string()),
                None => PlayerAction::Invalid(choice),
            },
            _ => PlayerAction::Invalid(choice),
        }
    }
}
