//! BattleReport - What happened in one battle

use crate::character::LevelUp;
use crate::foe::PhaseChange;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
    /// A battle-start hook took over; nothing was fought
    Suppressed,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BattleOutcome::Victory => "victory",
            BattleOutcome::Defeat => "defeat",
            BattleOutcome::Fled => "fled",
            BattleOutcome::Suppressed => "suppressed",
        };
        write!(f, "{}", s)
    }
}

/// One line of the battle log
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    PlayerAttack { damage: i32 },
    ItemUsed { item_id: String, healed: i32, mp_restored: i32 },
    Defending,
    Fled,
    FleeFailed,
    SpellDamage { spell: String, damage: i32 },
    SpellHeal { spell: String, healed: i32 },
    /// A spell effect with no mechanical impact
    SpellEffect { spell: String, effect: String },
    SpellFizzled { spell: String },
    BuffGained { name: String, duration: i32 },
    /// The choice was refused and the turn is lost
    TurnLost { reason: String },
    /// A player-turn hook handled the turn
    TurnHandled,
    CompanionStrike { companion: String, ability: Option<String>, damage: i32 },
    CompanionHeal { companion: String, healed: i32 },
    CompanionGuard { companion: String },
    EnemyAttack { damage: i32 },
    BossAbility { ability: String, damage: i32, healed: i32, stunned: bool },
    Mitigated { companion_heal: i32 },
    PhaseChange(PhaseChange),
    Regenerated { healed: i32, mp_restored: i32 },
    BuffsExpired { names: Vec<String> },
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::PlayerAttack { damage } => write!(f, "You attack for {} damage!", damage),
            BattleEvent::ItemUsed { item_id, healed, mp_restored } => {
                write!(f, "You use {}", item_id)?;
                if *healed > 0 {
                    write!(f, " and recover {} HP", healed)?;
                }
                if *mp_restored > 0 {
                    write!(f, " and recover {} MP", mp_restored)?;
                }
                write!(f, ".")
            }
            BattleEvent::Defending => write!(f, "You brace for the next blow."),
            BattleEvent::Fled => write!(f, "You successfully fled!"),
            BattleEvent::FleeFailed => write!(f, "You failed to flee!"),
            BattleEvent::SpellDamage { spell, damage } => {
                write!(f, "You cast {} for {} damage!", spell, damage)
            }
            BattleEvent::SpellHeal { spell, healed } => {
                write!(f, "You cast {} and heal {} HP!", spell, healed)
            }
            BattleEvent::SpellEffect { spell, effect } => write!(f, "{}: {}", spell, effect),
            BattleEvent::SpellFizzled { spell } => {
                write!(f, "{} fizzles; the MP is refunded.", spell)
            }
            BattleEvent::BuffGained { name, duration } => {
                write!(f, "Gained {} for {} turns.", name, duration)
            }
            BattleEvent::TurnLost { reason } => write!(f, "{} Turn lost.", reason),
            BattleEvent::TurnHandled => write!(f, "Your turn passes."),
            BattleEvent::CompanionStrike { companion, ability, damage } => match ability {
                Some(name) => write!(f, "{} uses {} for {} damage!", companion, name, damage),
                None => write!(f, "{} attacks for {} damage!", companion, damage),
            },
            BattleEvent::CompanionHeal { companion, healed } => {
                write!(f, "{} heals you for {} HP!", companion, healed)
            }
            BattleEvent::CompanionGuard { companion } => {
                write!(f, "{} helps you defend.", companion)
            }
            BattleEvent::EnemyAttack { damage } => write!(f, "The enemy hits you for {} damage!", damage),
            BattleEvent::BossAbility { ability, damage, healed, stunned } => {
                write!(f, "The boss uses {}", ability)?;
                if *damage > 0 {
                    write!(f, " for {} damage", damage)?;
                }
                if *healed > 0 {
                    write!(f, " and recovers {} HP", healed)?;
                }
                if *stunned {
                    write!(f, "; you are stunned")?;
                }
                write!(f, "!")
            }
            BattleEvent::Mitigated { companion_heal } => {
                write!(f, "Your companions soften the blow ({} HP back).", companion_heal)
            }
            BattleEvent::PhaseChange(change) => write!(f, "{}", change.description),
            BattleEvent::Regenerated { healed, mp_restored } => {
                write!(f, "Regenerated {} HP and {} MP.", healed, mp_restored)
            }
            BattleEvent::BuffsExpired { names } => write!(f, "Expired: {}", names.join(", ")),
        }
    }
}

/// Spoils of a won battle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleRewards {
    pub experience: u32,
    pub gold: u32,
    pub loot: Option<String>,
    /// Hp restored by companions once the fight was over
    pub post_battle_heal: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub foe: String,
    pub is_boss: bool,
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub events: Vec<BattleEvent>,
    pub rewards: Option<BattleRewards>,
    pub level_ups: Vec<LevelUp>,
    pub missions_completed: Vec<String>,
    /// Area the player wakes up in after a defeat
    pub respawn_area: Option<String>,
}

impl BattleReport {
    pub fn new(foe: impl Into<String>, is_boss: bool) -> Self {
        BattleReport {
            foe: foe.into(),
            is_boss,
            outcome: BattleOutcome::Suppressed,
            rounds: 0,
            events: Vec::new(),
            rewards: None,
            level_ups: Vec::new(),
            missions_completed: Vec::new(),
            respawn_area: None,
        }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Total damage the player dealt, from any source
    pub fn damage_dealt(&self) -> i32 {
        self.events
            .iter()
            .map(|e| match e {
                BattleEvent::PlayerAttack { damage }
                | BattleEvent::SpellDamage { damage, .. }
                | BattleEvent::CompanionStrike { damage, .. } => *damage,
                _ => 0,
            })
            .sum()
    }

    /// Total hp the player lost to the foe
    pub fn damage_taken(&self) -> i32 {
        self.events
            .iter()
            .map(|e| match e {
                BattleEvent::EnemyAttack { damage } | BattleEvent::BossAbility { damage, .. } => {
                    *damage
                }
                _ => 0,
            })
            .sum()
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} vs {}", self.outcome, self.foe)];

        if self.rounds > 0 {
            parts.push(format!("{} rounds", self.rounds));
        }

        if let Some(ref rewards) = self.rewards {
            parts.push(format!("+{} exp", rewards.experience));
            parts.push(format!("+{} gold", rewards.gold));
            if let Some(ref loot) = rewards.loot {
                parts.push(format!("loot: {}", loot));
            }
        }

        if let Some(last) = self.level_ups.last() {
            parts.push(format!("reached level {}", last.level));
        }

        if let Some(ref area) = self.respawn_area {
            parts.push(format!("respawned in {}", area));
        }

        parts.join(", ")
    }
}
