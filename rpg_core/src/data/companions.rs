//! Companion records

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One entry of the companions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default)]
    pub defense_bonus: i32,
    #[serde(default)]
    pub speed_bonus: i32,
    #[serde(default)]
    pub hp_bonus: i32,
    #[serde(default)]
    pub mp_bonus: i32,
    #[serde(default)]
    pub healing_bonus: i32,
    #[serde(default)]
    pub spell_power_bonus: i32,
    /// Heal granted to the player after a won battle
    #[serde(default)]
    pub post_battle_heal: i32,
    /// Per-round action chance, replacing the global default
    #[serde(default)]
    pub action_chance: Option<f64>,
    #[serde(default)]
    pub abilities: Vec<CompanionAbility>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionAbilityKind {
    AttackBoost,
    Rage,
    CritBoost,
    Taunt,
    Heal,
    MpRegen,
    SpellPower,
    PartyBuff,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionAbility {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CompanionAbilityKind,
    /// Trigger chance; absent means the ability always triggers
    #[serde(default)]
    pub chance: Option<AbilityChance>,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub crit_damage_bonus: Option<i32>,
    #[serde(default)]
    pub defense_bonus: Option<i32>,
    #[serde(default)]
    pub speed_bonus: Option<i32>,
    #[serde(default)]
    pub healing: Option<i32>,
    #[serde(default)]
    pub heal: Option<i32>,
    #[serde(default)]
    pub mp_per_turn: Option<i32>,
    #[serde(default)]
    pub spell_power_bonus: Option<i32>,
    #[serde(default)]
    pub duration: Option<i32>,
}

/// Trigger chance written either as a 0..=1 fraction or a 0..=100 percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbilityChance {
    Percent(u32),
    Fraction(f64),
}

impl AbilityChance {
    pub fn roll(self, rng: &mut impl Rng) -> bool {
        match self {
            AbilityChance::Fraction(f) if (0.0..=1.0).contains(&f) => rng.gen::<f64>() < f,
            AbilityChance::Fraction(f) => rng.gen_range(1..=100) as f64 <= f.trunc(),
            AbilityChance::Percent(p) => rng.gen_range(1..=100) <= p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixed_draw;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_chance_forms() {
        let pct: AbilityChance = serde_json::from_str("30").unwrap();
        assert_eq!(pct, AbilityChance::Percent(30));
        let frac: AbilityChance = serde_json::from_str("0.25").unwrap();
        assert_eq!(frac, AbilityChance::Fraction(0.25));
    }

    #[test]
    fn test_fraction_roll_uses_unit_draw() {
        // StepRng(0, 0) yields 0.0 for every f64 draw
        let mut rng = StepRng::new(0, 0);
        assert!(AbilityChance::Fraction(0.25).roll(&mut rng));
        assert!(!AbilityChance::Fraction(0.0).roll(&mut rng));
    }

    #[test]
    fn test_full_percent_always_triggers() {
        let mut rng = fixed_draw(0.99);
        assert!(AbilityChance::Percent(100).roll(&mut rng));
        assert!(!AbilityChance::Percent(0).roll(&mut rng));
    }

    #[test]
    fn test_ability_parse() {
        let ability: CompanionAbility = serde_json::from_str(
            r#"{"name": "Shield Wall", "type": "taunt", "chance": 40, "defense_bonus": 8}"#,
        )
        .unwrap();
        assert_eq!(ability.kind, CompanionAbilityKind::Taunt);
        assert_eq!(ability.chance, Some(AbilityChance::Percent(40)));
        assert_eq!(ability.duration, None);
    }
}
