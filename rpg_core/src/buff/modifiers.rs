//! Buff modifier keys and maps

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stat a buff can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    AttackBonus,
    DefenseBonus,
    SpeedBonus,
    HpBonus,
    MpBonus,
    MpPerTurn,
    HealPerTurn,
    AbsorbAmount,
    SpellPowerBonus,
    CriticalBonus,
}

impl ModifierKey {
    pub fn all() -> &'static [ModifierKey] {
        &[
            ModifierKey::AttackBonus,
            ModifierKey::DefenseBonus,
            ModifierKey::SpeedBonus,
            ModifierKey::HpBonus,
            ModifierKey::MpBonus,
            ModifierKey::MpPerTurn,
            ModifierKey::HealPerTurn,
            ModifierKey::AbsorbAmount,
            ModifierKey::SpellPowerBonus,
            ModifierKey::CriticalBonus,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModifierKey::AttackBonus => "attack_bonus",
            ModifierKey::DefenseBonus => "defense_bonus",
            ModifierKey::SpeedBonus => "speed_bonus",
            ModifierKey::HpBonus => "hp_bonus",
            ModifierKey::MpBonus => "mp_bonus",
            ModifierKey::MpPerTurn => "mp_per_turn",
            ModifierKey::HealPerTurn => "heal_per_turn",
            ModifierKey::AbsorbAmount => "absorb_amount",
            ModifierKey::SpellPowerBonus => "spell_power_bonus",
            ModifierKey::CriticalBonus => "critical_bonus",
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifierKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModifierKey::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown modifier '{}'", s))
    }
}

/// Modifier values carried by one buff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuffModifiers(BTreeMap<ModifierKey, i32>);

impl BuffModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: ModifierKey, value: i32) -> Self {
        self.0.insert(key, value);
        self
    }

    /// Add to an existing value
    pub fn add(&mut self, key: ModifierKey, value: i32) {
        *self.0.entry(key).or_insert(0) += value;
    }

    pub fn set(&mut self, key: ModifierKey, value: i32) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: ModifierKey) -> i32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModifierKey, i32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every value is zero; an empty map counts as all zero
    pub fn all_zero(&self) -> bool {
        self.0.values().all(|v| *v == 0)
    }
}

impl FromIterator<(ModifierKey, i32)> for BuffModifiers {
    fn from_iter<I: IntoIterator<Item = (ModifierKey, i32)>>(iter: I) -> Self {
        let mut modifiers = BuffModifiers::new();
        for (key, value) in iter {
            modifiers.add(key, value);
        }
        modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_map() {
        let modifiers = BuffModifiers::new()
            .with(ModifierKey::AttackBonus, 5)
            .with(ModifierKey::AbsorbAmount, 10);
        let json = serde_json::to_string(&modifiers).unwrap();
        assert_eq!(json, r#"{"attack_bonus":5,"absorb_amount":10}"#);
    }

    #[test]
    fn test_all_zero() {
        let mut modifiers = BuffModifiers::new().with(ModifierKey::AbsorbAmount, 3);
        assert!(!modifiers.all_zero());
        modifiers.set(ModifierKey::AbsorbAmount, 0);
        assert!(modifiers.all_zero());
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("mp_per_turn".parse::<ModifierKey>().unwrap(), ModifierKey::MpPerTurn);
        assert!("fire_resistance".parse::<ModifierKey>().is_err());
    }
}
