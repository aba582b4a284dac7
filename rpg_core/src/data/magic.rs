//! Spell and effect records

use crate::buff::{BuffModifiers, ModifierKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    Damage,
    Heal,
    Buff,
    Debuff,
    #[serde(other)]
    Unknown,
}

/// One entry of the spells table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SpellKind,
    #[serde(default)]
    pub mp_cost: i32,
    #[serde(default)]
    pub power: i32,
    /// Weapon item ids that can channel this spell
    #[serde(default)]
    pub allowed_weapons: Vec<String>,
    /// Effect ids resolved against the effects table
    #[serde(default)]
    pub effects: Vec<String>,
}

/// One entry of the effects table
///
/// Numeric fields beyond the named ones are kept in `values`; the ones whose
/// keys are buff modifiers become modifiers when the effect is applied as a buff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(flatten)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl EffectDef {
    /// Buff modifiers carried by this effect
    pub fn modifiers(&self) -> BuffModifiers {
        let mut modifiers = BuffModifiers::new();
        for (key, value) in &self.values {
            let Ok(key) = key.parse::<ModifierKey>() else {
                continue;
            };
            if let Some(amount) = value.as_f64() {
                modifiers.add(key, amount as i32);
            }
        }
        modifiers
    }

    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_modifiers_pick_known_keys() {
        let effect: EffectDef = serde_json::from_str(
            r#"{"type": "stat_boost", "duration": 4, "defense_bonus": 6, "absorb_amount": 20,
                "glow": "blue", "radius": 3}"#,
        )
        .unwrap();
        let modifiers = effect.modifiers();
        assert_eq!(modifiers.get(ModifierKey::DefenseBonus), 6);
        assert_eq!(modifiers.get(ModifierKey::AbsorbAmount), 20);
        assert_eq!(modifiers.len(), 2);
        assert_eq!(effect.duration, Some(4));
        assert_eq!(effect.numeric("radius"), Some(3.0));
    }

    #[test]
    fn test_unknown_spell_kind() {
        let spell: SpellDef =
            serde_json::from_str(r#"{"name": "Warp", "type": "teleport", "mp_cost": 5}"#).unwrap();
        assert_eq!(spell.kind, SpellKind::Unknown);
    }
}
