//! Timed buffs and debuffs
//!
//! Buffs are kept in application order. Identical names stack as separate
//! entries; nothing is merged or refreshed.

mod modifiers;

pub use modifiers::{BuffModifiers, ModifierKey};

use serde::{Deserialize, Serialize};

/// Active buff/debuff on a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub name: String,
    /// Rounds remaining
    pub duration: i32,
    #[serde(default)]
    pub modifiers: BuffModifiers,
}

impl ActiveBuff {
    pub fn new(name: impl Into<String>, duration: i32, modifiers: BuffModifiers) -> Self {
        ActiveBuff {
            name: name.into(),
            duration,
            modifiers,
        }
    }
}

/// Ordered list of active buffs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveBuffs(Vec<ActiveBuff>);

impl ActiveBuffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, buff: ActiveBuff) {
        self.0.push(buff);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActiveBuff> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Sum of one modifier across all buffs
    pub fn total(&self, key: ModifierKey) -> i32 {
        self.0.iter().map(|b| b.modifiers.get(key)).sum()
    }

    /// Sum of per-turn regeneration modifiers, in buff order
    pub fn per_turn(&self) -> Vec<(i32, i32)> {
        self.0
            .iter()
            .map(|b| {
                (
                    b.modifiers.get(ModifierKey::MpPerTurn),
                    b.modifiers.get(ModifierKey::HealPerTurn),
                )
            })
            .collect()
    }

    /// Drain absorb shields in list order, returning damage left over.
    ///
    /// A shield-bearing buff whose modifiers all reach zero is dropped.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        let mut remaining = damage;
        let mut idx = 0;
        while idx < self.0.len() && remaining > 0 {
            let available = self.0[idx].modifiers.get(ModifierKey::AbsorbAmount);
            if available > 0 {
                let used = available.min(remaining);
                remaining -= used;
                let buff = &mut self.0[idx];
                buff.modifiers.set(ModifierKey::AbsorbAmount, available - used);
                if buff.modifiers.all_zero() {
                    self.0.remove(idx);
                    continue;
                }
            }
            idx += 1;
        }
        remaining
    }

    /// Count every buff down one round and drop the expired ones.
    ///
    /// Returns the names of buffs that expired.
    pub fn decrement(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        self.0.retain_mut(|buff| {
            buff.duration -= 1;
            if buff.duration <= 0 {
                expired.push(buff.name.clone());
                false
            } else {
                true
            }
        });
        expired
    }
}

impl From<Vec<ActiveBuff>> for ActiveBuffs {
    fn from(buffs: Vec<ActiveBuff>) -> Self {
        ActiveBuffs(buffs)
    }
}
