//! Foes - Regular enemies and bosses spawned for one battle

mod boss;
mod enemy;

pub use boss::{Boss, PhaseChange};
pub use enemy::Enemy;

/// The opponent in a battle
#[derive(Debug, Clone, PartialEq)]
pub enum Foe {
    Regular(Enemy),
    Boss(Boss),
}

/// Result of a hit on a foe
#[derive(Debug, Clone, PartialEq)]
pub struct FoeHit {
    pub damage: i32,
    pub phase_change: Option<PhaseChange>,
}

impl Foe {
    pub fn enemy(&self) -> &Enemy {
        match self {
            Foe::Regular(enemy) => enemy,
            Foe::Boss(boss) => &boss.enemy,
        }
    }

    pub fn enemy_mut(&mut self) -> &mut Enemy {
        match self {
            Foe::Regular(enemy) => enemy,
            Foe::Boss(boss) => &mut boss.enemy,
        }
    }

    pub fn name(&self) -> &str {
        &self.enemy().name
    }

    pub fn is_alive(&self) -> bool {
        self.enemy().is_alive()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Foe::Boss(_))
    }

    /// Damage the foe; bosses may enter a new phase
    pub fn take_damage(&mut self, incoming: i32) -> FoeHit {
        match self {
            Foe::Regular(enemy) => FoeHit {
                damage: enemy.take_damage(incoming),
                phase_change: None,
            },
            Foe::Boss(boss) => {
                let damage = boss.enemy.take_damage(incoming);
                FoeHit {
                    damage,
                    phase_change: boss.check_phase_transition(),
                }
            }
        }
    }
}

impl From<Enemy> for Foe {
    fn from(enemy: Enemy) -> Self {
        Foe::Regular(enemy)
    }
}

impl From<Boss> for Foe {
    fn from(boss: Boss) -> Self {
        Foe::Boss(boss)
    }
}
