use crate::data::EnemyDef;

/// A regular enemy, fresh for each encounter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub name: String,
    pub max_hp: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub experience_reward: u32,
    pub gold_reward: u32,
    pub loot_table: Vec<String>,
}

impl Enemy {
    pub fn from_def(def: &EnemyDef) -> Enemy {
        Enemy {
            name: def.name.clone(),
            max_hp: def.hp,
            hp: def.hp,
            attack: def.attack,
            defense: def.defense,
            speed: def.speed,
            experience_reward: def.experience_reward,
            gold_reward: def.gold_reward,
            loot_table: def.loot_table.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Flat defense, never less than 1 damage; returns damage dealt
    pub fn take_damage(&mut self, incoming: i32) -> i32 {
        let damage = (incoming - self.defense).max(1);
        self.hp = (self.hp - damage).max(0);
        damage
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Remaining hp as a fraction of max
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> Enemy {
        Enemy::from_def(&EnemyDef {
            name: "Goblin".to_string(),
            hp: 40,
            attack: 8,
            defense: 5,
            speed: 9,
            experience_reward: 25,
            gold_reward: 10,
            loot_table: vec![],
        })
    }

    #[test]
    fn test_take_damage_subtracts_defense() {
        let mut enemy = goblin();
        assert_eq!(enemy.take_damage(20), 15);
        assert_eq!(enemy.hp, 25);
    }

    #[test]
    fn test_take_damage_floor() {
        let mut enemy = goblin();
        assert_eq!(enemy.take_damage(2), 1);
        assert_eq!(enemy.hp, 39);
    }

    #[test]
    fn test_hp_never_negative() {
        let mut enemy = goblin();
        enemy.take_damage(500);
        assert_eq!(enemy.hp, 0);
        assert!(!enemy.is_alive());
    }
}
