//! Fixtures shared by the integration tests

#![allow(dead_code)]

use rand::rngs::mock::StepRng;
use rpg_core::config::ProgressionConstants;
use rpg_core::data::{ClassDef, EnemyDef, StatLine};
use rpg_core::{Character, GameData};

pub fn game_data() -> GameData {
    GameData::builtin().expect("bundled data should parse")
}

/// A level 1 character of a built-in class, stats computed
pub fn hero(data: &GameData, class_id: &str) -> Character {
    let class = data.class(class_id).expect("class exists");
    let mut hero = Character::new("Hero", class_id, class, &ProgressionConstants::default());
    hero.recompute_stats(data);
    hero
}

/// A level 1 character with hand-picked base stats
pub fn custom_hero(data: &GameData, stats: StatLine) -> Character {
    let class = ClassDef {
        name: "Tester".to_string(),
        base_stats: stats,
        ..ClassDef::default()
    };
    let mut hero = Character::new("Hero", "tester", &class, &ProgressionConstants::default());
    hero.recompute_stats(data);
    hero
}

pub fn training_dummy(hp: i32, attack: i32, defense: i32, speed: i32) -> EnemyDef {
    EnemyDef {
        name: "Training Dummy".to_string(),
        hp,
        attack,
        defense,
        speed,
        experience_reward: 20,
        gold_reward: 15,
        loot_table: vec![],
    }
}

/// Rng whose every `f64` draw is about `p` while integer ranges yield their low bound
pub fn fixed_draw(p: f64) -> StepRng {
    let bits = ((p * (1u64 << 21) as f64) as u64) << 43;
    StepRng::new(bits, 0)
}
