//! Shared fixtures for unit tests

use crate::character::Character;
use crate::config::ProgressionConstants;
use crate::data::GameData;
use rand::rngs::mock::StepRng;

pub(crate) fn sample_data() -> GameData {
    GameData::builtin().unwrap()
}

/// A level 1 warrior with stats computed
pub(crate) fn warrior(data: &GameData) -> Character {
    let mut hero = Character::new(
        "Tester",
        "warrior",
        &data.classes["warrior"],
        &ProgressionConstants::default(),
    );
    hero.recompute_stats(data);
    hero
}

/// Rng whose every `f64` draw is about `p` while integer ranges yield their low bound
pub(crate) fn fixed_draw(p: f64) -> StepRng {
    let bits = ((p * (1u64 << 21) as f64) as u64) << 43;
    StepRng::new(bits, 0)
}
