//! Integration test: Play -> Save -> Load
//!
//! Saves go through real files in a temp directory.

mod common;

use common::{game_data, hero};
use rand::rngs::mock::StepRng;
use rpg_core::config::GameConstants;
use rpg_core::data::MissionKind;
use rpg_core::save::{self, list_saves, read_save, SaveRecord, EMERGENCY_PREFIX, SAVE_VERSION};
use rpg_core::types::EquipmentSlot;
use rpg_core::{GameSession, MissionLog, MissionTracker};
use tempfile::TempDir;

fn constants_in(dir: &TempDir) -> GameConstants {
    let mut constants = GameConstants::default();
    constants.paths.saves_dir = dir.path().to_path_buf();
    constants
}

#[test]
fn test_session_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let constants = constants_in(&dir);
    let mut game = GameSession::new_game(game_data(), constants.clone(), "Aria", "warrior", StepRng::new(0, 0))
        .expect("new game");

    // =========================================================================
    // Build up some state worth saving
    // =========================================================================
    game.buy("rusty_sword").expect("affordable");
    game.equip("rusty_sword", None).expect("equippable");
    game.hire("squire").expect("affordable");
    game.accept_mission("goblin_trouble").expect("known mission");
    game.missions.update_mission_progress(MissionKind::Kill, "goblin", 2);
    game.player.bosses_killed.insert("Goblin King".to_string(), chrono::Utc::now());
    game.visited_areas.push("dark_forest".to_string());
    game.current_area = "dark_forest".to_string();
    game.player.hp = 77;

    let path = game.save().expect("save written");
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("Aria_"));
    assert!(file_name.ends_with("_warrior_1.json"));
    assert_eq!(list_saves(dir.path()).unwrap(), vec![path.clone()]);

    // =========================================================================
    // Load it back
    // =========================================================================
    let (loaded, notices) =
        GameSession::load(&path, game_data(), constants, StepRng::new(0, 0)).expect("save loads");
    assert!(notices.is_empty());

    assert_eq!(loaded.player.uuid, game.player.uuid);
    assert_eq!(loaded.player.equipment, game.player.equipment);
    assert_eq!(loaded.player.companions, game.player.companions);
    assert_eq!(loaded.player.stats, game.player.stats);
    assert_eq!(loaded.player.hp, 77);
    assert_eq!(loaded.player.gold, game.player.gold);
    assert_eq!(loaded.player.bosses_killed.len(), 1);
    assert_eq!(loaded.current_area, "dark_forest");
    assert_eq!(loaded.visited_areas, game.visited_areas);
    assert_eq!(loaded.missions.progress["goblin_trouble"].current_count, 2);
}

#[test]
fn test_load_unequips_invalid_items() {
    let dir = TempDir::new().expect("temp dir");
    let data = game_data();
    let mut player = hero(&data, "warrior");
    player.equipment.set(EquipmentSlot::Weapon, "iron_sword");
    player.equipment.set(EquipmentSlot::Armor, "silver_ring");
    player.equipment.set(EquipmentSlot::Accessory1, "swift_charm");

    let record = SaveRecord::capture(&player, "starting_village", &[], &MissionLog::new(), chrono::Utc::now());
    let path = save::write_save(dir.path(), "", &record).expect("save written");

    let loaded = read_save(&path)
        .expect("save reads")
        .restore(&data, "starting_village");

    let dropped: Vec<_> = loaded.notices.iter().map(|n| n.slot).collect();
    assert_eq!(dropped, vec![EquipmentSlot::Weapon, EquipmentSlot::Armor]);
    assert_eq!(loaded.player.equipment.get(EquipmentSlot::Weapon), None);
    assert_eq!(loaded.player.equipment.get(EquipmentSlot::Accessory1), Some("swift_charm"));
    assert_eq!(loaded.player.effective_speed(), 11);
}

#[test]
fn test_legacy_companions_and_unknown_area() {
    let dir = TempDir::new().expect("temp dir");
    let data = game_data();
    let player = hero(&data, "warrior");
    let record = SaveRecord::capture(&player, "sunken_city", &[], &MissionLog::new(), chrono::Utc::now());

    // Older saves kept companions as bare display names
    let mut json = serde_json::to_value(&record).unwrap();
    json["player"]["companions"] = serde_json::json!(["Squire"]);
    json["save_version"] = serde_json::json!("2.0");
    let path = dir.path().join("legacy.json");
    std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

    let loaded = read_save(&path)
        .expect("legacy save reads")
        .restore(&data, "starting_village");

    assert_eq!(loaded.current_area, "starting_village");
    assert_eq!(loaded.player.companions.len(), 1);
    assert_eq!(loaded.player.companions[0].id, "squire");
    assert_eq!(loaded.player.companions[0].level, 1);
    // Squire's defense bonus is back in the rebuilt stats
    assert_eq!(loaded.player.effective_defense(), 14);
}

#[test]
fn test_emergency_save_is_marked() {
    let dir = TempDir::new().expect("temp dir");
    let game = GameSession::new_game(game_data(), constants_in(&dir), "Aria", "mage", StepRng::new(0, 0))
        .expect("new game");

    let emergency = game.emergency_save("battle loop panicked").expect("emergency save");
    let save_name = emergency.save.file_name().unwrap().to_string_lossy().to_string();
    let log_name = emergency.log.file_name().unwrap().to_string_lossy().to_string();
    assert!(save_name.starts_with(EMERGENCY_PREFIX));
    assert!(log_name.starts_with("err_save_unstable_Aria_error_"));
    assert!(log_name.ends_with(".log"));

    let record = read_save(&emergency.save).expect("emergency save reads");
    assert_eq!(record.save_version, SAVE_VERSION);
    assert_eq!(record.player.character_class, "mage");
}
