//! Main menu loop around a game session

use crate::battle_input::TerminalInput;
use crate::prompt::Prompt;
use anyhow::Result;
use rand::Rng;
use rpg_core::combat::BattleReport;
use rpg_core::config::GameConstants;
use rpg_core::save::list_saves;
use rpg_core::session::{ExploreOutcome, GameSession};
use rpg_core::types::EquipmentSlot;
use rpg_core::GameData;
use tracing::info;

/// New game or load; `None` when the player backs out
pub fn start<R: Rng>(
    prompt: &mut Prompt,
    data: GameData,
    constants: GameConstants,
    rng: R,
) -> Result<Option<GameSession<R>>> {
    println!("1) New game  2) Load game");
    match prompt.ask(">").as_deref() {
        Some("2") => {
            let saves = list_saves(&constants.paths.saves_dir)?;
            let Some(path) = prompt.choose("Saved games:", &saves, |p| {
                p.file_name().map_or_else(String::new, |n| n.to_string_lossy().to_string())
            }) else {
                return Ok(None);
            };
            let (session, notices) = GameSession::load(path, data, constants, rng)?;
            for notice in notices {
                println!("Unequipped {} from {}: {}", notice.item_id, notice.slot, notice.reason);
            }
            println!("Welcome back, {}.", session.player.name);
            Ok(Some(session))
        }
        Some("1") => {
            let Some(name) = prompt.ask("Name your hero:").filter(|n| !n.is_empty()) else {
                return Ok(None);
            };
            let classes: Vec<(String, String)> = data
                .classes
                .iter()
                .map(|(id, class)| (id.clone(), format!("{} - {}", class.name, class.description)))
                .collect();
            let Some((class_id, _)) = prompt.choose("Choose a class:", &classes, |(_, label)| label.clone()) else {
                return Ok(None);
            };
            let class_id = class_id.clone();
            let session = GameSession::new_game(data, constants, &name, &class_id, rng)?;
            Ok(Some(session))
        }
        _ => Ok(None),
    }
}

/// Run menus until the player quits or stdin closes
pub fn run<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) -> Result<()> {
    loop {
        print_status(session);
        println!("1) Explore  2) Travel  3) Challenge boss  4) Inventory  5) Equipment");
        println!("6) Shop  7) Rest  8) Tavern  9) Missions  s) Save  q) Quit");
        let Some(choice) = prompt.ask(">") else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => match session.explore(&mut TerminalInput::new(prompt)) {
                ExploreOutcome::Battle(report) => print_report(&report),
                ExploreOutcome::FoundGold(gold) => println!("You found {} gold!", gold),
                ExploreOutcome::Quiet => println!("Nothing stirs."),
                ExploreOutcome::Handled => {}
            },
            "2" => travel(session, prompt),
            "3" => challenge_boss(session, prompt),
            "4" => inventory(session, prompt),
            "5" => equipment(session, prompt),
            "6" => shop(session, prompt),
            "7" => match session.rest() {
                Ok(receipt) => println!("You rest for {} gold and feel restored.", receipt.cost),
                Err(err) => println!("{}", err),
            },
            "8" => tavern(session, prompt),
            "9" => missions(session, prompt),
            "s" => {
                let path = session.save()?;
                println!("Saved to {}", path.display());
            }
            "q" => {
                info!("player quit");
                return Ok(());
            }
            other => println!("Unknown choice '{}'.", other),
        }
    }
}

fn print_status<R: Rng>(session: &GameSession<R>) {
    let player = &session.player;
    let area = session
        .area()
        .map_or(session.current_area.as_str(), |a| a.name.as_str());
    println!();
    println!(
        "== {} the {} | Lv {} ({}) | {}/{} exp | {} ==",
        player.name, player.class_data.name, player.level, player.rank, player.experience,
        player.experience_to_next, area
    );
    println!(
        "HP {}/{}  MP {}/{}  ATK {}  DEF {}  SPD {}  Gold {}",
        player.hp,
        player.effective_max_hp(),
        player.mp,
        player.effective_max_mp(),
        player.effective_attack(),
        player.effective_defense(),
        player.effective_speed(),
        player.gold
    );
}

fn print_report(report: &BattleReport) {
    for event in &report.events {
        println!("  {}", event);
    }
    for mission_id in &report.missions_completed {
        println!("Mission complete: {}", mission_id);
    }
    println!("{}", report.summary());
}

fn travel<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    let Some(here) = session.area() else {
        return;
    };
    let exits: Vec<(String, String)> = here
        .connections
        .iter()
        .map(|id| (id.clone(), session.data.area(id).map_or_else(|| id.clone(), |a| a.name.clone())))
        .collect();
    let Some((area_id, _)) = prompt.choose("Travel to:", &exits, |(_, name)| name.clone()) else {
        return;
    };
    let area_id = area_id.clone();
    match session.travel(&area_id, &mut TerminalInput::new(prompt)) {
        Ok(outcome) => {
            if let Some(area) = session.data.area(&outcome.area) {
                println!("You arrive at {}. {}", area.name, area.description);
            }
            if let Some(report) = outcome.encounter {
                print_report(&report);
            }
        }
        Err(err) => println!("{}", err),
    }
}

fn challenge_boss<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    let bosses: Vec<(String, String)> = session
        .area()
        .map(|a| a.possible_bosses.clone())
        .unwrap_or_default()
        .into_iter()
        .map(|id| {
            let name = session.data.bosses.get(&id).map_or_else(|| id.clone(), |b| b.base.name.clone());
            (id, name)
        })
        .collect();
    let Some((boss_id, _)) = prompt.choose("Challenge:", &bosses, |(_, name)| name.clone()) else {
        return;
    };
    let boss_id = boss_id.clone();
    match session.fight_boss(&boss_id, &mut TerminalInput::new(prompt)) {
        Ok(report) => print_report(&report),
        Err(err) => println!("{}", err),
    }
}

fn inventory<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    for item_id in session.player.inventory.iter() {
        println!("  - {}", session.data.item_name(item_id));
    }
    let consumables: Vec<String> = session
        .player
        .inventory
        .consumables(&session.data)
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();
    let Some(item_id) = prompt.choose("Use an item:", &consumables, |id| session.data.item_name(id).to_string())
    else {
        return;
    };
    let item_id = item_id.clone();
    match session.use_item(&item_id) {
        Ok(used) => println!("Recovered {} HP and {} MP.", used.healed, used.mp_restored),
        Err(err) => println!("{}", err),
    }
}

fn equipment<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    for slot in EquipmentSlot::all() {
        let item = session.player.equipment.get(*slot).map_or("-", |id| session.data.item_name(id));
        println!("  {}: {}", slot, item);
    }
    println!("1) Equip  2) Unequip");
    match prompt.ask(">").as_deref() {
        Some("1") => {
            let equippable: Vec<String> = session
                .player
                .inventory
                .iter()
                .filter(|id| session.data.item(id).map_or(false, |i| i.item_type.is_equippable()))
                .cloned()
                .collect();
            let Some(item_id) = prompt.choose("Equip:", &equippable, |id| session.data.item_name(id).to_string())
            else {
                return;
            };
            let item_id = item_id.clone();
            let mut result = session.equip(&item_id, None);
            if matches!(
                result,
                Err(rpg_core::SessionError::Equip(rpg_core::EquipError::AccessorySlotsFull))
            ) {
                let slots = [EquipmentSlot::Accessory1, EquipmentSlot::Accessory2, EquipmentSlot::Accessory3];
                let Some(slot) = prompt.choose("Replace which accessory?", &slots, |s| s.to_string()) else {
                    return;
                };
                result = session.equip(&item_id, Some(*slot));
            }
            match result {
                Ok(slot) => println!("Equipped in {}.", slot),
                Err(err) => println!("{}", err),
            }
        }
        Some("2") => {
            let Some(slot) = prompt.choose("Unequip which slot?", EquipmentSlot::all(), |s| s.to_string()) else {
                return;
            };
            match session.unequip(*slot) {
                Some(item_id) => println!("Unequipped {}.", session.data.item_name(&item_id)),
                None => println!("That slot is empty."),
            }
        }
        _ => {}
    }
}

fn shop<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    println!("1) Buy  2) Sell");
    match prompt.ask(">").as_deref() {
        Some("1") => {
            let stock: Vec<(String, String)> = session
                .data
                .items
                .iter()
                .map(|(id, item)| (id.clone(), format!("{} - {} gold", item.name, item.price)))
                .collect();
            let Some((item_id, _)) = prompt.choose("Buy:", &stock, |(_, label)| label.clone()) else {
                return;
            };
            let item_id = item_id.clone();
            match session.buy(&item_id) {
                Ok(price) => println!("Bought {} for {} gold.", session.data.item_name(&item_id), price),
                Err(err) => println!("{}", err),
            }
        }
        Some("2") => {
            let mut carried: Vec<String> = session.player.inventory.iter().cloned().collect();
            carried.sort();
            carried.dedup();
            let Some(item_id) = prompt.choose("Sell:", &carried, |id| session.data.item_name(id).to_string()) else {
                return;
            };
            let item_id = item_id.clone();
            match session.sell(&item_id) {
                Ok(price) => println!("Sold for {} gold.", price),
                Err(err) => println!("{}", err),
            }
        }
        _ => {}
    }
}

fn tavern<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    for (idx, companion) in session.player.companions.iter().enumerate() {
        println!("  [{}] {} (level {})", idx + 1, companion.name, companion.level);
    }
    println!("1) Hire  2) Dismiss");
    match prompt.ask(">").as_deref() {
        Some("1") => {
            let hirable: Vec<(String, String)> = session
                .data
                .companions
                .iter()
                .map(|(id, def)| (id.clone(), format!("{} - {} gold", def.name, def.price)))
                .collect();
            let Some((companion_id, _)) = prompt.choose("Hire:", &hirable, |(_, label)| label.clone()) else {
                return;
            };
            let companion_id = companion_id.clone();
            match session.hire(&companion_id) {
                Ok(_) => println!("A new companion joins you."),
                Err(err) => println!("{}", err),
            }
        }
        Some("2") => {
            let Some(answer) = prompt.ask("Dismiss which number?") else {
                return;
            };
            match answer.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(index) => match session.dismiss(index) {
                    Ok(name) => println!("{} leaves the party.", name),
                    Err(err) => println!("{}", err),
                },
                None => println!("Not a number."),
            }
        }
        _ => {}
    }
}

fn missions<R: Rng>(session: &mut GameSession<R>, prompt: &mut Prompt) {
    for (mission_id, progress) in &session.missions.progress {
        let name = session.data.missions.get(mission_id).map_or(mission_id.as_str(), |m| m.name.as_str());
        let state = if progress.completed { " (ready to claim)" } else { "" };
        println!("  {}: {}{}", name, progress.describe(), state);
    }
    println!("1) Accept  2) Claim");
    match prompt.ask(">").as_deref() {
        Some("1") => {
            let open: Vec<(String, String)> = session
                .data
                .missions
                .iter()
                .filter(|(id, _)| {
                    !session.missions.progress.contains_key(*id)
                        && !session.missions.completed_missions.contains(*id)
                })
                .map(|(id, m)| (id.clone(), format!("{} - {}", m.name, m.description)))
                .collect();
            let Some((mission_id, _)) = prompt.choose("Accept:", &open, |(_, label)| label.clone()) else {
                return;
            };
            let mission_id = mission_id.clone();
            match session.accept_mission(&mission_id) {
                Ok(()) => println!("Mission accepted."),
                Err(err) => println!("{}", err),
            }
        }
        Some("2") => {
            let ready: Vec<String> = session.missions.claimable().into_iter().map(str::to_string).collect();
            let Some(mission_id) = prompt.choose("Claim:", &ready, |id| id.clone()) else {
                return;
            };
            let mission_id = mission_id.clone();
            match session.claim_mission(&mission_id) {
                Ok(claimed) => {
                    println!(
                        "Rewards: {} exp, {} gold.",
                        claimed.reward.experience, claimed.reward.gold
                    );
                    if let Some(level_up) = claimed.level_ups.last() {
                        println!("You reached level {}!", level_up.level);
                    }
                }
                Err(err) => println!("{}", err),
            }
        }
        _ => {}
    }
}
