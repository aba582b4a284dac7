//! Terminal entry point for the rpg_core engine.
//!
//! Usage: `rpg_cli [balance.toml]`. Logs go to stderr, filtered by `RUST_LOG`.

mod battle_input;
mod menu;
mod prompt;

use anyhow::{anyhow, Context, Result};
use prompt::Prompt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rpg_core::config::{default_constants, load_constants};
use rpg_core::session::GameSession;
use rpg_core::GameData;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{error, info};

fn main() -> Result<()> {
    setup_logging();

    let constants = match std::env::args().nth(1) {
        Some(path) => load_constants(Path::new(&path))
            .with_context(|| format!("loading balance constants from {}", path))?,
        None => default_constants(),
    };
    let data = match constants.paths.data_dir {
        Some(ref dir) => GameData::load_from_dir(dir)
            .with_context(|| format!("loading game data from {}", dir.display()))?,
        None => GameData::builtin().context("parsing bundled game data")?,
    };

    let mut prompt = Prompt::stdin();
    let rng = ChaCha8Rng::from_entropy();
    let Some(mut session) = menu::start(&mut prompt, data, constants, rng)? else {
        return Ok(());
    };
    info!(player = %session.player.name, "session started");

    // Anything escaping the menu loop gets an emergency save before exit
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| menu::run(&mut session, &mut prompt)));
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            emergency_save(&session, &format!("{:#}", err));
            Err(err)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            emergency_save(&session, &message);
            Err(anyhow!("unexpected fault: {}", message))
        }
    }
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emergency_save(session: &GameSession<ChaCha8Rng>, message: &str) {
    error!(%message, "fatal error in game loop");
    match session.emergency_save(message) {
        Ok(files) => eprintln!(
            "The game hit an error. Progress was saved to {} (details in {}).",
            files.save.display(),
            files.log.display()
        ),
        Err(err) => eprintln!("The game hit an error and the emergency save failed: {}", err),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
