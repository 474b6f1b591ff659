// Headless driver
//
// Reads a key script from stdin, one frame per line:
//
//   ENTER          press and release ENTER
//   +D             start holding D
//   -D             release D
//   wait 30        run 30 frames with no new input
//
// Runs until the lobby quits or the script ends. An optional first argument
// overrides the config file path.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tile_rpg::config::GameConfig;
use tile_rpg::states::{default_states, EnterArgs, StateId};
use tile_rpg::{GameContext, GameStateManager};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tile_rpg=info")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(GameConfig::default_path);
    let config = GameConfig::load(&config_path).context("loading config")?;
    let mut ctx = GameContext::from_config(&config).context("building game context")?;

    let mut manager = GameStateManager::new();
    for state in default_states() {
        manager.register(state);
    }
    if !manager.switch_to(StateId::Lobby, &mut ctx, EnterArgs::None) {
        anyhow::bail!("lobby state is not registered");
    }
    info!(config = %config_path.display(), "Game started");

    let mut frames: u64 = 0;
    let mut last_message: Option<String> = None;
    for line in io::stdin().lock().lines() {
        let line = line.context("reading input script")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let mut wait = 1;
        match tokens.as_slice() {
            ["wait", n] => wait = n.parse().with_context(|| format!("bad frame count {n}"))?,
            keys => {
                for key in keys {
                    if let Some(key) = key.strip_prefix('+') {
                        manager.handle_key_press(key, &mut ctx);
                    } else if let Some(key) = key.strip_prefix('-') {
                        manager.handle_key_release(key, &mut ctx);
                    } else {
                        manager.handle_key_press(key, &mut ctx);
                        manager.handle_key_release(key, &mut ctx);
                    }
                }
            }
        }

        for _ in 0..wait {
            manager.update(FRAME_DT, &mut ctx);
            frames += 1;
            if manager.quit_requested() {
                info!(frames, "Quit requested");
                return Ok(());
            }
        }

        let draw = manager.draw(&ctx);
        debug!(layers = ?draw.order(), notifications = draw.notifications.len(), "Frame drawn");
        if let Some(message) = ctx.notifications.latest() {
            if last_message.as_deref() != Some(message.text.as_str()) {
                let state = manager.active_state().map_or("-", |s| s.name());
                println!("[{state}] {}", message.text);
                last_message = Some(message.text.clone());
            }
        }
    }

    info!(frames, "Input script finished");
    Ok(())
}
