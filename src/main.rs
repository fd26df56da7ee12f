//! Tirapiedras headless runner
//!
//! Plays the simulation with the autopilot at a fixed 60 Hz and reports how
//! far it got. Usage: `tirapiedras [settings.json] [seconds]`

use std::path::PathBuf;

use tirapiedras::sim::{GameEvent, GameState, TickInput, tick};
use tirapiedras::{RenderSnapshot, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 180.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(s)) if s > 0.0 => s,
        Some(_) => {
            log::warn!("Invalid duration, running for {DEFAULT_SECONDS}s");
            DEFAULT_SECONDS
        }
        None => DEFAULT_SECONDS,
    };

    let settings = Settings::load_or_default(settings_path.as_deref());
    log::info!(
        "Tirapiedras starting: {}x{} world, seed {}",
        settings.world_width,
        settings.world_height,
        settings.seed
    );

    let mut state = GameState::new(settings);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut kills = 0u32;
    let mut throws = 0u32;
    for _ in 0..frames {
        tick(&mut state, &input, FRAME_DT);
        for event in &state.events {
            match event {
                GameEvent::EnemyDefeated { .. } => kills += 1,
                GameEvent::RockThrown { .. } => throws += 1,
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    let snapshot = RenderSnapshot::capture(&state);
    let hud = &snapshot.hud;
    println!(
        "{} after {:.1}s: score {}, level {} (cycle {}, difficulty x{}), {} lives, {}/{} hp",
        if hud.game_over { "Game over" } else { "Still alive" },
        state.time,
        hud.score,
        hud.level,
        hud.cycle,
        hud.difficulty,
        hud.lives,
        hud.hp,
        hud.max_hp
    );
    println!(
        "{} rocks thrown, {} enemies defeated, {} rocks on the field",
        throws,
        kills,
        snapshot.rocks.len()
    );
}
