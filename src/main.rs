//! # Overtime Main Entry Point
//!
//! Command-line demo: generates a tower floor and lets a scripted bot play
//! it, printing the message stream. Useful for smoke-testing generation and
//! the turn pipeline without a front end.

use clap::Parser;
use log::{debug, info, LevelFilter};
use overtime::{
    Game, GameEvent, GenerationConfig, GridPos, InputHandler, ItemKind, JsonFileStore,
    MessageImportance, OvertimeError, OvertimeResult, PlayerInput, TurnOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Command line arguments for the Overtime demo.
#[derive(Parser, Debug)]
#[command(name = "overtime")]
#[command(about = "Turn-based office-tower roguelike simulation core")]
#[command(version)]
struct Args {
    /// Random seed for floor generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// World width in rooms
    #[arg(long, default_value_t = 6)]
    width: i32,

    /// World height in rooms
    #[arg(long, default_value_t = 6)]
    height: i32,

    /// Tower level to start on
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Number of bot turns to play
    #[arg(long, default_value_t = 200)]
    turns: u32,

    /// Save file path (omit to play without autosaves)
    #[arg(long)]
    save_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> OvertimeResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Overtime v{}", overtime::VERSION);
    run_bot(&args)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();
}

fn run_bot(args: &Args) -> OvertimeResult<()> {
    let seed = args.seed.unwrap_or(12345);
    let config = GenerationConfig {
        world_width: args.width,
        world_height: args.height,
        tower_level: args.level.max(1),
        ..GenerationConfig::new(seed)
    };

    if config.world_width < 1 || config.world_height < 1 {
        return Err(OvertimeError::InvalidState(
            "world dimensions must be positive".to_string(),
        ));
    }
    if config.world_width * config.world_height < 5 {
        return Err(OvertimeError::InvalidState(format!(
            "a {}x{} world cannot hold the critical path; need at least 5 rooms",
            config.world_width, config.world_height
        )));
    }

    info!(
        "Generating floor {} ({}x{} rooms) with seed {}",
        config.tower_level, config.world_width, config.world_height, seed
    );

    let mut game = Game::new(config)?;
    if let Some(path) = &args.save_file {
        game = game.with_save_store(Box::new(JsonFileStore::new(path)));
        info!("Autosaving to {}", path.display());
    }

    let handler = InputHandler::new();
    let mut bot_rng = StdRng::seed_from_u64(seed.wrapping_add(0xB07));
    let mut floors_cleared = 0u32;

    for turn in 0..args.turns {
        let input = pick_bot_input(&mut bot_rng, &game);
        let action = match handler.input_to_action(input, &game.state)? {
            Some(action) => action,
            None => continue,
        };

        let report = game.submit(action)?;
        print_events(&report.events);

        match report.outcome {
            TurnOutcome::FloorCleared => {
                floors_cleared += 1;
                let level = game.advance_floor()?;
                info!("Advanced to floor {} on turn {}", level, turn + 1);
            }
            TurnOutcome::Defeated => {
                info!("The bot burned out on turn {}", turn + 1);
                break;
            }
            TurnOutcome::Consumed | TurnOutcome::NotConsumed => {}
        }
    }

    println!();
    println!("=== Run summary ===");
    println!("Floors cleared: {}", floors_cleared);
    println!("Tower level:    {}", game.state.tower_level);
    println!("Hit points:     {}/{}", game.state.hp, game.state.max_hp);
    println!("Burnout:        {}", game.state.burnout);
    println!("Credits:        {}", game.state.credits);
    println!("Rooms visited:  {}", game.state.visited_rooms.len());
    Ok(())
}

/// A blunt but serviceable bot: drink coffee when hurt, otherwise wander,
/// occasionally sprinting or standing still.
fn pick_bot_input(rng: &mut StdRng, game: &Game) -> PlayerInput {
    if game.state.hp < game.state.max_hp / 2 {
        if let Some(index) = game.state.find_item(ItemKind::Coffee) {
            return PlayerInput::UseItem { index };
        }
    }

    let delta = match rng.gen_range(0..5) {
        0 => GridPos::new(0, -1),
        1 => GridPos::new(0, 1),
        2 => GridPos::new(-1, 0),
        3 => GridPos::new(1, 0),
        _ => return PlayerInput::Wait,
    };
    PlayerInput::Move {
        delta,
        sprint: rng.gen_bool(0.1),
    }
}

fn print_events(events: &[GameEvent]) {
    for event in events {
        if let GameEvent::Message { text, importance } = event {
            match importance {
                MessageImportance::Low => debug!("{}", text),
                MessageImportance::Normal | MessageImportance::High => println!("  {}", text),
                MessageImportance::Critical => println!("*** {} ***", text),
            }
        }
    }
}
