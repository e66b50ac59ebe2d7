//! Paddle Pong entry point
//!
//! Parses the command line, loads settings, brings up a backend and runs
//! the game loop. Exit code 0 on quit, 1 on any fatal error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::IVec2;

use paddle_pong::game::Platform;
use paddle_pong::renderer::{HeadlessBackend, TerminalBackend};
use paddle_pong::{Game, GameError, Settings};

#[derive(Debug, Parser)]
#[command(name = "paddle-pong", version, about = "Single-paddle Pong in the terminal")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the frame pacing target
    #[arg(long)]
    fps: Option<u32>,

    /// Directory relative asset paths are resolved against
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Run without a terminal, recording frames in memory
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode before quitting (at least 1)
    #[arg(
        long,
        default_value_t = 600,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    frames: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("paddle-pong: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), GameError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(fps) = args.fps {
        settings.target_fps = fps;
    }
    if let Some(dir) = &args.assets {
        settings.assets = settings.assets.rooted_at(dir);
    }
    settings.validate()?;

    log::info!("Paddle Pong starting...");
    if args.headless {
        let mut backend = HeadlessBackend::new().quit_after(args.frames - 1);
        play(&mut backend, settings)?;
        println!("Ran {} headless frames", backend.frames().len());
        Ok(())
    } else {
        let screen = IVec2::new(settings.screen_width, settings.screen_height);
        let mut backend = TerminalBackend::new(screen)?;
        play(&mut backend, settings)
    }
}

fn play<P: Platform>(platform: &mut P, settings: Settings) -> Result<(), GameError> {
    let mut game = Game::new(platform, settings)?;
    game.run(platform)?;
    let score = game.state.score;
    log::info!("Final score: player {}, computer {}", score.player, score.computer);
    Ok(())
}
