//! Paddle Pong - a single-paddle arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (paddle, ball, collisions, scoring)
//! - `platform`: Frame clock, pacing and input event sources
//! - `renderer`: Drawing collaborators (terminal and headless backends)
//! - `game`: Frame orchestrator tying the above together once per tick
//! - `settings`: Load-time configuration

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{Game, RunState};
pub use settings::{AssetPaths, Settings};

/// Game configuration constants
pub mod consts {
    /// Per-tick displacement applied to velocity-scaled motion (paddle and ball)
    pub const STEP: i32 = 3;

    /// Screen dimensions in pixels
    pub const DEFAULT_SCREEN_WIDTH: i32 = 640;
    pub const DEFAULT_SCREEN_HEIGHT: i32 = 480;

    /// Frame pacing target
    pub const DEFAULT_TARGET_FPS: u32 = 60;

    /// HUD font size in points
    pub const DEFAULT_FONT_SIZE: f32 = 24.0;

    /// Window/terminal title
    pub const TITLE: &str = "Pong";
}
