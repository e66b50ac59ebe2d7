//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per tick, no wall-clock time
//! - Integer arithmetic only
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{PaddleHit, resolve_paddle_collision};
pub use input::{InputEvent, Key, TickInput};
pub use state::{Ball, BallUpdate, GameEvent, GameState, Paddle, Score, Side};
pub use tick::tick;
