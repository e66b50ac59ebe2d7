//! Fixed-step simulation tick
//!
//! Advances paddle then ball by one frame. Velocities are unit integers,
//! so one tick always moves by exactly `STEP` pixels per axis.

use super::input::TickInput;
use super::state::{GameEvent, GameState};

/// Advance the game state by one tick and report what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if let Some(velocity) = input.paddle_velocity {
        state.paddle.velocity = velocity;
    }
    state.paddle.update(state.bounds.y);

    let result = state.ball.update(&state.paddle, state.bounds);

    if result.missed {
        log::debug!("Ball missed at tick {}, relaunching", state.time_ticks);
        events.push(GameEvent::BallMissed);
        if let Some(side) = state.award_miss_to {
            state.score.award(side);
            events.push(GameEvent::PointScored(side));
        }
        return events;
    }

    if result.wall_bounce {
        events.push(GameEvent::WallBounce);
    }
    if result.paddle_hit.any() {
        events.push(GameEvent::PaddleHit(result.paddle_hit));
    }

    events
}
