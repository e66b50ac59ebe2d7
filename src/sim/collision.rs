//! Ball vs paddle collision
//!
//! An axis-aligned approximation: the ball is a square sprite whose
//! half-width stands in as the radius on both axes. Side and top/bottom
//! contacts are tested independently, so a corner contact flips both axes.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Paddle};

/// Which faces of the paddle the ball touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddleHit {
    /// Ball reached the paddle's right face within its vertical span
    pub side: bool,
    /// Ball overlapped the paddle's top or bottom face within its horizontal span
    pub top_bottom: bool,
}

impl PaddleHit {
    pub fn any(&self) -> bool {
        self.side || self.top_bottom
    }
}

/// Test the ball against the paddle and flip the velocity axes that were hit.
///
/// Only a ball heading left (toward the paddle) is tested; a ball moving
/// away is never deflected again during the same approach.
pub fn resolve_paddle_collision(paddle: &Paddle, ball: &mut Ball) -> PaddleHit {
    if ball.vel.x != -1 {
        return PaddleHit::default();
    }

    let r = ball.radius();
    let center_x = ball.pos.x + r;
    let center_y = ball.pos.y + r;

    let hit = PaddleHit {
        side: center_y >= paddle.pos.y
            && center_y <= paddle.bottom()
            && ball.pos.x <= paddle.right(),
        top_bottom: center_x >= paddle.pos.x
            && center_x <= paddle.right()
            && ball.pos.y + ball.size.y >= paddle.pos.y
            && ball.pos.y <= paddle.bottom(),
    };

    if hit.side {
        ball.vel.x = -ball.vel.x;
    }
    if hit.top_bottom {
        ball.vel.y = -ball.vel.y;
    }
    if hit.any() {
        log::debug!("Paddle hit at {:?}: {:?}", ball.pos, hit);
    }

    hit
}
