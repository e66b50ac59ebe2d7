//! Game state and core simulation types
//!
//! Integer pixel coordinates throughout, origin at the top-left corner
//! with y growing downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{PaddleHit, resolve_paddle_collision};
use crate::consts::STEP;

/// Which side a point is credited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Computer,
}

/// Player and computer point counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub computer: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Computer => self.computer += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        }
    }
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball bounced off the top, bottom or right wall
    WallBounce,
    /// Ball was deflected by the paddle
    PaddleHit(PaddleHit),
    /// Ball got past the paddle and was relaunched from the center
    BallMissed,
    /// A point was credited after a miss
    PointScored(Side),
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height (from the paddle sprite)
    pub size: IVec2,
    /// Vertical velocity intent: -1 (up), 0, +1 (down)
    pub velocity: i32,
}

impl Paddle {
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self {
            pos,
            size,
            velocity: 0,
        }
    }

    /// Place the paddle one paddle-width in from the left edge, vertically centered
    pub fn spawn(size: IVec2, bounds: IVec2) -> Self {
        Self::new(IVec2::new(size.x, bounds.y / 2), size)
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Move one step in the velocity direction.
    ///
    /// Motion that would push further past an edge is blocked while motion
    /// back toward the playfield is always allowed. This is not a hard clamp:
    /// starting close to an edge the paddle may overshoot by less than one step.
    pub fn update(&mut self, screen_height: i32) {
        let can_rise = self.pos.y > 0 && self.velocity != 1;
        let can_sink = self.pos.y < screen_height - self.size.y && self.velocity != -1;
        if can_rise || can_sink {
            self.pos.y += STEP * self.velocity;
        }
    }
}

/// Result of a single ball update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallUpdate {
    /// Ball was past the paddle edge and got relaunched
    pub missed: bool,
    /// At least one wall reflection happened
    pub wall_bounce: bool,
    /// Paddle deflection (both flags false when the paddle was not hit)
    pub paddle_hit: PaddleHit,
}

/// The ball (a square sprite treated as a circle of radius width/2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height (from the ball sprite)
    pub size: IVec2,
    /// Per-axis direction, each component -1 or +1
    pub vel: IVec2,
}

impl Ball {
    pub fn new(pos: IVec2, size: IVec2, vel: IVec2) -> Self {
        Self { pos, size, vel }
    }

    /// Initial placement: sprite centered on screen, heading up and left
    pub fn spawn(size: IVec2, bounds: IVec2) -> Self {
        Self::new(bounds / 2 - size / 2, size, IVec2::NEG_ONE)
    }

    /// Canonical relaunch position after a miss
    pub fn relaunch_position(size: IVec2, bounds: IVec2) -> IVec2 {
        bounds / 2 - size
    }

    pub fn relaunch(&mut self, bounds: IVec2) {
        self.pos = Self::relaunch_position(self.size, bounds);
        self.vel = IVec2::NEG_ONE;
    }

    /// Effective radius used by paddle collision
    pub fn radius(&self) -> i32 {
        self.size.x / 2
    }

    /// Advance the ball one tick against the screen bounds and the paddle
    pub fn update(&mut self, paddle: &Paddle, bounds: IVec2) -> BallUpdate {
        let mut result = BallUpdate::default();

        if self.pos.x <= 0 {
            self.relaunch(bounds);
            result.missed = true;
            return result;
        }

        if self.pos.y <= 0 || self.pos.y + self.size.y >= bounds.y {
            self.vel.y = -self.vel.y;
            result.wall_bounce = true;
        }

        // The right-wall check uses the sprite height as its extent (square sprite)
        if self.pos.x + self.size.y >= bounds.x {
            self.vel.x = -self.vel.x;
            result.wall_bounce = true;
        }

        result.paddle_hit = resolve_paddle_collision(paddle, self);

        self.pos += self.vel * STEP;
        result
    }
}

/// Complete simulation state, owned by the frame orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Screen width and height
    pub bounds: IVec2,
    pub paddle: Paddle,
    pub ball: Ball,
    pub score: Score,
    /// Side credited on a miss (None keeps the score untouched)
    pub award_miss_to: Option<Side>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create the start-of-run state from screen bounds and sprite sizes
    pub fn new(bounds: IVec2, paddle_size: IVec2, ball_size: IVec2) -> Self {
        Self {
            bounds,
            paddle: Paddle::spawn(paddle_size, bounds),
            ball: Ball::spawn(ball_size, bounds),
            score: Score::default(),
            award_miss_to: None,
            time_ticks: 0,
        }
    }

    pub fn with_award_miss_to(mut self, side: Option<Side>) -> Self {
        self.award_miss_to = side;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: IVec2 = IVec2::new(640, 480);
    const PADDLE: IVec2 = IVec2::new(10, 60);
    const BALL: IVec2 = IVec2::new(8, 8);

    fn paddle_at(y: i32, velocity: i32) -> Paddle {
        Paddle {
            velocity,
            ..Paddle::new(IVec2::new(10, y), PADDLE)
        }
    }

    #[test]
    fn test_paddle_spawn_position() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        assert_eq!(paddle.pos, IVec2::new(10, 240));
        assert_eq!(paddle.velocity, 0);
    }

    #[test]
    fn test_paddle_blocked_at_top() {
        let mut paddle = paddle_at(0, -1);
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, 0);

        paddle.velocity = 1;
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, STEP);
    }

    #[test]
    fn test_paddle_blocked_at_bottom() {
        let floor = BOUNDS.y - PADDLE.y;
        let mut paddle = paddle_at(floor, 1);
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, floor);

        paddle.velocity = -1;
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, floor - STEP);
    }

    #[test]
    fn test_paddle_overshoot_then_corrective_motion() {
        let mut paddle = paddle_at(1, -1);
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, 1 - STEP);

        // Further upward motion is blocked, downward is still honored
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, 1 - STEP);
        paddle.velocity = 1;
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, 1);
    }

    #[test]
    fn test_paddle_idle_does_not_move() {
        let mut paddle = paddle_at(100, 0);
        paddle.update(BOUNDS.y);
        assert_eq!(paddle.pos.y, 100);
    }

    #[test]
    fn test_ball_spawn_centered() {
        let ball = Ball::spawn(BALL, BOUNDS);
        assert_eq!(ball.pos, IVec2::new(316, 236));
        assert_eq!(ball.vel, IVec2::new(-1, -1));
    }

    #[test]
    fn test_ball_spawn_first_update() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        let mut ball = Ball::spawn(BALL, BOUNDS);
        let result = ball.update(&paddle, BOUNDS);
        assert_eq!(ball.pos, IVec2::new(316 - STEP, 236 - STEP));
        assert_eq!(result, BallUpdate::default());
    }

    #[test]
    fn test_ball_relaunch_on_miss() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        let mut ball = Ball::new(IVec2::new(0, 37), BALL, IVec2::new(-1, 1));
        let result = ball.update(&paddle, BOUNDS);
        assert!(result.missed);
        assert_eq!(ball.pos, IVec2::new(320 - 8, 240 - 8));
        assert_eq!(ball.vel, IVec2::NEG_ONE);
    }

    #[test]
    fn test_ball_bounces_off_top() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        let mut ball = Ball::new(IVec2::new(300, 0), BALL, IVec2::new(-1, -1));
        let result = ball.update(&paddle, BOUNDS);
        assert!(result.wall_bounce);
        assert_eq!(ball.vel, IVec2::new(-1, 1));
        assert_eq!(ball.pos, IVec2::new(300 - STEP, STEP));
    }

    #[test]
    fn test_ball_bounces_off_bottom() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        let mut ball = Ball::new(IVec2::new(300, 472), BALL, IVec2::new(1, 1));
        ball.update(&paddle, BOUNDS);
        assert_eq!(ball.vel, IVec2::new(1, -1));
    }

    #[test]
    fn test_ball_bounces_off_right_wall_using_height() {
        let paddle = Paddle::spawn(PADDLE, BOUNDS);
        // Tall sprite: height decides the right-wall extent
        let mut ball = Ball::new(IVec2::new(620, 200), IVec2::new(8, 20), IVec2::new(1, 1));
        let result = ball.update(&paddle, BOUNDS);
        assert!(result.wall_bounce);
        assert_eq!(ball.vel.x, -1);
    }

    #[test]
    fn test_score_award() {
        let mut score = Score::default();
        score.award(Side::Computer);
        score.award(Side::Computer);
        score.award(Side::Player);
        assert_eq!(score.get(Side::Computer), 2);
        assert_eq!(score.get(Side::Player), 1);
    }
}
