//! End-to-end frame loop runs against the headless backend

use glam::IVec2;
use paddle_pong::consts::STEP;
use paddle_pong::renderer::HeadlessBackend;
use paddle_pong::sim::{GameEvent, InputEvent, Key, Side};
use paddle_pong::{Game, GameError, RunState, Settings};

fn backend() -> HeadlessBackend {
    HeadlessBackend::new()
        .with_image("background.png", 640, 480)
        .with_image("paddle.png", 10, 60)
        .with_image("ball.png", 8, 8)
        .with_font("DejaVuSans.ttf")
}

#[test]
fn test_held_key_moves_paddle_until_released() {
    let mut script = vec![vec![InputEvent::KeyDown(Key::Up)]];
    script.extend(std::iter::repeat_n(vec![], 9));
    script.push(vec![InputEvent::KeyUp(Key::Up)]);
    let mut platform = backend().with_script(script).quit_after(14);

    let mut game = Game::new(&mut platform, Settings::default()).unwrap();
    game.run(&mut platform).unwrap();

    // Ten frames of upward motion, then the release frame stops it
    assert_eq!(game.state.paddle.pos.y, 240 - 10 * STEP);
    assert_eq!(game.state.paddle.velocity, 0);
    assert_eq!(platform.frames().len(), 15);
}

#[test]
fn test_paddle_stops_at_top_edge() {
    let mut platform = backend()
        .with_script([vec![InputEvent::KeyDown(Key::Up)]])
        .quit_after(199);
    let mut game = Game::new(&mut platform, Settings::default()).unwrap();
    game.run(&mut platform).unwrap();
    assert_eq!(game.state.paddle.pos.y, 0);
}

#[test]
fn test_missed_balls_score_for_configured_side() {
    let mut platform = backend().quit_after(999);
    let settings = Settings {
        award_miss_to: Some(Side::Computer),
        ..Default::default()
    };
    let mut game = Game::new(&mut platform, settings).unwrap();
    // Park the paddle at the top so the ball slips past it
    game.state.paddle.pos.y = 0;

    let mut misses = 0;
    while game.run_state() == RunState::Running {
        let events = game.step(&mut platform).unwrap();
        misses += events.iter().filter(|e| **e == GameEvent::BallMissed).count();
    }
    assert!(misses > 0);
    assert_eq!(game.state.score.computer as usize, misses);
    assert_eq!(game.state.score.player, 0);
}

#[test]
fn test_ball_stays_on_screen() {
    let mut platform = backend().quit_after(2_000);
    let mut game = Game::new(&mut platform, Settings::default()).unwrap();
    game.run(&mut platform).unwrap();

    let ball_draws = platform.frames().iter().map(|f| &f.draws[2]);
    for draw in ball_draws {
        assert!(draw.x >= -STEP && draw.x < 640, "ball x {}", draw.x);
        assert!(draw.y >= -STEP && draw.y <= 480 - 8 + STEP, "ball y {}", draw.y);
    }
}

#[test]
fn test_present_failure_is_fatal() {
    let mut platform = backend().fail_present_at(3).quit_after(10);
    let mut game = Game::new(&mut platform, Settings::default()).unwrap();
    let err = game.run(&mut platform).unwrap_err();
    assert!(matches!(err, GameError::Present(_)));
    assert_eq!(platform.frames().len(), 3);
    assert_eq!(game.run_state(), RunState::Running);
}

#[test]
fn test_missing_asset_aborts_startup() {
    let mut platform = HeadlessBackend::new()
        .with_image("background.png", 640, 480)
        .with_image("paddle.png", 10, 60)
        .with_font("DejaVuSans.ttf");
    let settings = Settings {
        assets: paddle_pong::AssetPaths {
            ball: "/nonexistent/ball.png".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    match Game::new(&mut platform, settings) {
        Err(GameError::AssetLoad { path, .. }) => {
            assert_eq!(path, std::path::PathBuf::from("/nonexistent/ball.png"))
        }
        other => panic!("expected asset error, got {:?}", other.map(|g| g.state)),
    }
}

#[test]
fn test_fps_readout_converges_on_target() {
    let mut platform = backend().with_frame_cost(2.0).quit_after(59);
    let settings = Settings {
        target_fps: 60,
        ..Default::default()
    };
    let mut game = Game::new(&mut platform, settings).unwrap();
    game.run(&mut platform).unwrap();

    let fps = game.last_elapsed().unwrap().fps;
    assert!((fps - 60.0).abs() < 1.5, "fps {}", fps);
    assert_eq!(game.state.bounds, IVec2::new(640, 480));
}
