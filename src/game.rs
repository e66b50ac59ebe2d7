//! Frame orchestrator
//!
//! Runs one simulated frame per loop iteration:
//! drain input, advance the clock, update paddle and ball, rebuild the HUD,
//! draw, present, then sleep out the rest of the frame budget.

use glam::IVec2;

use crate::GameError;
use crate::platform::{ElapsedInfo, EventSource, FrameClock, TimeSource, drain_input};
use crate::renderer::{AssetBundle, HudSprites, HudText, Renderer, TextLayout, build_draw_list};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Everything the frame loop needs from the outside world
pub trait Platform: Renderer + TextLayout + EventSource + TimeSource {}

impl<T: Renderer + TextLayout + EventSource + TimeSource + ?Sized> Platform for T {}

/// Whether the loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Game instance holding all per-run state
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    settings: Settings,
    assets: AssetBundle,
    clock: FrameClock,
    run_state: RunState,
    last_elapsed: Option<ElapsedInfo>,
}

impl Game {
    /// Load assets and lay out the starting positions from their sprite sizes
    pub fn new<P: Platform + ?Sized>(
        platform: &mut P,
        settings: Settings,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        let assets = AssetBundle::load(platform, &settings.assets)?;

        let bounds = IVec2::new(settings.screen_width, settings.screen_height);
        let state = GameState::new(bounds, assets.paddle.size(), assets.ball.size())
            .with_award_miss_to(settings.award_miss_to);

        Ok(Self {
            state,
            settings,
            assets,
            clock: FrameClock::new(platform.now_ms()),
            run_state: RunState::Running,
            last_elapsed: None,
        })
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Timing of the most recent frame
    pub fn last_elapsed(&self) -> Option<ElapsedInfo> {
        self.last_elapsed
    }

    /// Run one full frame. A quit request finishes the frame and stops the
    /// loop before the next one.
    pub fn step<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
    ) -> Result<Vec<GameEvent>, GameError> {
        let input = drain_input(platform);
        if input.quit {
            log::info!("Quit requested");
            self.run_state = RunState::Stopped;
        }

        let elapsed = self.clock.tick(platform.now_ms());
        self.last_elapsed = Some(elapsed);

        let events = tick(&mut self.state, &input);
        for event in &events {
            if let GameEvent::PointScored(side) = event {
                log::info!(
                    "Point to {:?} (player {}, computer {})",
                    side,
                    self.state.score.player,
                    self.state.score.computer
                );
            }
        }

        let hud = self.render_hud(platform, elapsed.fps);
        for cmd in build_draw_list(&self.state, &self.assets, &hud) {
            platform.draw_at(cmd.x, cmd.y, cmd.sprite);
        }
        platform.present()?;

        self.clock.throttle(self.settings.target_fps, platform);
        Ok(events)
    }

    /// Step until a quit request stops the loop
    pub fn run<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GameError> {
        log::info!("Starting frame loop at {} fps", self.settings.target_fps);
        while self.run_state == RunState::Running {
            self.step(platform)?;
        }
        log::info!(
            "Stopped after {} frames (player {}, computer {})",
            self.clock.frames_elapsed(),
            self.state.score.player,
            self.state.score.computer
        );
        Ok(())
    }

    fn render_hud<P: Platform + ?Sized>(&self, platform: &mut P, fps: f32) -> HudSprites {
        let text = HudText::new(fps, &self.state.score);
        let font = self.assets.font;
        let color = self.settings.text_color;

        let mut hud = HudSprites::default();
        if self.settings.show_fps {
            hud.fps = Some(platform.render_text(font, &text.fps, color));
        }
        if self.settings.show_score {
            hud.player = Some(platform.render_text(font, &text.player, color));
            hud.computer = Some(platform.render_text(font, &text.computer, color));
        }
        hud
    }
}
