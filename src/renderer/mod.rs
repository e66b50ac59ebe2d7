//! Rendering collaborators
//!
//! The simulation never draws. Each frame the orchestrator turns the game
//! state into a list of sprite placements and hands it to a `Renderer`.
//! Backends:
//! - `terminal`: crossterm cell buffer, one colored block per scaled pixel region
//! - `headless`: in-memory recorder with a manual clock and scripted input

pub mod headless;
pub mod terminal;

pub use headless::HeadlessBackend;
pub use terminal::TerminalBackend;

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::settings::AssetPaths;
use crate::sim::{GameState, Score};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pixels of this color are transparent in loaded images
pub const COLOR_KEY: Rgb = Rgb::WHITE;

/// Opaque handle to a backend-owned image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// A drawable surface and its pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub id: SpriteId,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }
}

/// Opaque handle to a backend-owned font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Image loading, blitting and frame submission
pub trait Renderer {
    /// Decode an image file into a sprite owned by the backend
    fn load_image(&mut self, path: &Path) -> Result<Sprite, GameError>;

    /// Queue `sprite` with its top-left corner at (x, y) for the current frame
    fn draw_at(&mut self, x: i32, y: i32, sprite: Sprite);

    /// Show everything drawn since the last present. Text sprites created
    /// during the frame are released afterwards.
    fn present(&mut self) -> Result<(), GameError>;
}

/// Text layout into ephemeral sprites
pub trait TextLayout {
    fn load_font(&mut self, path: &Path, size: f32) -> Result<FontHandle, GameError>;

    /// Lay out `text` as a sprite that lives until the next `present`
    fn render_text(&mut self, font: FontHandle, text: &str, color: Rgb) -> Sprite;
}

/// Read and parse a TrueType/OpenType font file
pub fn load_font_file(path: &Path) -> Result<FontVec, GameError> {
    let bytes = std::fs::read(path).map_err(|e| GameError::asset(path, e))?;
    FontVec::try_from_vec(bytes).map_err(|e| GameError::asset(path, e))
}

/// Pixel extent of a single line of text
pub fn measure_text(font: &FontVec, size: f32, text: &str) -> (u32, u32) {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let glyph = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, glyph);
        }
        width += scaled.h_advance(glyph);
        previous = Some(glyph);
    }
    (width.ceil() as u32, scaled.height().ceil() as u32)
}

/// Every asset the game needs, loaded together at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetBundle {
    pub background: Sprite,
    pub paddle: Sprite,
    pub ball: Sprite,
    pub font: FontHandle,
}

impl AssetBundle {
    /// Load all assets; the first failure aborts with no partial fallback
    pub fn load<P>(platform: &mut P, paths: &AssetPaths) -> Result<Self, GameError>
    where
        P: Renderer + TextLayout + ?Sized,
    {
        let background = platform.load_image(&paths.background)?;
        let paddle = platform.load_image(&paths.paddle)?;
        let ball = platform.load_image(&paths.ball)?;
        let font = platform.load_font(&paths.font, paths.font_size)?;
        log::info!(
            "Loaded assets: paddle {}x{}, ball {}x{}",
            paddle.width,
            paddle.height,
            ball.width,
            ball.height
        );

        Ok(Self {
            background,
            paddle,
            ball,
            font,
        })
    }
}

/// HUD text for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub fps: String,
    pub player: String,
    pub computer: String,
}

impl HudText {
    pub fn new(fps: f32, score: &Score) -> Self {
        Self {
            fps: format!("FPS: {:.2}", fps),
            player: format!("Player: {}", score.player),
            computer: format!("Computer: {}", score.computer),
        }
    }
}

/// HUD sprites rendered for the current frame (None = hidden)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudSprites {
    pub fps: Option<Sprite>,
    pub player: Option<Sprite>,
    pub computer: Option<Sprite>,
}

/// A single sprite placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCmd {
    pub x: i32,
    pub y: i32,
    pub sprite: Sprite,
}

impl DrawCmd {
    fn at(pos: IVec2, sprite: Sprite) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            sprite,
        }
    }
}

/// Back-to-front draw order: background, paddle, ball, HUD
pub fn build_draw_list(state: &GameState, assets: &AssetBundle, hud: &HudSprites) -> Vec<DrawCmd> {
    let mut list = vec![
        DrawCmd::at(IVec2::ZERO, assets.background),
        DrawCmd::at(state.paddle.pos, assets.paddle),
        DrawCmd::at(state.ball.pos, assets.ball),
    ];

    if let Some(fps) = hud.fps {
        list.push(DrawCmd::at(IVec2::ZERO, fps));
    }
    if let Some(player) = hud.player {
        list.push(DrawCmd::at(IVec2::new(state.bounds.x / 4, 0), player));
    }
    if let Some(computer) = hud.computer {
        list.push(DrawCmd::at(IVec2::new(state.bounds.x * 3 / 4, 0), computer));
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(id: u32, width: u32, height: u32) -> Sprite {
        Sprite {
            id: SpriteId(id),
            width,
            height,
        }
    }

    fn assets() -> AssetBundle {
        AssetBundle {
            background: sprite(0, 640, 480),
            paddle: sprite(1, 10, 60),
            ball: sprite(2, 8, 8),
            font: FontHandle(0),
        }
    }

    #[test]
    fn test_hud_text_format() {
        let hud = HudText::new(59.5, &Score { player: 2, computer: 7 });
        assert_eq!(hud.fps, "FPS: 59.50");
        assert_eq!(hud.player, "Player: 2");
        assert_eq!(hud.computer, "Computer: 7");
    }

    #[test]
    fn test_draw_list_order_without_hud() {
        let assets = assets();
        let state = GameState::new(IVec2::new(640, 480), assets.paddle.size(), assets.ball.size());
        let list = build_draw_list(&state, &assets, &HudSprites::default());
        let ids: Vec<_> = list.iter().map(|c| c.sprite.id).collect();
        assert_eq!(ids, vec![SpriteId(0), SpriteId(1), SpriteId(2)]);
        assert_eq!((list[1].x, list[1].y), (10, 240));
        assert_eq!((list[2].x, list[2].y), (316, 236));
    }

    #[test]
    fn test_draw_list_hud_on_top() {
        let assets = assets();
        let state = GameState::new(IVec2::new(640, 480), assets.paddle.size(), assets.ball.size());
        let hud = HudSprites {
            fps: Some(sprite(3, 90, 28)),
            player: Some(sprite(4, 90, 28)),
            computer: Some(sprite(5, 120, 28)),
        };
        let list = build_draw_list(&state, &assets, &hud);
        assert_eq!(list.len(), 6);
        assert_eq!(list[3], DrawCmd { x: 0, y: 0, sprite: sprite(3, 90, 28) });
        assert_eq!((list[4].x, list[5].x), (160, 480));
    }
}
