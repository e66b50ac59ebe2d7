//! Game settings
//!
//! Load-time configuration read from an optional JSON file. Physics
//! constants are deliberately absent; see `consts::STEP`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::consts::*;
use crate::renderer::Rgb;
use crate::sim::Side;

/// Asset file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: PathBuf,
    pub paddle: PathBuf,
    pub ball: PathBuf,
    pub font: PathBuf,
    /// HUD font size in points
    pub font_size: f32,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: PathBuf::from("background.png"),
            paddle: PathBuf::from("paddle.png"),
            ball: PathBuf::from("ball.png"),
            font: PathBuf::from("DejaVuSans.ttf"),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl AssetPaths {
    /// Resolve relative paths against `dir`
    pub fn rooted_at(&self, dir: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                dir.join(p)
            }
        };
        Self {
            background: join(&self.background),
            paddle: join(&self.paddle),
            ball: join(&self.ball),
            font: join(&self.font),
            font_size: self.font_size,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Frame pacing target (frames per second)
    pub target_fps: u32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show player/computer score counters
    pub show_score: bool,
    /// HUD text color
    pub text_color: Rgb,

    /// Side credited when the ball gets past the paddle (None = nobody)
    pub award_miss_to: Option<Side>,

    pub assets: AssetPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            show_fps: true,
            show_score: false,
            text_color: Rgb::BLACK,
            award_miss_to: None,
            assets: AssetPaths::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, GameError> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let config_err = |reason: String| GameError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let json = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let settings = Self::from_json(&json).map_err(|e| match e {
            GameError::Config { reason, .. } => config_err(reason),
            other => other,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| GameError::Config {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the frame loop cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let reason = if self.target_fps == 0 {
            Some("target_fps must be positive")
        } else if self.screen_width <= 0 || self.screen_height <= 0 {
            Some("screen dimensions must be positive")
        } else if self.assets.font_size <= 0.0 {
            Some("font_size must be positive")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GameError::Config {
                path: PathBuf::from("<settings>"),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}
