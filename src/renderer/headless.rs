//! Headless backend
//!
//! Records every presented frame instead of displaying it, replays a
//! scripted input queue one batch per frame, and runs on a manual clock
//! so pacing is deterministic. Used by `--headless` runs and by tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ab_glyph::FontVec;

use super::{
    FontHandle, Renderer, Rgb, Sprite, SpriteId, TextLayout, load_font_file, measure_text,
};
use crate::GameError;
use crate::platform::{EventSource, TimeSource};
use crate::sim::InputEvent;

/// One recorded sprite placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDraw {
    pub x: i32,
    pub y: i32,
    pub sprite: Sprite,
    /// Text content when the sprite came from `render_text`
    pub text: Option<String>,
}

/// Everything drawn between two presents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedFrame {
    pub draws: Vec<RecordedDraw>,
}

impl RecordedFrame {
    /// Texts drawn this frame, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.draws.iter().filter_map(|d| d.text.as_deref()).collect()
    }
}

/// In-memory renderer, text layout, event source and clock
#[derive(Default)]
pub struct HeadlessBackend {
    image_sizes: HashMap<PathBuf, (u32, u32)>,
    registered_fonts: Vec<PathBuf>,
    /// None for registered fonts, which are measured as fixed-width text
    fonts: Vec<(Option<FontVec>, f32)>,
    texts: HashMap<SpriteId, String>,
    next_sprite: u32,

    script: VecDeque<Vec<InputEvent>>,
    pending: VecDeque<InputEvent>,
    /// Frame index whose input batch is in `pending`
    loaded_for: Option<usize>,
    quit_after: Option<usize>,

    now_ms: f64,
    frame_cost_ms: f64,
    slept: Vec<Duration>,

    current: RecordedFrame,
    frames: Vec<RecordedFrame>,
    fail_present_at: Option<usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `path` from memory with the given dimensions instead of decoding a file
    pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.image_sizes.insert(path.into(), (width, height));
        self
    }

    /// Accept `path` as a font without reading it
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.registered_fonts.push(path.into());
        self
    }

    /// Input events delivered during successive frames, one batch per frame
    pub fn with_script(mut self, batches: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        self.script = batches.into_iter().collect();
        self
    }

    /// Deliver a quit event during frame `frames` (0-based) if nothing quit earlier
    pub fn quit_after(mut self, frames: usize) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Simulated time each frame takes before `present` returns
    pub fn with_frame_cost(mut self, ms: f64) -> Self {
        self.frame_cost_ms = ms;
        self
    }

    /// Make the present of frame `frame` (0-based) fail
    pub fn fail_present_at(mut self, frame: usize) -> Self {
        self.fail_present_at = Some(frame);
        self
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn slept(&self) -> &[Duration] {
        &self.slept
    }

    fn alloc_sprite(&mut self) -> SpriteId {
        let id = SpriteId(self.next_sprite);
        self.next_sprite += 1;
        id
    }

    /// Queue the input batch for the current frame
    fn load_next_batch(&mut self) {
        self.pending.clear();
        self.loaded_for = Some(self.frames.len());
        if let Some(batch) = self.script.pop_front() {
            self.pending.extend(batch);
        }
        if self.quit_after == Some(self.frames.len()) {
            self.pending.push_back(InputEvent::Quit);
        }
    }
}

impl Renderer for HeadlessBackend {
    fn load_image(&mut self, path: &Path) -> Result<Sprite, GameError> {
        let (width, height) = match self.image_sizes.get(path) {
            Some(&size) => size,
            None => image::image_dimensions(path).map_err(|e| GameError::asset(path, e))?,
        };
        Ok(Sprite {
            id: self.alloc_sprite(),
            width,
            height,
        })
    }

    fn draw_at(&mut self, x: i32, y: i32, sprite: Sprite) {
        self.current.draws.push(RecordedDraw {
            x,
            y,
            sprite,
            text: self.texts.get(&sprite.id).cloned(),
        });
    }

    fn present(&mut self) -> Result<(), GameError> {
        if self.fail_present_at == Some(self.frames.len()) {
            return Err(GameError::Present("display lost".to_string()));
        }

        self.now_ms += self.frame_cost_ms;
        self.frames.push(std::mem::take(&mut self.current));
        self.texts.clear();
        Ok(())
    }
}

impl TextLayout for HeadlessBackend {
    fn load_font(&mut self, path: &Path, size: f32) -> Result<FontHandle, GameError> {
        let font = if self.registered_fonts.iter().any(|p| p == path) {
            None
        } else {
            Some(load_font_file(path)?)
        };
        self.fonts.push((font, size));
        Ok(FontHandle(self.fonts.len() as u32 - 1))
    }

    fn render_text(&mut self, font: FontHandle, text: &str, _color: Rgb) -> Sprite {
        let (width, height) = match self.fonts.get(font.0 as usize) {
            Some((Some(font), size)) => measure_text(font, *size, text),
            Some((None, size)) => {
                let width = text.chars().count() as f32 * size * 0.6;
                (width as u32, *size as u32)
            }
            None => (0, 0),
        };
        let id = self.alloc_sprite();
        self.texts.insert(id, text.to_string());
        Sprite { id, width, height }
    }
}

impl EventSource for HeadlessBackend {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if self.loaded_for != Some(self.frames.len()) {
            self.load_next_batch();
        }
        self.pending.pop_front()
    }
}

impl TimeSource for HeadlessBackend {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn sleep(&mut self, duration: Duration) {
        self.now_ms += duration.as_nanos() as f64 / 1_000_000.0;
        self.slept.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Key;

    #[test]
    fn test_missing_image_is_asset_error() {
        let mut backend = HeadlessBackend::new();
        let err = backend.load_image(Path::new("/nonexistent/ball.png")).unwrap_err();
        assert!(matches!(err, GameError::AssetLoad { .. }));
    }

    #[test]
    fn test_missing_font_is_asset_error() {
        let mut backend = HeadlessBackend::new();
        let err = backend
            .load_font(Path::new("/nonexistent/font.ttf"), 24.0)
            .unwrap_err();
        assert!(matches!(err, GameError::AssetLoad { .. }));
    }

    #[test]
    fn test_script_batches_advance_per_present() {
        let mut backend = HeadlessBackend::new().with_script([
            vec![InputEvent::KeyDown(Key::Up)],
            vec![],
            vec![InputEvent::KeyUp(Key::Up)],
        ]);
        assert_eq!(backend.poll_event(), Some(InputEvent::KeyDown(Key::Up)));
        assert_eq!(backend.poll_event(), None);
        backend.present().unwrap();
        assert_eq!(backend.poll_event(), None);
        backend.present().unwrap();
        assert_eq!(backend.poll_event(), Some(InputEvent::KeyUp(Key::Up)));
    }

    #[test]
    fn test_text_sprites_recorded_and_released() {
        let mut backend = HeadlessBackend::new().with_font("font.ttf");
        let font = backend.load_font(Path::new("font.ttf"), 10.0).unwrap();
        let text = backend.render_text(font, "FPS: 0.00", Rgb::BLACK);
        assert_eq!(text.width, 54);
        backend.draw_at(0, 0, text);
        backend.present().unwrap();
        assert_eq!(backend.frames()[0].texts(), vec!["FPS: 0.00"]);

        // Drawing a stale text handle after present records no text
        backend.draw_at(0, 0, text);
        backend.present().unwrap();
        assert!(backend.frames()[1].texts().is_empty());
    }

    #[test]
    fn test_manual_clock() {
        let mut backend = HeadlessBackend::new().with_frame_cost(4.0);
        backend.present().unwrap();
        assert_eq!(backend.now_ms(), 4.0);
        backend.sleep(Duration::from_millis(12));
        assert_eq!(backend.now_ms(), 16.0);
        assert_eq!(backend.slept(), &[Duration::from_millis(12)]);
    }
}
