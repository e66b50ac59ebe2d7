//! Terminal backend built on crossterm
//!
//! The game screen is scaled onto the terminal grid. Images draw as a
//! solid block of their average visible color; text draws as characters
//! over whatever background is already in the cell. Raw mode and the
//! alternate screen are restored on drop, so every exit path leaves the
//! terminal usable.

use std::collections::{HashMap, VecDeque};
use std::io::{BufWriter, Stdout, Write};
use std::path::Path;
use std::time::Duration;

use ab_glyph::FontVec;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{cursor, execute, queue};
use glam::IVec2;

use super::{
    COLOR_KEY, FontHandle, Renderer, Rgb, Sprite, SpriteId, TextLayout, load_font_file,
    measure_text,
};
use crate::GameError;
use crate::consts::TITLE;
use crate::platform::{EventSource, SystemClock, TimeSource};
use crate::sim::{InputEvent, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
    };
}

#[derive(Debug, Clone)]
enum SpriteData {
    /// None when every pixel is transparent or color-keyed
    Image { fill: Option<Rgb> },
    Text { text: String, color: Rgb },
}

struct LoadedFont {
    font: FontVec,
    size: f32,
}

/// Maps game-screen pixels to terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    screen: IVec2,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn col(&self, x: i32) -> i32 {
        (x as i64 * self.cols as i64 / self.screen.x as i64) as i32
    }

    fn row(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64 / self.screen.y as i64) as i32
    }

    /// Cell range covered by a pixel rectangle, at least one cell on each axis
    fn cell_rect(&self, pos: IVec2, size: IVec2) -> (i32, i32, i32, i32) {
        let left = self.col(pos.x);
        let top = self.row(pos.y);
        let right = self.col(pos.x + size.x).max(left + 1);
        let bottom = self.row(pos.y + size.y).max(top + 1);
        (left, top, right, bottom)
    }
}

/// Average color of the visible pixels in an image
fn visible_fill(image: &image::RgbaImage) -> Option<Rgb> {
    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for pixel in image.pixels() {
        let [pr, pg, pb, pa] = pixel.0;
        if pa == 0 || Rgb::new(pr, pg, pb) == COLOR_KEY {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        n += 1;
    }
    (n > 0).then(|| Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Shown when arrow releases can't be seen; a non-arrow press stops the paddle
const NO_KEY_RELEASE_HINT: &str =
    "Terminal does not report key releases; press space (or any non-arrow key) to stop the paddle";

/// Map a crossterm key to a game key, or None for quit keys
fn map_key(event: &KeyEvent) -> Option<Key> {
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') => None,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => None,
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => Some(Key::Other),
    }
}

/// Turns crossterm key events into game input events
#[derive(Debug, Default)]
struct KeyTracker {
    /// Terminal reports key releases
    key_release: bool,
    /// Arrow key considered held when releases are not reported
    held: Option<Key>,
}

impl KeyTracker {
    fn translate(&mut self, key: &KeyEvent, out: &mut VecDeque<InputEvent>) {
        let Some(mapped) = map_key(key) else {
            if key.kind == KeyEventKind::Press {
                out.push_back(InputEvent::Quit);
            }
            return;
        };

        match (key.kind, self.key_release) {
            (KeyEventKind::Press, _) => {
                if !self.key_release && mapped == Key::Other {
                    if let Some(held) = self.held.take() {
                        out.push_back(InputEvent::KeyUp(held));
                    }
                } else if mapped != Key::Other {
                    self.held = Some(mapped);
                }
                out.push_back(InputEvent::KeyDown(mapped));
            }
            (KeyEventKind::Release, true) => out.push_back(InputEvent::KeyUp(mapped)),
            _ => {}
        }
    }
}

/// Crossterm-backed renderer, text layout, event source and clock
pub struct TerminalBackend {
    out: BufWriter<Stdout>,
    viewport: Viewport,
    cells: Vec<Cell>,
    sprites: HashMap<SpriteId, SpriteData>,
    ephemeral: Vec<SpriteId>,
    next_sprite: u32,
    fonts: Vec<LoadedFont>,
    clock: SystemClock,
    keys: KeyTracker,
    pending: VecDeque<InputEvent>,
}

impl TerminalBackend {
    /// Take over the terminal for a game screen of `screen` pixels
    pub fn new(screen: IVec2) -> Result<Self, GameError> {
        let init = |e: std::io::Error| GameError::Init(e.to_string());

        let (cols, rows) = terminal::size().map_err(init)?;
        terminal::enable_raw_mode().map_err(init)?;

        // From here on Drop restores the terminal if anything fails
        let mut backend = Self {
            out: BufWriter::new(std::io::stdout()),
            viewport: Viewport { screen, cols, rows },
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
            sprites: HashMap::new(),
            ephemeral: Vec::new(),
            next_sprite: 0,
            fonts: Vec::new(),
            clock: SystemClock::new(),
            keys: KeyTracker::default(),
            pending: VecDeque::new(),
        };

        execute!(
            backend.out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            SetTitle(TITLE)
        )
        .map_err(init)?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                backend.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .map_err(init)?;
            backend.keys.key_release = true;
        } else {
            log::warn!("{}", NO_KEY_RELEASE_HINT);
        }

        log::info!("Terminal backend ready ({}x{} cells)", cols, rows);
        Ok(backend)
    }

    fn alloc_sprite(&mut self, data: SpriteData) -> SpriteId {
        let id = SpriteId(self.next_sprite);
        self.next_sprite += 1;
        self.sprites.insert(id, data);
        id
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport.cols = cols;
        self.viewport.rows = rows;
        self.cells = vec![Cell::BLANK; cols as usize * rows as usize];
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        let (cols, rows) = (self.viewport.cols as i32, self.viewport.rows as i32);
        if col < 0 || row < 0 || col >= cols || row >= rows {
            return None;
        }
        self.cells.get_mut((row * cols + col) as usize)
    }

    fn translate(&mut self, event: Event) {
        match event {
            Event::Resize(cols, rows) => self.resize(cols, rows),
            Event::Key(key) => self.keys.translate(&key, &mut self.pending),
            _ => {}
        }
    }

    fn flush_cells(&mut self) -> std::io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate, cursor::MoveTo(0, 0))?;
        let cols = self.viewport.cols as usize;
        let mut current: Option<(Rgb, Rgb)> = None;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % cols == 0 {
                queue!(self.out, cursor::MoveTo(0, (i / cols) as u16))?;
            }
            if current != Some((cell.fg, cell.bg)) {
                queue!(
                    self.out,
                    SetForegroundColor(to_color(cell.fg)),
                    SetBackgroundColor(to_color(cell.bg))
                )?;
                current = Some((cell.fg, cell.bg));
            }
            queue!(self.out, Print(cell.ch))?;
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if self.keys.key_release {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

impl Renderer for TerminalBackend {
    fn load_image(&mut self, path: &Path) -> Result<Sprite, GameError> {
        let image = image::open(path)
            .map_err(|e| GameError::asset(path, e))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let id = self.alloc_sprite(SpriteData::Image {
            fill: visible_fill(&image),
        });
        log::info!("Loaded image {} ({}x{})", path.display(), width, height);
        Ok(Sprite { id, width, height })
    }

    fn draw_at(&mut self, x: i32, y: i32, sprite: Sprite) {
        let Some(data) = self.sprites.get(&sprite.id).cloned() else {
            log::warn!("Draw of unknown sprite {:?}", sprite.id);
            return;
        };

        match data {
            SpriteData::Image { fill: None } => {}
            SpriteData::Image { fill: Some(fill) } => {
                let (left, top, right, bottom) =
                    self.viewport.cell_rect(IVec2::new(x, y), sprite.size());
                for row in top..bottom {
                    for col in left..right {
                        if let Some(cell) = self.cell_mut(col, row) {
                            *cell = Cell {
                                ch: ' ',
                                fg: fill,
                                bg: fill,
                            };
                        }
                    }
                }
            }
            SpriteData::Text { text, color } => {
                let (col, row) = (self.viewport.col(x), self.viewport.row(y));
                for (i, ch) in text.chars().enumerate() {
                    if let Some(cell) = self.cell_mut(col + i as i32, row) {
                        cell.ch = ch;
                        cell.fg = color;
                    }
                }
            }
        }
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.flush_cells()
            .map_err(|e| GameError::Present(e.to_string()))?;

        for id in self.ephemeral.drain(..) {
            self.sprites.remove(&id);
        }
        self.cells.fill(Cell::BLANK);
        Ok(())
    }
}

impl TextLayout for TerminalBackend {
    fn load_font(&mut self, path: &Path, size: f32) -> Result<FontHandle, GameError> {
        let font = load_font_file(path)?;
        self.fonts.push(LoadedFont { font, size });
        log::info!("Loaded font {} at {}pt", path.display(), size);
        Ok(FontHandle(self.fonts.len() as u32 - 1))
    }

    fn render_text(&mut self, font: FontHandle, text: &str, color: Rgb) -> Sprite {
        let (width, height) = match self.fonts.get(font.0 as usize) {
            Some(loaded) => measure_text(&loaded.font, loaded.size, text),
            None => (0, 0),
        };
        let id = self.alloc_sprite(SpriteData::Text {
            text: text.to_string(),
            color,
        });
        self.ephemeral.push(id);
        Sprite { id, width, height }
    }
}

impl EventSource for TerminalBackend {
    fn poll_event(&mut self) -> Option<InputEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(event) => self.translate(event),
                    Err(e) => {
                        log::warn!("Failed to read terminal event: {}", e);
                        return None;
                    }
                },
                Ok(false) => return None,
                Err(e) => {
                    log::warn!("Failed to poll terminal events: {}", e);
                    return None;
                }
            }
        }
    }
}

impl TimeSource for TerminalBackend {
    fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    fn sleep(&mut self, duration: Duration) {
        self.clock.sleep(duration);
    }
}
