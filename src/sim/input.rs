//! Input events and their mapping to per-tick commands

/// Keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Other,
}

/// A discrete event from the platform event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Commands for a single tick, accumulated from that tick's events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// New paddle velocity intent (None keeps the current one)
    pub paddle_velocity: Option<i32>,
    /// Quit was requested
    pub quit: bool,
}

impl TickInput {
    /// Fold one event into this tick's commands; the last event wins
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.quit = true,
            InputEvent::KeyDown(Key::Up) => self.paddle_velocity = Some(-1),
            InputEvent::KeyDown(Key::Down) => self.paddle_velocity = Some(1),
            InputEvent::KeyUp(Key::Up | Key::Down) => self.paddle_velocity = Some(0),
            InputEvent::KeyDown(Key::Other) | InputEvent::KeyUp(Key::Other) => {}
        }
    }

    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        let mut input = Self::default();
        for event in events {
            input.apply(event);
        }
        input
    }
}
