//! Platform abstraction layer
//!
//! Handles the pieces of the frame loop that touch the outside world:
//! - Time/ticks and frame pacing
//! - Input event queues

pub mod clock;

pub use clock::{ElapsedInfo, FrameClock, SystemClock, TimeSource, fps};

use crate::sim::{InputEvent, TickInput};

/// A non-blocking queue of input events
pub trait EventSource {
    /// Next pending event, or None when the queue is empty right now
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Drain every pending event into this tick's commands
pub fn drain_input<S: EventSource + ?Sized>(source: &mut S) -> TickInput {
    let mut input = TickInput::default();
    while let Some(event) = source.poll_event() {
        input.apply(event);
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Key;
    use std::collections::VecDeque;

    impl EventSource for VecDeque<InputEvent> {
        fn poll_event(&mut self) -> Option<InputEvent> {
            self.pop_front()
        }
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue: VecDeque<_> =
            [InputEvent::KeyDown(Key::Down), InputEvent::KeyUp(Key::Down), InputEvent::Quit].into();
        let input = drain_input(&mut queue);
        assert!(queue.is_empty());
        assert!(input.quit);
        assert_eq!(input.paddle_velocity, Some(0));
    }

    #[test]
    fn test_drain_empty_queue() {
        let mut queue = VecDeque::new();
        assert_eq!(drain_input(&mut queue), TickInput::default());
    }
}
