//! Rendering: fixed-rate display loop and snapshot persistence.
//!
//! The window system and keyboard are external collaborators, reached
//! through the [`Display`] and [`KeySource`] traits.

mod display;
mod render_loop;
pub mod snapshot;

use std::time::Duration;

use crate::state::GridFrame;

pub use display::HeadlessDisplay;
pub use render_loop::{ExitReason, LoopState, RenderLoop, RenderLoopConfig};
pub use snapshot::{SnapshotWriter, snapshot_filename};

/// Discrete key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Stop the render loop (`x` / `X`).
    Quit,
    /// Save the current grid to an image file (space, `s` / `S`).
    Snapshot,
    /// Any other key.
    Other(char),
}

impl Key {
    /// Map a typed character to a key event.
    pub fn from_char(c: char) -> Self {
        match c {
            'x' | 'X' => Key::Quit,
            ' ' | 's' | 'S' => Key::Snapshot,
            other => Key::Other(other),
        }
    }
}

/// Sink for rendered frames (window, terminal, network...).
pub trait Display {
    /// Present one frame.
    fn show(&mut self, frame: &GridFrame);
}

/// Source of discrete key events.
pub trait KeySource {
    /// Wait at most `timeout` for a key.
    fn poll(&mut self, timeout: Duration) -> Option<Key>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_char('x'), Key::Quit);
        assert_eq!(Key::from_char('X'), Key::Quit);
        assert_eq!(Key::from_char(' '), Key::Snapshot);
        assert_eq!(Key::from_char('s'), Key::Snapshot);
        assert_eq!(Key::from_char('q'), Key::Other('q'));
    }
}
