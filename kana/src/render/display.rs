//! Display used when no window system is attached.

use super::Display;
use crate::state::GridFrame;

/// Discards frames, keeping only counters for diagnostics.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames_shown: u64,
    last_lit_cells: usize,
}

impl HeadlessDisplay {
    /// Create a new headless display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented.
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// Lit cell count of the most recent frame.
    pub fn last_lit_cells(&self) -> usize {
        self.last_lit_cells
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, frame: &GridFrame) {
        self.frames_shown += 1;
        let lit = frame.lit_cells();
        if lit != self.last_lit_cells {
            log::trace!("Frame {}: {} lit cells", self.frames_shown, lit);
        }
        self.last_lit_cells = lit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GridConfig, SharedGrid};

    #[test]
    fn test_counts_frames() {
        let grid = SharedGrid::new(GridConfig::default());
        let mut display = HeadlessDisplay::new();

        display.show(&grid.snapshot());
        grid.mark(0.0, 0.0, 255);
        grid.mark(1.0, 1.0, 255);
        display.show(&grid.snapshot());

        assert_eq!(display.frames_shown(), 2);
        assert_eq!(display.last_lit_cells(), 2);
    }
}
