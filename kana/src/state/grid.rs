//! Mutex-guarded visualization grid shared by the command and render threads.
//!
//! The buffer is only reachable through [`SharedGrid::erase`],
//! [`SharedGrid::mark`] and [`SharedGrid::snapshot`]. Each call takes the lock
//! for one cell write (or one full copy) and releases it before returning,
//! so no guard ever outlives a call.
//!
//! Locking is per cell, not per command sweep: a reader may observe a frame
//! in which some particles of a sweep have been erased and not yet redrawn.

use image::GrayImage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Intensity of an empty cell.
pub const BLANK: u8 = 0;

/// Grid dimensions and world-to-cell scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows (H).
    pub height: usize,

    /// Number of columns (W).
    pub width: usize,

    /// Cells per meter.
    pub scale: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            height: 500,
            width: 500,
            scale: 5.0,
        }
    }
}

/// Immutable copy of the grid buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GridFrame {
    /// Frame dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Intensity at (row, col), or `None` outside the frame.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Raw row-major pixels.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of non-blank cells.
    pub fn lit_cells(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != BLANK).count()
    }

    /// Convert to an 8-bit grayscale image for encoding.
    pub fn to_gray_image(&self) -> Option<GrayImage> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        GrayImage::from_raw(width, height, self.pixels.clone())
    }
}

/// Fixed-size H×W intensity grid with an internal lock.
///
/// The logical origin is the buffer center; a world point (x, y) maps to
/// `(H/2 + round(y * scale), W/2 + round(x * scale))`.
#[derive(Debug)]
pub struct SharedGrid {
    config: GridConfig,
    cells: Mutex<Vec<u8>>,
}

impl SharedGrid {
    /// Create a zero-initialized grid.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: Mutex::new(vec![BLANK; config.height * config.width]),
        }
    }

    /// Grid configuration.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Convert world coordinates to (row, col).
    ///
    /// Returns `None` if outside grid bounds or not finite.
    pub fn world_to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let scale = f64::from(self.config.scale);
        let row = (self.config.height / 2) as f64 + (f64::from(y) * scale).round();
        let col = (self.config.width / 2) as f64 + (f64::from(x) * scale).round();

        if row >= 0.0 && col >= 0.0 {
            let (row, col) = (row as usize, col as usize);
            if row < self.config.height && col < self.config.width {
                return Some((row, col));
            }
        }
        None
    }

    /// Clear the cell under world point (x, y).
    ///
    /// Returns false (and changes nothing) when the point is off-grid.
    #[inline]
    pub fn erase(&self, x: f32, y: f32) -> bool {
        self.write(x, y, BLANK)
    }

    /// Set the cell under world point (x, y) to `intensity`.
    ///
    /// Returns false (and changes nothing) when the point is off-grid.
    #[inline]
    pub fn mark(&self, x: f32, y: f32, intensity: u8) -> bool {
        self.write(x, y, intensity)
    }

    fn write(&self, x: f32, y: f32, value: u8) -> bool {
        let mut cells = self.cells.lock();
        match self.world_to_cell(x, y) {
            Some((row, col)) => {
                cells[row * self.config.width + col] = value;
                true
            }
            None => false,
        }
    }

    /// Copy the whole buffer under the lock.
    pub fn snapshot(&self) -> GridFrame {
        let pixels = self.cells.lock().clone();
        GridFrame {
            width: self.config.width,
            height: self.config.height,
            pixels,
        }
    }

    /// Number of non-blank cells.
    pub fn lit_cells(&self) -> usize {
        self.cells.lock().iter().filter(|&&v| v != BLANK).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn grid_500() -> SharedGrid {
        SharedGrid::new(GridConfig::default())
    }

    #[test]
    fn test_starts_blank() {
        let grid = grid_500();
        let frame = grid.snapshot();
        assert_eq!(frame.dimensions(), (500, 500));
        assert_eq!(frame.lit_cells(), 0);
    }

    #[test]
    fn test_origin_maps_to_center() {
        let grid = grid_500();
        assert_eq!(grid.world_to_cell(0.0, 0.0), Some((250, 250)));
        // y drives the row, x drives the column
        assert_eq!(grid.world_to_cell(1.0, 0.0), Some((250, 255)));
        assert_eq!(grid.world_to_cell(0.0, -2.0), Some((240, 250)));
    }

    #[test]
    fn test_mapping_rounds() {
        let grid = grid_500();
        // 0.29 * 5 = 1.45 -> 1, 0.31 * 5 = 1.55 -> 2
        assert_eq!(grid.world_to_cell(0.29, 0.31), Some((252, 251)));
        assert_eq!(grid.world_to_cell(-0.31, 0.0), Some((250, 248)));
    }

    #[test]
    fn test_mark_then_erase_round_trip() {
        let grid = grid_500();
        assert!(grid.mark(3.0, -1.0, 200));

        let frame = grid.snapshot();
        assert_eq!(frame.get(245, 265), Some(200));
        assert_eq!(frame.lit_cells(), 1);

        assert!(grid.erase(3.0, -1.0));
        assert_eq!(grid.snapshot().get(245, 265), Some(BLANK));
        assert_eq!(grid.lit_cells(), 0);
    }

    #[test]
    fn test_out_of_range_is_dropped() {
        let grid = grid_500();
        grid.mark(0.0, 0.0, 255);
        let before = grid.snapshot();

        // 50 m * 5 = 250 cells -> col 500, one past the edge
        assert!(!grid.mark(50.0, 0.0, 255));
        assert!(!grid.mark(0.0, -50.2, 255));
        assert!(!grid.erase(0.0, -1.0e9));
        assert!(!grid.mark(f32::NAN, 0.0, 255));
        assert!(!grid.mark(f32::INFINITY, 0.0, 255));
        assert!(!grid.erase(f32::MAX, f32::MIN));

        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_edges_are_in_range() {
        let grid = grid_500();
        // col 0 and col 499
        assert_eq!(grid.world_to_cell(-50.0, 0.0), Some((250, 0)));
        assert_eq!(grid.world_to_cell(49.8, 0.0), Some((250, 499)));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let grid = grid_500();
        let frame = grid.snapshot();
        grid.mark(0.0, 0.0, 255);
        assert_eq!(frame.lit_cells(), 0);
        assert_eq!(grid.snapshot().lit_cells(), 1);
    }

    #[test]
    fn test_concurrent_writes_to_distinct_cells() {
        let grid = Arc::new(SharedGrid::new(GridConfig {
            height: 64,
            width: 64,
            scale: 1.0,
        }));
        let threads = 8;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let grid = Arc::clone(&grid);
                thread::spawn(move || {
                    // Each thread owns one row (y = t - 32 -> row t)
                    let y = t as f32 - 32.0;
                    for col in 0..64 {
                        let x = col as f32 - 32.0;
                        assert!(grid.mark(x, y, 255));
                        if col % 2 == 1 {
                            assert!(grid.erase(x, y));
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let frame = grid.snapshot();
        for row in 0..64 {
            for col in 0..64 {
                let expected = if row < threads && col % 2 == 0 { 255 } else { 0 };
                assert_eq!(frame.get(row, col), Some(expected), "cell ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_to_gray_image() {
        let grid = SharedGrid::new(GridConfig {
            height: 10,
            width: 20,
            scale: 1.0,
        });
        grid.mark(1.0, 2.0, 77);
        let img = grid.snapshot().to_gray_image().unwrap();
        assert_eq!(img.dimensions(), (20, 10));
        // image coordinates are (x = col, y = row)
        assert_eq!(img.get_pixel(11, 7)[0], 77);
    }
}
