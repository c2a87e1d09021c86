//! State shared between the command and render threads.
//!
//! This module provides:
//! - `SharedGrid`: lock-guarded intensity buffer (the only shared resource)
//! - `GridFrame`: immutable snapshot handed to the display and snapshot writer

mod grid;

use std::sync::Arc;

pub use grid::{BLANK, GridConfig, GridFrame, SharedGrid};

/// Handle type for the shared grid.
pub type SharedGridHandle = Arc<SharedGrid>;

/// Create a new zero-initialized grid wrapped in `Arc`.
pub fn create_shared_grid(config: GridConfig) -> SharedGridHandle {
    Arc::new(SharedGrid::new(config))
}
