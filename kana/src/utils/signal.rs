//! Signal handling utilities for graceful shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Set up a Ctrl-C handler that clears `running`.
///
/// The same flag is passed to every thread and to the render loop, so one
/// signal stops all of them.
///
/// # Example
/// ```ignore
/// let running = Arc::new(AtomicBool::new(true));
/// setup_ctrl_c_handler(running.clone())?;
/// while running.load(Ordering::Relaxed) {
///     // ... do work ...
/// }
/// ```
pub fn setup_ctrl_c_handler(running: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        running.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))
}
