//! Utility functions.
//!
//! - Signal handling (Ctrl-C)

mod signal;

pub use signal::setup_ctrl_c_handler;
