//! Orchestration of the particle update.

mod command_handler;

pub use command_handler::{CommandHandler, DEFAULT_MARK_INTENSITY};
