//! Thread management.
//!
//! - `CommandThread`: applies velocity commands as they arrive
//!
//! The render loop runs on the main thread; see [`crate::render`].

mod command_thread;

pub use command_thread::CommandThread;
