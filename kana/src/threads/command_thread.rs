//! Command Thread - applies velocity commands to the particle set.
//!
//! This thread:
//! - Owns the `CommandHandler` (and so the particle set)
//! - Drains the command channel in FIFO order
//! - Polls with a timeout so it observes the shutdown flag

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::algorithms::UniformSource;
use crate::core::types::VelocityCommand;
use crate::engine::CommandHandler;
use crate::error::{Error, Result};

/// How long to wait for a command before re-checking the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Command thread handle.
pub struct CommandThread<R: UniformSource + Send + 'static> {
    handle: JoinHandle<CommandHandler<R>>,
}

impl<R: UniformSource + Send + 'static> CommandThread<R> {
    /// Spawn the command thread.
    ///
    /// # Arguments
    ///
    /// - `handler`: Handler that owns the particle set.
    /// - `commands`: Receiver for velocity commands.
    /// - `running`: Atomic flag for shutdown.
    pub fn spawn(
        handler: CommandHandler<R>,
        commands: Receiver<VelocityCommand>,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("command".into())
            .spawn(move || run_command_loop(handler, commands, running))
            .map_err(|e| Error::Other(format!("Failed to spawn command thread: {}", e)))?;

        Ok(Self { handle })
    }

    /// Wait for the thread to finish and take back the handler.
    pub fn join(self) -> thread::Result<CommandHandler<R>> {
        self.handle.join()
    }
}

fn run_command_loop<R: UniformSource>(
    mut handler: CommandHandler<R>,
    commands: Receiver<VelocityCommand>,
    running: Arc<AtomicBool>,
) -> CommandHandler<R> {
    log::info!(
        "Command thread starting ({} particles)",
        handler.particles().len()
    );

    while running.load(Ordering::Relaxed) {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(command) => handler.on_command(command),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Command source closed");
                break;
            }
        }
    }

    log::info!(
        "Command thread stopped after {} commands",
        handler.commands_handled()
    );
    handler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{MotionModel, MotionModelConfig, NoiseGenerator, ParticleSet};
    use crate::engine::DEFAULT_MARK_INTENSITY;
    use crate::state::{GridConfig, create_shared_grid};
    use crossbeam_channel::unbounded;

    #[test]
    fn test_applies_commands_then_stops_on_disconnect() {
        let grid = create_shared_grid(GridConfig::default());
        let handler = CommandHandler::new(
            ParticleSet::new(5),
            MotionModel::new(MotionModelConfig::default()),
            NoiseGenerator::new(11),
            grid,
            DEFAULT_MARK_INTENSITY,
        );
        let (tx, rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let thread = CommandThread::spawn(handler, rx, running.clone()).unwrap();

        for _ in 0..3 {
            tx.send(VelocityCommand::new(0.2, 0.1)).unwrap();
        }
        drop(tx);

        let handler = thread.join().unwrap();
        assert_eq!(handler.commands_handled(), 3);
        assert!(running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_stops_on_shutdown_flag() {
        let grid = create_shared_grid(GridConfig::default());
        let handler = CommandHandler::new(
            ParticleSet::new(1),
            MotionModel::new(MotionModelConfig::noiseless()),
            NoiseGenerator::new(1),
            grid,
            DEFAULT_MARK_INTENSITY,
        );
        let (_tx, rx) = unbounded::<VelocityCommand>();
        let running = Arc::new(AtomicBool::new(true));
        let thread = CommandThread::spawn(handler, rx, running.clone()).unwrap();

        running.store(false, Ordering::Relaxed);
        let handler = thread.join().unwrap();
        assert_eq!(handler.commands_handled(), 0);
    }
}
