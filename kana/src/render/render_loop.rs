//! Fixed-rate render loop.
//!
//! Each tick:
//! 1. Snapshot the grid and hand the frame to the display
//! 2. Poll for a key, bounded by the tick period
//! 3. Quit -> STOPPED; snapshot request -> save current grid; else continue
//!
//! The loop also stops when the shared `running` flag is cleared from
//! outside (Ctrl-C). A user quit clears the flag itself so the other
//! threads shut down with it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::snapshot::SnapshotWriter;
use super::{Display, Key, KeySource};
use crate::state::SharedGridHandle;

/// Render loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking.
    Running,
    /// Terminal.
    Stopped,
}

/// Why [`RenderLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user pressed the quit key.
    UserQuit,
    /// The shared running flag was cleared externally.
    Shutdown,
}

/// Configuration for the render loop.
#[derive(Debug, Clone)]
pub struct RenderLoopConfig {
    /// Tick rate in Hz.
    pub rate_hz: f32,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self { rate_hz: 30.0 }
    }
}

impl RenderLoopConfig {
    /// Tick period derived from the rate.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.rate_hz)
    }
}

/// Periodically shows the grid and reacts to key presses.
pub struct RenderLoop<D: Display, K: KeySource> {
    config: RenderLoopConfig,
    grid: SharedGridHandle,
    display: D,
    keys: K,
    snapshots: SnapshotWriter,
    state: LoopState,
    ticks: u64,
    snapshots_saved: u32,
}

impl<D: Display, K: KeySource> RenderLoop<D, K> {
    /// Create a render loop in the RUNNING state.
    pub fn new(
        config: RenderLoopConfig,
        grid: SharedGridHandle,
        display: D,
        keys: K,
        snapshots: SnapshotWriter,
    ) -> Self {
        Self {
            config,
            grid,
            display,
            keys,
            snapshots,
            state: LoopState::Running,
            ticks: 0,
            snapshots_saved: 0,
        }
    }

    /// Run until quit or external shutdown.
    pub fn run(&mut self, running: &AtomicBool) -> ExitReason {
        log::info!("Render loop starting ({:.1} Hz)", self.config.rate_hz);
        let period = self.config.tick_period();

        let reason = loop {
            if !running.load(Ordering::Relaxed) {
                self.state = LoopState::Stopped;
                break ExitReason::Shutdown;
            }

            let tick_start = Instant::now();
            if self.tick(period) == LoopState::Stopped {
                running.store(false, Ordering::Relaxed);
                break ExitReason::UserQuit;
            }

            // Key sources may return early; keep the cadence
            let elapsed = tick_start.elapsed();
            if elapsed < period && running.load(Ordering::Relaxed) {
                std::thread::sleep(period - elapsed);
            }
        };

        log::info!(
            "Render loop stopped after {} ticks ({:?})",
            self.ticks,
            reason
        );
        reason
    }

    /// Execute one tick. `key_timeout` bounds the key poll.
    pub fn tick(&mut self, key_timeout: Duration) -> LoopState {
        if self.state == LoopState::Stopped {
            return self.state;
        }
        self.ticks += 1;

        let frame = self.grid.snapshot();
        self.display.show(&frame);

        match self.keys.poll(key_timeout) {
            Some(Key::Quit) => {
                log::info!("Quit requested");
                self.state = LoopState::Stopped;
            }
            Some(Key::Snapshot) => self.save_snapshot(),
            Some(Key::Other(c)) => log::trace!("Ignoring key {:?}", c),
            None => {}
        }

        self.state
    }

    fn save_snapshot(&mut self) {
        let frame = self.grid.snapshot();
        match self.snapshots.save_now(&frame) {
            Ok(path) => {
                self.snapshots_saved += 1;
                log::info!("Saved snapshot {}", path.display());
            }
            Err(e) => log::error!("Failed to save snapshot: {}", e),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Ticks executed so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Snapshots written successfully.
    #[inline]
    pub fn snapshots_saved(&self) -> u32 {
        self.snapshots_saved
    }

    /// The display collaborator.
    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GridConfig, GridFrame, create_shared_grid};
    use std::collections::VecDeque;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingDisplay {
        frames: Vec<GridFrame>,
    }

    impl Display for RecordingDisplay {
        fn show(&mut self, frame: &GridFrame) {
            self.frames.push(frame.clone());
        }
    }

    /// Replays one scripted poll result per tick, then reports no key.
    struct ScriptedKeys(VecDeque<Option<Key>>);

    impl KeySource for ScriptedKeys {
        fn poll(&mut self, _timeout: Duration) -> Option<Key> {
            self.0.pop_front().flatten()
        }
    }

    fn fast() -> RenderLoopConfig {
        RenderLoopConfig { rate_hz: 1000.0 }
    }

    fn small_grid() -> SharedGridHandle {
        create_shared_grid(GridConfig {
            height: 20,
            width: 20,
            scale: 1.0,
        })
    }

    #[test]
    fn test_quit_key_stops_and_clears_flag() {
        let dir = TempDir::new().unwrap();
        let keys = ScriptedKeys(VecDeque::from([None, Some(Key::Other('a')), Some(Key::Quit)]));
        let mut render = RenderLoop::new(
            fast(),
            small_grid(),
            RecordingDisplay::default(),
            keys,
            SnapshotWriter::new(dir.path()),
        );
        let running = AtomicBool::new(true);

        assert_eq!(render.run(&running), ExitReason::UserQuit);
        assert_eq!(render.state(), LoopState::Stopped);
        assert_eq!(render.ticks(), 3);
        assert_eq!(render.display().frames.len(), 3);
        assert!(!running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_external_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut render = RenderLoop::new(
            fast(),
            small_grid(),
            RecordingDisplay::default(),
            ScriptedKeys(VecDeque::new()),
            SnapshotWriter::new(dir.path()),
        );
        let running = AtomicBool::new(false);

        assert_eq!(render.run(&running), ExitReason::Shutdown);
        assert_eq!(render.ticks(), 0);
        assert_eq!(render.state(), LoopState::Stopped);
    }

    #[test]
    fn test_display_sees_grid_changes() {
        let dir = TempDir::new().unwrap();
        let grid = small_grid();
        let mut render = RenderLoop::new(
            fast(),
            grid.clone(),
            RecordingDisplay::default(),
            ScriptedKeys(VecDeque::new()),
            SnapshotWriter::new(dir.path()),
        );

        render.tick(Duration::ZERO);
        grid.mark(0.0, 0.0, 255);
        render.tick(Duration::ZERO);

        let frames = &render.display().frames;
        assert_eq!(frames[0].lit_cells(), 0);
        assert_eq!(frames[1].get(10, 10), Some(255));
    }

    #[test]
    fn test_snapshot_key_writes_file() {
        let dir = TempDir::new().unwrap();
        let keys = ScriptedKeys(VecDeque::from([Some(Key::Snapshot), Some(Key::Quit)]));
        let mut render = RenderLoop::new(
            fast(),
            small_grid(),
            RecordingDisplay::default(),
            keys,
            SnapshotWriter::new(dir.path()),
        );

        render.run(&AtomicBool::new(true));

        assert_eq!(render.snapshots_saved(), 1);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_snapshot_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let keys = ScriptedKeys(VecDeque::from([
            Some(Key::Snapshot),
            None,
            Some(Key::Quit),
        ]));
        let mut render = RenderLoop::new(
            fast(),
            small_grid(),
            RecordingDisplay::default(),
            keys,
            SnapshotWriter::new(dir.path().join("missing")),
        );

        assert_eq!(render.run(&AtomicBool::new(true)), ExitReason::UserQuit);
        assert_eq!(render.snapshots_saved(), 0);
        assert_eq!(render.ticks(), 3);
    }

    #[test]
    fn test_tick_after_stop_is_inert() {
        let dir = TempDir::new().unwrap();
        let mut render = RenderLoop::new(
            fast(),
            small_grid(),
            RecordingDisplay::default(),
            ScriptedKeys(VecDeque::from([Some(Key::Quit)])),
            SnapshotWriter::new(dir.path()),
        );

        assert_eq!(render.tick(Duration::ZERO), LoopState::Stopped);
        assert_eq!(render.tick(Duration::ZERO), LoopState::Stopped);
        assert_eq!(render.ticks(), 1);
    }

    #[test]
    fn test_tick_period() {
        let config = RenderLoopConfig { rate_hz: 30.0 };
        let period = config.tick_period();
        assert!(period > Duration::from_millis(33) && period < Duration::from_millis(34));
    }
}
