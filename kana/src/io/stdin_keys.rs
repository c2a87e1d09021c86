//! Keyboard input from stdin.
//!
//! A detached reader thread turns each typed character into a [`Key`] and
//! forwards it over a channel; [`KeySource::poll`] waits on that channel.
//! Input is line-buffered, so keys arrive when Enter is pressed.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::error::{Error, Result};
use crate::render::{Key, KeySource};

/// Key source fed by a stdin reader thread.
pub struct StdinKeySource {
    rx: Receiver<Key>,
    closed: bool,
}

impl StdinKeySource {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = unbounded();
        thread::Builder::new()
            .name("stdin-keys".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                forward_keys(stdin.lock(), &tx);
                log::debug!("stdin closed");
            })
            .map_err(|e| Error::Other(format!("Failed to spawn stdin reader: {}", e)))?;
        Ok(Self::from_receiver(rx))
    }

    /// Build from an existing key channel.
    pub fn from_receiver(rx: Receiver<Key>) -> Self {
        Self { rx, closed: false }
    }
}

/// Read lines from `input` and send one key per character.
///
/// Returns when input ends or the receiving side is dropped.
pub fn forward_keys<B: BufRead>(input: B, tx: &Sender<Key>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        for c in line.chars() {
            if tx.send(Key::from_char(c)).is_err() {
                return;
            }
        }
    }
}

impl KeySource for StdinKeySource {
    fn poll(&mut self, timeout: Duration) -> Option<Key> {
        if self.closed {
            thread::sleep(timeout);
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(key) => Some(key),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                // EOF on stdin: keep ticking, no more keys
                self.closed = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_forward_keys() {
        let (tx, rx) = unbounded();
        forward_keys(Cursor::new("a \nX\n"), &tx);
        let keys: Vec<Key> = rx.try_iter().collect();
        assert_eq!(keys, vec![Key::Other('a'), Key::Snapshot, Key::Quit]);
    }

    #[test]
    fn test_poll_after_close() {
        let (tx, rx) = unbounded();
        tx.send(Key::Snapshot).unwrap();
        drop(tx);

        let mut source = StdinKeySource::from_receiver(rx);
        assert_eq!(source.poll(Duration::from_millis(1)), Some(Key::Snapshot));
        assert_eq!(source.poll(Duration::from_millis(1)), None);
        assert_eq!(source.poll(Duration::from_millis(1)), None);
    }
}
