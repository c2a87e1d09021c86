//! UDP receiver for velocity commands.
//!
//! Receives commands via UDP and forwards them to the command thread
//! over a crossbeam channel.
//!
//! # Wire Protocol
//!
//! ```text
//! ┌──────────────────────┬───────────────────────┐
//! │ linear (4 bytes)     │ angular (4 bytes)     │
//! │ Big-endian f32 (m/s) │ Big-endian f32 (rad/s)│
//! └──────────────────────┴───────────────────────┘
//! ```
//!
//! Trailing bytes are ignored.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::core::types::VelocityCommand;
use crate::error::{Error, Result};

/// Encoded command size in bytes.
pub const COMMAND_DATAGRAM_LEN: usize = 8;

/// Channel capacity for commands.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Read timeout so the loop can observe shutdown.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Encode a command into its datagram form.
pub fn encode_command(command: &VelocityCommand) -> [u8; COMMAND_DATAGRAM_LEN] {
    let mut buf = [0u8; COMMAND_DATAGRAM_LEN];
    buf[..4].copy_from_slice(&command.linear_velocity.to_be_bytes());
    buf[4..].copy_from_slice(&command.angular_velocity.to_be_bytes());
    buf
}

/// Decode a command datagram.
pub fn decode_command(data: &[u8]) -> Result<VelocityCommand> {
    if data.len() < COMMAND_DATAGRAM_LEN {
        return Err(Error::InvalidDatagram(format!(
            "expected {} bytes, got {}",
            COMMAND_DATAGRAM_LEN,
            data.len()
        )));
    }
    let linear = f32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let angular = f32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if !linear.is_finite() || !angular.is_finite() {
        return Err(Error::InvalidDatagram(format!(
            "non-finite velocity ({}, {})",
            linear, angular
        )));
    }
    Ok(VelocityCommand::new(linear, angular))
}

/// Configuration for the UDP command receiver.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Address to bind (e.g., "0.0.0.0:7400").
    pub bind_addr: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7400".to_string(),
        }
    }
}

/// UDP receiver for velocity commands.
pub struct UdpCommandReceiver {
    socket: UdpSocket,
    running: Arc<AtomicBool>,
    command_tx: Sender<VelocityCommand>,
}

impl UdpCommandReceiver {
    /// Bind the socket and create the command channel.
    pub fn new(
        config: ReceiverConfig,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, Receiver<VelocityCommand>)> {
        let socket = UdpSocket::bind(&config.bind_addr)?;
        socket.set_read_timeout(Some(RECV_TIMEOUT))?;

        let (command_tx, command_rx) = bounded(COMMAND_CHANNEL_CAPACITY);

        log::info!("UDP command receiver bound to {}", socket.local_addr()?);

        Ok((
            Self {
                socket,
                running,
                command_tx,
            },
            command_rx,
        ))
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Run the receiver loop (blocking).
    pub fn run(self) {
        log::info!("UDP command receiver started");

        let mut buffer = [0u8; 64];

        while self.running.load(Ordering::Relaxed) {
            let (len, src) = match self.socket.recv_from(&mut buffer) {
                Ok(result) => result,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    log::error!("UDP recv error: {}", e);
                    continue;
                }
            };

            let command = match decode_command(&buffer[..len]) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Dropping datagram from {}: {}", src, e);
                    continue;
                }
            };

            match self.command_tx.try_send(command) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::warn!("Command queue full, dropping command from {}", src);
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        }

        log::info!("UDP command receiver stopped");
    }
}
