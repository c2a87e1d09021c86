//! I/O infrastructure.
//!
//! - `udp_command_receiver`: velocity commands from the network
//! - `stdin_keys`: keyboard events for the render loop

pub mod stdin_keys;
pub mod udp_command_receiver;

pub use stdin_keys::StdinKeySource;
pub use udp_command_receiver::{ReceiverConfig, UdpCommandReceiver, decode_command, encode_command};
