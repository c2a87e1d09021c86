//! Kana - live visualization of a particle population under a noisy motion model
//!
//! Each velocity command advances every particle through a velocity motion
//! model with bounded uniform noise. A shared grid shows all particle
//! positions and is rendered continuously at a fixed rate.
//!
//! There is no importance weighting or resampling: particles are only
//! propagated, never corrected.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            io/  +  threads/                         │  ← Infrastructure
//! │   (UDP commands, stdin keys, command thread)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────┐ ┌────────────────────────┐
//! │        engine/           │ │        render/         │  ← Orchestration
//! │    (command handler)     │ │ (render loop, snapshot)│
//! └──────────────────────────┘ └────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    state/                           │  ← Shared state
//! │              (mutex-guarded grid)                   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │          (motion model, particle set)               │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │             (Pose, VelocityCommand)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Threads
//!
//! - **command**: owns the particle set, applies commands as they arrive
//! - **main**: render loop; the only other grid user
//! - **udp-commands**, **stdin-keys**: feed the two loops over channels

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Algorithms (depends on core)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 3: Shared state
// ============================================================================
pub mod state;

// ============================================================================
// Layer 4: Orchestration (depends on algorithms, state)
// ============================================================================
pub mod engine;
pub mod render;

// ============================================================================
// Layer 5: Infrastructure (depends on all layers)
// ============================================================================
pub mod config;
pub mod error;
pub mod io;
pub mod threads;
pub mod utils;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use crate::core::types::{Pose, VelocityCommand};

pub use algorithms::{MotionModel, MotionModelConfig, NoiseGenerator, ParticleSet, UniformSource};

pub use state::{GridConfig, GridFrame, SharedGrid, SharedGridHandle, create_shared_grid};

pub use engine::{CommandHandler, DEFAULT_MARK_INTENSITY};

pub use render::{
    Display, ExitReason, HeadlessDisplay, Key, KeySource, LoopState, RenderLoop, RenderLoopConfig,
    SnapshotWriter,
};

pub use config::{AppConfig, Overrides};
pub use error::{Error, Result};
pub use io::{ReceiverConfig, StdinKeySource, UdpCommandReceiver};
pub use threads::CommandThread;
