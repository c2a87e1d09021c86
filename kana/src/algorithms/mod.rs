//! Core algorithms.
//!
//! - [`MotionModel`]: velocity motion model with bounded uniform noise
//! - [`ParticleSet`]: fixed-size population of pose hypotheses

pub mod motion_model;
mod particles;

pub use motion_model::{MotionModel, MotionModelConfig, NoiseGenerator, UniformSource};
pub use particles::ParticleSet;
