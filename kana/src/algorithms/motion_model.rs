//! Velocity motion model with bounded uniform noise.
//!
//! Each step is a first-order explicit integration:
//!
//! ```text
//! x'     = x + v * cos(θ) * dt
//! y'     = y + v * sin(θ) * dt
//! v'     = v_cmd + n_v            n_v ~ U[-a_v, a_v)
//! θ'     = θ + (ω_cmd + n_ω) * dt n_ω ~ U[-a_ω, a_ω)
//! ```
//!
//! Position advances with the *previous* speed and heading; speed and
//! heading then take the new command. The ordering is part of the model.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::core::types::{Pose, VelocityCommand};

/// Source of uniform samples in [0, 1).
///
/// Abstracted so tests can inject a fixed-seed or scripted source.
pub trait UniformSource {
    /// Generate a random f32 in [0, 1).
    fn uniform(&mut self) -> f32;
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    #[inline]
    fn uniform(&mut self) -> f32 {
        (**self).uniform()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
    #[inline]
    fn uniform(&mut self) -> f32 {
        (**self).uniform()
    }
}

/// Noise generator with configurable seed for reproducibility.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new noise generator.
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }
}

impl UniformSource for NoiseGenerator {
    #[inline]
    fn uniform(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }
}

/// Map a uniform sample `u` in [0, 1) to symmetric noise in [-amplitude, amplitude).
#[inline]
pub fn symmetric_noise(u: f32, amplitude: f32) -> f32 {
    u * 2.0 * amplitude - amplitude
}

/// Noise amplitudes for the motion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModelConfig {
    /// Linear velocity noise bound (m/s).
    pub linear_noise: f32,

    /// Angular velocity noise bound (rad/s).
    pub angular_noise: f32,
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        Self {
            linear_noise: 0.1,
            angular_noise: 0.1,
        }
    }
}

impl MotionModelConfig {
    /// Configuration with no injected noise (deterministic propagation).
    pub fn noiseless() -> Self {
        Self {
            linear_noise: 0.0,
            angular_noise: 0.0,
        }
    }
}

/// Stateless velocity motion model.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: MotionModelConfig,
}

impl MotionModel {
    /// Create a new motion model with the given configuration.
    pub fn new(config: MotionModelConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MotionModelConfig {
        &self.config
    }

    /// Advance `pose` by one step of `dt` seconds under `command`.
    ///
    /// Draws exactly two samples from `rng`: linear noise first, then angular.
    pub fn advance<R: UniformSource + ?Sized>(
        &self,
        pose: &Pose,
        command: &VelocityCommand,
        dt: f32,
        rng: &mut R,
    ) -> Pose {
        advance(
            pose,
            command,
            dt,
            self.config.linear_noise,
            self.config.angular_noise,
            rng,
        )
    }
}

/// Free-function form of [`MotionModel::advance`] with explicit amplitudes.
pub fn advance<R: UniformSource + ?Sized>(
    pose: &Pose,
    command: &VelocityCommand,
    dt: f32,
    noise_linear_amp: f32,
    noise_angular_amp: f32,
    rng: &mut R,
) -> Pose {
    let linear_noise = symmetric_noise(rng.uniform(), noise_linear_amp);
    let angular_noise = symmetric_noise(rng.uniform(), noise_angular_amp);

    Pose {
        x: pose.x + pose.linear_velocity * pose.heading.cos() * dt,
        y: pose.y + pose.linear_velocity * pose.heading.sin() * dt,
        heading: pose.heading + (command.angular_velocity + angular_noise) * dt,
        linear_velocity: command.linear_velocity + linear_noise,
    }
}
