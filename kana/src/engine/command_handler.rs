//! Velocity command handler.
//!
//! Owns the particle set. On each command it computes one shared `dt` from the
//! wall clock, then for every particle: erase old mark, advance, store, mark.

use std::time::Instant;

use crate::algorithms::{MotionModel, ParticleSet, UniformSource};
use crate::core::types::VelocityCommand;
use crate::state::SharedGridHandle;

/// Intensity used for particle marks unless configured otherwise.
pub const DEFAULT_MARK_INTENSITY: u8 = 255;

/// Propagates the particle set and keeps the grid in sync with it.
///
/// Invocations must not overlap; the owning thread serializes them.
pub struct CommandHandler<R: UniformSource> {
    particles: ParticleSet,
    model: MotionModel,
    rng: R,
    grid: SharedGridHandle,
    mark_intensity: u8,
    last_update: Instant,
    last_dt: Option<f32>,
    commands_handled: u64,
}

impl<R: UniformSource> CommandHandler<R> {
    /// Create a handler and draw the initial particle positions.
    ///
    /// The dt reference time is seeded here, so the first command's dt is
    /// the time since construction.
    pub fn new(
        particles: ParticleSet,
        model: MotionModel,
        rng: R,
        grid: SharedGridHandle,
        mark_intensity: u8,
    ) -> Self {
        for pose in particles.poses() {
            grid.mark(pose.x, pose.y, mark_intensity);
        }

        Self {
            particles,
            model,
            rng,
            grid,
            mark_intensity,
            last_update: Instant::now(),
            last_dt: None,
            commands_handled: 0,
        }
    }

    /// Handle a command arriving now.
    pub fn on_command(&mut self, command: VelocityCommand) {
        self.on_command_at(command, Instant::now());
    }

    /// Handle a command with an explicit arrival time.
    ///
    /// A `now` earlier than the previous arrival yields dt = 0.
    pub fn on_command_at(&mut self, command: VelocityCommand, now: Instant) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.step(command, dt);
    }

    /// Advance every particle by `dt` seconds under `command`.
    pub fn step(&mut self, command: VelocityCommand, dt: f32) {
        log::debug!(
            "Command v={:.3} w={:.3} dt={:.4}s",
            command.linear_velocity,
            command.angular_velocity,
            dt
        );

        for pose in self.particles.poses_mut() {
            self.grid.erase(pose.x, pose.y);
            *pose = self.model.advance(pose, &command, dt, &mut self.rng);
            log::trace!("heading={:.4}", pose.heading);
            self.grid.mark(pose.x, pose.y, self.mark_intensity);
        }

        self.last_dt = Some(dt);
        self.commands_handled += 1;
    }

    /// The particle set (read-only).
    #[inline]
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// dt used by the most recent command, if any.
    #[inline]
    pub fn last_dt(&self) -> Option<f32> {
        self.last_dt
    }

    /// Number of commands handled so far.
    #[inline]
    pub fn commands_handled(&self) -> u64 {
        self.commands_handled
    }
}
