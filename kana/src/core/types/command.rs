/// Velocity command delivered by the command source.
///
/// Transient: consumed by exactly one motion-model step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    /// Forward velocity (m/s).
    pub linear_velocity: f32,
    /// Yaw rate (rad/s).
    pub angular_velocity: f32,
}

impl VelocityCommand {
    /// Create a new command.
    #[inline]
    pub const fn new(linear_velocity: f32, angular_velocity: f32) -> Self {
        Self {
            linear_velocity,
            angular_velocity,
        }
    }
}
