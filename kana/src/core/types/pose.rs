//! 2D pose with forward speed.

/// One particle's pose estimate in the robot-centered frame.
///
/// The origin is the robot's start pose. Positions are in meters,
/// heading in radians (CCW positive, not normalized), speed in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// X position (meters).
    pub x: f32,
    /// Y position (meters).
    pub y: f32,
    /// Heading (radians).
    pub heading: f32,
    /// Last commanded forward speed including noise (m/s).
    pub linear_velocity: f32,
}

impl Pose {
    /// Create a new pose.
    #[inline]
    pub const fn new(x: f32, y: f32, heading: f32, linear_velocity: f32) -> Self {
        Self {
            x,
            y,
            heading,
            linear_velocity,
        }
    }

    /// Pose at the origin, facing +X, at rest.
    #[inline]
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_default() {
        assert_eq!(Pose::origin(), Pose::default());
    }
}
