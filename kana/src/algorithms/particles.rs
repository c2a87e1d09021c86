//! Fixed-size particle storage.

use crate::core::types::Pose;

/// Ordered, fixed-length collection of particle poses.
///
/// The length is chosen at construction and never changes: there is no
/// resampling, birth, or death of particles.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    poses: Box<[Pose]>,
}

impl ParticleSet {
    /// Create `count` particles, all at the origin and at rest.
    pub fn new(count: usize) -> Self {
        Self::from_initial(count, Pose::origin())
    }

    /// Create `count` particles at the given pose.
    pub fn from_initial(count: usize, initial: Pose) -> Self {
        Self {
            poses: vec![initial; count].into_boxed_slice(),
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// True if the set holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Read-only view of all poses.
    #[inline]
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Mutable access for the owning command handler.
    #[inline]
    pub(crate) fn poses_mut(&mut self) -> &mut [Pose] {
        &mut self.poses
    }

    /// Mean position of all particles, or `None` when empty.
    pub fn mean_position(&self) -> Option<(f32, f32)> {
        if self.poses.is_empty() {
            return None;
        }
        let n = self.poses.len() as f32;
        let (sx, sy) = self
            .poses
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some((sx / n, sy / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_all_at_origin() {
        let set = ParticleSet::new(25);
        assert_eq!(set.len(), 25);
        assert!(set.poses().iter().all(|p| *p == Pose::origin()));
    }

    #[test]
    fn test_length_is_fixed_under_mutation() {
        let mut set = ParticleSet::new(4);
        for p in set.poses_mut() {
            p.x += 1.0;
        }
        assert_eq!(set.len(), 4);
        assert_eq!(set.mean_position(), Some((1.0, 0.0)));
    }

    #[test]
    fn test_empty_set() {
        let set = ParticleSet::new(0);
        assert!(set.is_empty());
        assert_eq!(set.mean_position(), None);
    }
}
