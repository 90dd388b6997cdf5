//! Rotation angles tried for each template.

/// Fixed-step angle enumeration `0, step, 2*step, ... < 360` in degrees.
///
/// A step of 0 disables rotation and yields the single angle 0. A step that
/// does not divide 360 drops the final partial sector; 360 itself is never
/// included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AngleSweep {
    step_deg: u32,
    len: usize,
}

impl AngleSweep {
    pub fn new(step_deg: u32) -> Self {
        let len = if step_deg == 0 {
            1
        } else {
            (0..360u32).step_by(step_deg as usize).count()
        };
        Self { step_deg, len }
    }

    /// Returns the number of angles in the sweep.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a sweep contains at least angle 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the step size in degrees (0 when rotation is disabled).
    pub fn step_deg(&self) -> u32 {
        self.step_deg
    }

    /// Returns the angle for the given index.
    pub fn angle_at(&self, idx: usize) -> u32 {
        debug_assert!(idx < self.len);
        self.step_deg * idx as u32
    }

    /// Iterates over all angles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).map(|idx| self.angle_at(idx))
    }
}
