//! Bounded target accumulator for incrementally positioned actuators.

/// Running target moved by bounded increments.
///
/// The target never leaves `[min, max]`: a nudge past either bound is
/// clamped, not rejected. Fractional increments accumulate; the commanded
/// position is the target truncated toward zero.
///
/// # Examples
///
/// ```
/// use fivebar_teleop::actuator::NudgeAccumulator;
///
/// let mut rail = NudgeAccumulator::new(0, 36_000, 100);
/// for _ in 0..3 {
///     rail.nudge(1.0);
/// }
/// assert_eq!(rail.target(), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NudgeAccumulator {
    min: i32,
    max: i32,
    step: i32,
    target: f64,
}

impl NudgeAccumulator {
    /// Creates an accumulator at `min`. Bounds given in the wrong order are
    /// swapped.
    #[must_use]
    pub fn new(min: i32, max: i32, step: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            step,
            target: f64::from(min),
        }
    }

    /// Add `axis * step` to the target, clamped to the bounds.
    ///
    /// Returns the commanded position, or `None` when the increment is zero
    /// (or not a number) and nothing needs to move.
    pub fn nudge(&mut self, axis: f64) -> Option<i32> {
        let delta = axis * f64::from(self.step);
        if delta == 0.0 || !delta.is_finite() {
            return None;
        }

        self.target = (self.target + delta).clamp(f64::from(self.min), f64::from(self.max));
        Some(self.target())
    }

    /// Commanded position: the target truncated toward zero.
    #[must_use]
    pub fn target(&self) -> i32 {
        // Within [min, max], so the cast cannot saturate
        self.target as i32
    }

    /// Position as a fraction of `[min, max]`.
    #[must_use]
    pub fn normalized(&self) -> f64 {
        let span = f64::from(self.max) - f64::from(self.min);
        if span == 0.0 {
            return 0.0;
        }
        (self.target - f64::from(self.min)) / span
    }

    /// Reset to `min` and return it.
    pub fn home(&mut self) -> i32 {
        self.target = f64::from(self.min);
        self.target()
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_full_nudges() {
        let mut rail = NudgeAccumulator::new(0, 36_000, 100);
        for _ in 0..3 {
            rail.nudge(1.0);
        }
        assert_eq!(rail.target(), 300);
        assert_eq!(rail.normalized(), 300.0 / 36_000.0);
    }

    #[test]
    fn test_zero_nudge_is_noop() {
        let mut rail = NudgeAccumulator::new(0, 36_000, 100);
        rail.nudge(1.0);
        assert_eq!(rail.nudge(0.0), None);
        assert_eq!(rail.nudge(-0.0), None);
        assert_eq!(rail.target(), 100);
    }

    #[test]
    fn test_fractional_nudges_accumulate() {
        let mut rail = NudgeAccumulator::new(0, 36_000, 100);
        assert_eq!(rail.nudge(0.125), Some(12));
        assert_eq!(rail.nudge(0.125), Some(25));
        for _ in 0..6 {
            rail.nudge(0.125);
        }
        assert_eq!(rail.target(), 100);
        assert_eq!(rail.normalized(), 100.0 / 36_000.0);
    }

    #[test]
    fn test_normalized_spans_offset_range() {
        let mut rail = NudgeAccumulator::new(-500, 500, 100);
        assert_eq!(rail.normalized(), 0.0);
        rail.nudge(1.0);
        assert_eq!(rail.normalized(), 0.1);
        for _ in 0..20 {
            rail.nudge(1.0);
        }
        assert_eq!(rail.normalized(), 1.0);

        let rail = NudgeAccumulator::new(-1000, 0, 100);
        assert_eq!(rail.normalized(), 0.0);
    }

    #[test]
    fn test_normalized_degenerate_range() {
        let mut rail = NudgeAccumulator::new(7, 7, 100);
        rail.nudge(1.0);
        assert_eq!(rail.target(), 7);
        assert_eq!(rail.normalized(), 0.0);
    }

    #[test]
    fn test_clamped_at_bounds() {
        let mut rail = NudgeAccumulator::new(0, 250, 100);
        assert_eq!(rail.nudge(-1.0), Some(0));
        rail.nudge(1.0);
        rail.nudge(1.0);
        assert_eq!(rail.nudge(1.0), Some(250));
        assert_eq!(rail.target(), 250);
    }

    #[test]
    fn test_partial_axis() {
        let mut rail = NudgeAccumulator::new(0, 36_000, 100);
        assert_eq!(rail.nudge(0.5), Some(50));
        assert_eq!(rail.nudge(-0.25), Some(25));
    }

    #[test]
    fn test_home_resets_to_min() {
        let mut rail = NudgeAccumulator::new(-500, 500, 100);
        assert_eq!(rail.target(), -500);
        rail.nudge(1.0);
        assert_eq!(rail.home(), -500);
    }

    #[test]
    fn test_swapped_bounds() {
        let rail = NudgeAccumulator::new(100, 0, 10);
        assert_eq!(rail.min(), 0);
        assert_eq!(rail.max(), 100);
    }

    #[test]
    fn test_nan_axis_ignored() {
        let mut rail = NudgeAccumulator::new(0, 36_000, 100);
        assert_eq!(rail.nudge(f64::NAN), None);
        assert_eq!(rail.target(), 0);
    }

    proptest! {
        #[test]
        fn prop_target_stays_in_bounds(
            axes in prop::collection::vec(-1.0f64..=1.0, 0..200),
            step in 1i32..5000,
        ) {
            let mut rail = NudgeAccumulator::new(-1_000, 36_000, step);
            for axis in axes {
                rail.nudge(axis);
                prop_assert!((-1_000..=36_000).contains(&rail.target()));
                prop_assert!((0.0..=1.0).contains(&rail.normalized()));
            }
        }
    }
}
