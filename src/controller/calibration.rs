//! # Calibration Module
//!
//! Deadzone policy applied by the motion controller to raw axis values.
//!
//! ## Deadzone
//!
//! A deadzone eliminates small stick movements near center to prevent drift.
//! Unlike a rescaling deadzone, values outside the band pass through
//! unchanged: the effector and rail speeds stay proportional to the raw stick
//! deflection.
//!
//! ## Trigger
//!
//! The analog trigger reports -1.0 released and 1.0 fully pressed. It is
//! remapped to a ratio in [0, 1] before the deadzone is applied.
//!
//! ## Usage
//!
//! ```
//! use fivebar_teleop::controller::calibration::Deadzone;
//!
//! let dz = Deadzone::new(0.10);
//!
//! assert_eq!(dz.apply(0.05), 0.0);
//! assert_eq!(dz.apply(-0.5), -0.5);
//! assert_eq!(dz.trigger_ratio(-1.0), 0.0);
//! assert_eq!(dz.trigger_ratio(1.0), 1.0);
//! ```

/// Deadzone magnitude used by the reference build.
pub const DEFAULT_DEADZONE: f64 = 0.10;

/// Minimum analog magnitude below which input counts as neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadzone {
    threshold: f64,
}

impl Default for Deadzone {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DEADZONE,
        }
    }
}

impl Deadzone {
    /// Creates a deadzone. Negative thresholds are clamped to 0.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    /// Returns the configured threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `value` is strictly outside the band.
    #[inline]
    #[must_use]
    pub fn exceeded(&self, value: f64) -> bool {
        value.abs() > self.threshold
    }

    /// `value`, or exactly 0.0 when its magnitude is below the threshold.
    #[inline]
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if value.abs() < self.threshold {
            0.0
        } else {
            value
        }
    }

    /// Remap a bipolar trigger value to [0, 1], zeroing it under the threshold.
    #[must_use]
    pub fn trigger_ratio(&self, raw: f64) -> f64 {
        let ratio = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
        if ratio < self.threshold {
            0.0
        } else {
            ratio
        }
    }
}
