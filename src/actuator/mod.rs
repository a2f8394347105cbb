//! # Actuator Module
//!
//! The five-operation boundary between the motion controller and hardware.
//!
//! This module handles:
//! - The [`ActuatorBackend`] capability set shared by every variant
//! - Simulated, Dynamixel (arm pair) and LSS (rail + gripper) variants
//! - One-shot backend selection per actuator family at startup
//!
//! Angles cross this boundary in radians and ratios in [0, 1]. Native units
//! never leave the variant that owns them.

pub mod dynamixel;
pub mod lss;
pub mod rail;
pub mod select;
pub mod simulated;

use std::fmt;
use tracing::{info, warn};

use crate::error::{FiveBarError, Result};
pub use rail::NudgeAccumulator;
pub use simulated::SimulatedActuator;

/// Capability set of one actuator family.
///
/// A family implements the operations it supports; the rest report
/// [`FiveBarError::Unsupported`]. Every operation is safe to repeat with the
/// same value.
#[cfg_attr(test, mockall::automock)]
pub trait ActuatorBackend: Send {
    /// Command both arm joints to absolute angles in radians.
    fn drive_pose(&mut self, _angle_a: f64, _angle_b: f64) -> Result<()> {
        Err(FiveBarError::Unsupported("drive_pose"))
    }

    /// Move between the open (0.0) and closed (1.0) endpoints.
    fn set_ratio(&mut self, _ratio: f64) -> Result<()> {
        Err(FiveBarError::Unsupported("set_ratio"))
    }

    /// Add `axis * step` to the target accumulator and move there.
    fn nudge(&mut self, _axis: f64) -> Result<()> {
        Err(FiveBarError::Unsupported("nudge"))
    }

    /// Accumulator position as a fraction of its range.
    fn normalized_position(&self) -> f64 {
        0.0
    }

    /// De-energize, or park in the family's safe position.
    fn release(&mut self) -> Result<()>;
}

/// Actuator families, selected independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Arm,
    Rail,
    Gripper,
}

impl Family {
    /// Name used in log lines.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Family::Arm => "fivebar",
            Family::Rail => "rail",
            Family::Gripper => "gripper",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three actuator families driven by one control session.
pub struct Actuators {
    pub arm: Box<dyn ActuatorBackend>,
    pub rail: Box<dyn ActuatorBackend>,
    pub gripper: Box<dyn ActuatorBackend>,
}

impl fmt::Debug for Actuators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actuators").finish_non_exhaustive()
    }
}

impl Actuators {
    /// Every family simulated, rail accumulator bounded by `rail`.
    #[must_use]
    pub fn simulated(rail: NudgeAccumulator) -> Self {
        Self {
            arm: Box::new(SimulatedActuator::new(Family::Arm, rail)),
            rail: Box::new(SimulatedActuator::new(Family::Rail, rail)),
            gripper: Box::new(SimulatedActuator::new(Family::Gripper, rail)),
        }
    }

    /// Release every family, in arm, rail, gripper order.
    ///
    /// A failing family does not stop the others from being released. Each
    /// failure is logged and returned.
    pub fn release_all(&mut self) -> Vec<(Family, FiveBarError)> {
        let mut failures = Vec::new();

        for (family, backend) in [
            (Family::Arm, &mut self.arm),
            (Family::Rail, &mut self.rail),
            (Family::Gripper, &mut self.gripper),
        ] {
            match backend.release() {
                Ok(()) => info!("Released {}", family),
                Err(e) => {
                    warn!("Failed to release {}: {}", family, e);
                    failures.push((family, e));
                }
            }
        }

        failures
    }
}
