//! # Simulated Actuator
//!
//! Stand-in used when a hardware bus is absent. Every command is reported
//! through `tracing` as `[sim] <family>.<op>(...)`; the nudge accumulator is
//! kept so position readback behaves like the real rail.

use tracing::info;

use super::rail::NudgeAccumulator;
use super::{ActuatorBackend, Family};
use crate::error::Result;

/// No-op backend that logs its commands.
#[derive(Debug, Clone)]
pub struct SimulatedActuator {
    family: Family,
    accumulator: NudgeAccumulator,
}

impl SimulatedActuator {
    #[must_use]
    pub fn new(family: Family, accumulator: NudgeAccumulator) -> Self {
        Self { family, accumulator }
    }

    #[must_use]
    pub fn family(&self) -> Family {
        self.family
    }

    /// Current accumulator target.
    #[must_use]
    pub fn target(&self) -> i32 {
        self.accumulator.target()
    }
}

impl ActuatorBackend for SimulatedActuator {
    fn drive_pose(&mut self, angle_a: f64, angle_b: f64) -> Result<()> {
        info!("[sim] {}.drive_pose({:.4}, {:.4})", self.family, angle_a, angle_b);
        Ok(())
    }

    fn set_ratio(&mut self, ratio: f64) -> Result<()> {
        info!("[sim] {}.set_ratio({:.8})", self.family, ratio);
        Ok(())
    }

    fn nudge(&mut self, axis: f64) -> Result<()> {
        if let Some(target) = self.accumulator.nudge(axis) {
            info!("[sim] {}.nudge({:+.3}) -> {}", self.family, axis, target);
        }
        Ok(())
    }

    fn normalized_position(&self) -> f64 {
        self.accumulator.normalized()
    }

    fn release(&mut self) -> Result<()> {
        info!("[sim] {}.release()", self.family);
        Ok(())
    }
}
