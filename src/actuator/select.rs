//! # Backend Selection
//!
//! Chooses a backend for each actuator family once, at startup.
//!
//! Each family is probed independently: the arm can run on real servos while
//! the rail is simulated. A family whose bus fails to initialise falls back to
//! the simulated backend with a warning. Selection never aborts the process.

use tracing::{info, warn};

use super::dynamixel::DynamixelArm;
use super::lss::{LssBus, LssGripper, LssRail};
use super::{ActuatorBackend, Actuators, Family, NudgeAccumulator, SimulatedActuator};
use crate::config::{ArmConfig, BackendChoice, BusConfig, Config};

/// Rail accumulator bounds from the bus configuration
#[must_use]
pub fn rail_accumulator(config: &BusConfig) -> NudgeAccumulator {
    NudgeAccumulator::new(config.rail_min, config.rail_max, config.rail_step)
}

fn simulated(family: Family, bus: &BusConfig) -> Box<dyn ActuatorBackend> {
    Box::new(SimulatedActuator::new(family, rail_accumulator(bus)))
}

/// Select the arm backend
///
/// The simulated arm keeps the rail bounds from `bus` only so that every
/// simulated family reports positions the same way.
pub fn select_arm(config: &ArmConfig, bus: &BusConfig) -> Box<dyn ActuatorBackend> {
    if config.backend == BackendChoice::Simulated {
        info!("{} backend: simulated (configured)", Family::Arm);
        return simulated(Family::Arm, bus);
    }

    match DynamixelArm::open(config) {
        Ok(arm) => {
            info!("{} backend: Dynamixel on {}", Family::Arm, config.port);
            Box::new(arm)
        }
        Err(e) => {
            warn!("No Dynamixel arm, falling back to simulation: {}", e);
            simulated(Family::Arm, bus)
        }
    }
}

/// Select the rail and gripper backends, which share one bus
pub fn select_rail_and_gripper(
    config: &BusConfig,
) -> (Box<dyn ActuatorBackend>, Box<dyn ActuatorBackend>) {
    if config.backend == BackendChoice::Simulated {
        info!("{} and {} backends: simulated (configured)", Family::Rail, Family::Gripper);
        return (simulated(Family::Rail, config), simulated(Family::Gripper, config));
    }

    match LssBus::open(config) {
        Ok(bus) => {
            info!(
                "{} and {} backends: LSS on {}",
                Family::Rail,
                Family::Gripper,
                config.port
            );
            let rail: Box<dyn ActuatorBackend> =
                Box::new(LssRail::new(bus.clone(), config.rail_id, rail_accumulator(config)));
            let gripper: Box<dyn ActuatorBackend> = Box::new(LssGripper::new(
                bus,
                config.gripper_id,
                config.gripper_open,
                config.gripper_close,
            ));
            (rail, gripper)
        }
        Err(e) => {
            warn!("No LSS bus, falling back to simulation: {}", e);
            (simulated(Family::Rail, config), simulated(Family::Gripper, config))
        }
    }
}

/// Select every family
///
/// # Examples
///
/// ```no_run
/// use fivebar_teleop::actuator::select::select_all;
/// use fivebar_teleop::config::Config;
///
/// let mut actuators = select_all(&Config::default());
/// actuators.release_all();
/// ```
pub fn select_all(config: &Config) -> Actuators {
    let arm = select_arm(&config.arm, &config.bus);
    let (rail, gripper) = select_rail_and_gripper(&config.bus);

    Actuators { arm, rail, gripper }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_ports() -> Config {
        let mut config = Config::default();
        config.arm.port = "/dev/nonexistent_arm_bus_12345".to_string();
        config.bus.port = "/dev/nonexistent_lss_bus_12345".to_string();
        config
    }

    #[test]
    fn test_rail_accumulator_from_config() {
        let acc = rail_accumulator(&BusConfig::default());
        assert_eq!(acc.min(), 0);
        assert_eq!(acc.max(), 36_000);
        assert_eq!(acc.target(), 0);
    }

    #[test]
    fn test_missing_buses_fall_back_to_simulation() {
        let mut actuators = select_all(&missing_ports());

        // Simulated backends accept every operation
        assert!(actuators.arm.drive_pose(0.0, 0.0).is_ok());
        assert!(actuators.gripper.set_ratio(0.5).is_ok());
        for _ in 0..3 {
            actuators.rail.nudge(1.0).unwrap();
        }
        assert_eq!(actuators.rail.normalized_position(), 300.0 / 36_000.0);
        assert!(actuators.release_all().is_empty());
    }

    #[test]
    fn test_configured_simulation_skips_probe() {
        let mut config = missing_ports();
        config.arm.backend = BackendChoice::Simulated;
        config.bus.backend = BackendChoice::Simulated;

        let mut actuators = select_all(&config);
        assert!(actuators.arm.drive_pose(1.0, 2.0).is_ok());
        assert!(actuators.release_all().is_empty());
    }
}
