//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field carries a serde default, so an empty file (or no file at all)
//! yields the settings of the reference build.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{FiveBarError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub arm: ArmConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Game-pad configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Empty means auto-detect.
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_deadzone")]
    pub deadzone: f64,
}

/// Control loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MotionConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_effector_step")]
    pub effector_step: f64,

    #[serde(default = "default_gripper_threshold")]
    pub gripper_threshold: f64,
}

/// Backend choice for one actuator bus
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Probe the hardware bus, fall back to simulation.
    Auto,
    /// Never touch the hardware bus.
    Simulated,
}

/// Arm pair configuration (Dynamixel bus)
#[derive(Debug, Deserialize, Clone)]
pub struct ArmConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendChoice,

    #[serde(default = "default_arm_port")]
    pub port: String,

    #[serde(default = "default_arm_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_right_id")]
    pub right_id: u8,

    #[serde(default = "default_left_id")]
    pub left_id: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Rail and gripper configuration (LSS daisy chain)
#[derive(Debug, Deserialize, Clone)]
pub struct BusConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendChoice,

    #[serde(default = "default_bus_port")]
    pub port: String,

    #[serde(default = "default_bus_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_rail_id")]
    pub rail_id: u8,

    #[serde(default = "default_gripper_id")]
    pub gripper_id: u8,

    #[serde(default = "default_rail_min")]
    pub rail_min: i32,

    #[serde(default = "default_rail_max")]
    pub rail_max: i32,

    #[serde(default = "default_rail_step")]
    pub rail_step: i32,

    #[serde(default = "default_gripper_open")]
    pub gripper_open: i32,

    #[serde(default = "default_gripper_close")]
    pub gripper_close: i32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Empty means stderr only.
    #[serde(default)]
    pub dir: String,
}

// Default value functions
fn default_deadzone() -> f64 { 0.10 }

fn default_tick_ms() -> u64 { 50 }
fn default_effector_step() -> f64 { 0.05 }
fn default_gripper_threshold() -> f64 { 0.010 }

fn default_backend() -> BackendChoice { BackendChoice::Auto }

fn default_arm_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_arm_baud_rate() -> u32 { 57600 }
fn default_right_id() -> u8 { 1 }
fn default_left_id() -> u8 { 2 }
fn default_timeout_ms() -> u64 { 50 }

fn default_bus_port() -> String { "/dev/ttyUSB1".to_string() }
fn default_bus_baud_rate() -> u32 { 115200 }
fn default_rail_id() -> u8 { 0 }
fn default_gripper_id() -> u8 { 1 }
fn default_rail_min() -> i32 { 0 }
fn default_rail_max() -> i32 { 36_000 }
fn default_rail_step() -> i32 { 100 }
fn default_gripper_open() -> i32 { 0 }
fn default_gripper_close() -> i32 { 5000 }

fn default_log_level() -> String { "info".to_string() }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            deadzone: default_deadzone(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            effector_step: default_effector_step(),
            gripper_threshold: default_gripper_threshold(),
        }
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            port: default_arm_port(),
            baud_rate: default_arm_baud_rate(),
            right_id: default_right_id(),
            left_id: default_left_id(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            port: default_bus_port(),
            baud_rate: default_bus_baud_rate(),
            rail_id: default_rail_id(),
            gripper_id: default_gripper_id(),
            rail_min: default_rail_min(),
            rail_max: default_rail_max(),
            rail_step: default_rail_step(),
            gripper_open: default_gripper_open(),
            gripper_close: default_gripper_close(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: String::new(),
        }
    }
}

/// Baud rates accepted by Dynamixel X-series servos.
const ARM_BAUD_RATES: [u32; 7] = [9600, 57600, 115200, 1_000_000, 2_000_000, 3_000_000, 4_000_000];

/// Baud rates accepted by LSS servos.
const BUS_BAUD_RATES: [u32; 9] = [9600, 19200, 38400, 57600, 115200, 230400, 250000, 460800, 500000];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn invalid(msg: impl std::fmt::Display) -> FiveBarError {
    FiveBarError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fivebar_teleop::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Input conditioning
        if !(0.0..=0.5).contains(&self.controller.deadzone) {
            return Err(invalid("deadzone must be between 0.0 and 0.5"));
        }

        // Loop timing
        if self.motion.tick_ms == 0 || self.motion.tick_ms > 1000 {
            return Err(invalid("tick_ms must be between 1 and 1000"));
        }

        if !(self.motion.effector_step > 0.0 && self.motion.effector_step <= 0.5) {
            return Err(invalid("effector_step must be greater than 0.0 and at most 0.5"));
        }

        if !(0.0..=0.5).contains(&self.motion.gripper_threshold) {
            return Err(invalid("gripper_threshold must be between 0.0 and 0.5"));
        }

        // Arm bus
        if self.arm.port.is_empty() {
            return Err(invalid("arm port cannot be empty"));
        }

        if !ARM_BAUD_RATES.contains(&self.arm.baud_rate) {
            return Err(invalid(format!(
                "arm baud_rate must be one of: {:?}",
                ARM_BAUD_RATES
            )));
        }

        if self.arm.right_id == self.arm.left_id {
            return Err(invalid("arm right_id and left_id must differ"));
        }

        // 0xFE is the Dynamixel broadcast id
        if self.arm.right_id >= 0xFD || self.arm.left_id >= 0xFD {
            return Err(invalid("arm servo ids must be between 0 and 252"));
        }

        if self.arm.timeout_ms == 0 || self.arm.timeout_ms > 10000 {
            return Err(invalid("arm timeout_ms must be between 1 and 10000"));
        }

        // Rail / gripper bus
        if self.bus.port.is_empty() {
            return Err(invalid("bus port cannot be empty"));
        }

        if !BUS_BAUD_RATES.contains(&self.bus.baud_rate) {
            return Err(invalid(format!(
                "bus baud_rate must be one of: {:?}",
                BUS_BAUD_RATES
            )));
        }

        if self.bus.rail_id == self.bus.gripper_id {
            return Err(invalid("bus rail_id and gripper_id must differ"));
        }

        if self.bus.rail_id > 250 || self.bus.gripper_id > 250 {
            return Err(invalid("bus servo ids must be between 0 and 250"));
        }

        if self.bus.rail_min >= self.bus.rail_max {
            return Err(invalid("rail_min must be less than rail_max"));
        }

        if self.bus.rail_step <= 0 {
            return Err(invalid("rail_step must be greater than 0"));
        }

        if self.bus.gripper_open == self.bus.gripper_close {
            return Err(invalid("gripper_open and gripper_close must differ"));
        }

        // Logging
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "logging level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
