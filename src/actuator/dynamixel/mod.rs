//! # Dynamixel Arm Module
//!
//! Drives the two arm servos over Dynamixel Protocol 2.0.
//!
//! This module handles:
//! - Write packet encoding with byte stuffing
//! - Status packet decoding and error reporting
//! - CRC-16 checksum calculation
//! - Torque enable on attach and torque disable on release
//!
//! Every write waits for the servo's status reply, so a missing or
//! misconfigured servo is detected at probe time. Input is discarded before
//! each write, so a stray byte costs one exchange and never shifts later
//! replies.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod protocol;

use std::time::Duration;
use tracing::{debug, info, warn};

use self::decoder::expect_ok;
use self::encoder::{encode_goal_position, encode_torque};
use self::protocol::{rad_to_raw, DXL_WRITE_STATUS_SIZE};
use super::ActuatorBackend;
use crate::config::ArmConfig;
use crate::error::{FiveBarError, Result};
use crate::serial::SerialLink;

/// Arm servo pair on one Dynamixel bus
#[derive(Debug)]
pub struct DynamixelArm {
    link: SerialLink,
    right_id: u8,
    left_id: u8,
}

impl DynamixelArm {
    /// Open the arm bus and enable torque on both servos
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be opened or either servo fails to
    /// acknowledge the torque enable.
    pub fn open(config: &ArmConfig) -> Result<Self> {
        let link = SerialLink::open(
            &config.port,
            config.baud_rate,
            Duration::from_millis(config.timeout_ms),
        )?;

        Self::attach(link, config.right_id, config.left_id)
    }

    /// Enable torque on both servos of an already-open link
    ///
    /// # Errors
    ///
    /// Returns error if either servo does not acknowledge.
    pub fn attach(link: SerialLink, right_id: u8, left_id: u8) -> Result<Self> {
        let mut arm = Self {
            link,
            right_id,
            left_id,
        };

        for id in [right_id, left_id] {
            arm.write(&encode_torque(id, true), id)?;
        }

        info!(
            "Dynamixel arm ready on {} (right ID {}, left ID {})",
            arm.link.device_path(),
            right_id,
            left_id
        );
        Ok(arm)
    }

    /// Send one write packet and check its status reply.
    fn write(&mut self, packet: &[u8], id: u8) -> Result<()> {
        self.link.discard_input()?;
        self.link.send(packet)?;

        let mut reply = [0u8; DXL_WRITE_STATUS_SIZE];
        self.link.receive(&mut reply)?;
        expect_ok(&reply, id)?;
        Ok(())
    }

    /// Write every packet, returning the first failure.
    fn write_each(&mut self, packets: &[(u8, Vec<u8>)], what: &str) -> Result<()> {
        let mut first_error: Option<FiveBarError> = None;

        for (id, packet) in packets {
            if let Err(e) = self.write(packet, *id) {
                warn!("{} failed for ID {}: {}", what, id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ActuatorBackend for DynamixelArm {
    /// `angle_a` goes to the right servo, `angle_b` to the left.
    ///
    /// The left goal is written even if the right servo fails.
    fn drive_pose(&mut self, angle_a: f64, angle_b: f64) -> Result<()> {
        let right_raw = rad_to_raw(angle_a);
        let left_raw = rad_to_raw(angle_b);
        debug!("Goal position: right={} left={}", right_raw, left_raw);

        let packets = [
            (self.right_id, encode_goal_position(self.right_id, right_raw)),
            (self.left_id, encode_goal_position(self.left_id, left_raw)),
        ];
        self.write_each(&packets, "Goal position")
    }

    fn release(&mut self) -> Result<()> {
        let packets = [
            (self.right_id, encode_torque(self.right_id, false)),
            (self.left_id, encode_torque(self.left_id, false)),
        ];
        self.write_each(&packets, "Torque off")
    }
}
