//! # LSS Bus Module
//!
//! Rail and gripper servos sharing one Lynxmotion Smart Servo daisy chain.
//!
//! Commands are ASCII, one per line, terminated by a carriage return:
//!
//! ```text
//! #<id>D<position>\r
//! ```
//!
//! Positions are in tenths of a degree and may exceed one turn. The bus is
//! write-only here; no query is ever sent.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use super::rail::NudgeAccumulator;
use super::ActuatorBackend;
use crate::config::BusConfig;
use crate::error::{FiveBarError, Result};
use crate::serial::SerialLink;

/// Port timeout for the daisy chain. Nothing is read back, so it only bounds
/// a blocked write.
const LSS_PORT_TIMEOUT: Duration = Duration::from_millis(50);

/// Encode a move to an absolute position
///
/// # Examples
///
/// ```
/// use fivebar_teleop::actuator::lss::encode_move;
///
/// assert_eq!(encode_move(0, 300), "#0D300\r");
/// ```
#[must_use]
pub fn encode_move(id: u8, position: i32) -> String {
    format!("#{}D{}\r", id, position)
}

/// Gripper position for `ratio` between the open and closed endpoints.
///
/// `ratio` is clamped to [0, 1] and the result truncated toward zero.
#[must_use]
pub fn gripper_position(open: i32, close: i32, ratio: f64) -> i32 {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    let target = f64::from(open) + ratio * (f64::from(close) - f64::from(open));
    target as i32
}

/// One daisy chain, shared by every servo on it
#[derive(Debug)]
pub struct LssBus {
    link: SerialLink,
}

/// Handle to a shared bus
pub type SharedBus = Arc<Mutex<LssBus>>;

impl LssBus {
    /// Open the daisy chain
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the port cannot be opened.
    pub fn open(config: &BusConfig) -> Result<SharedBus> {
        let link = SerialLink::open(&config.port, config.baud_rate, LSS_PORT_TIMEOUT)?;
        Ok(Self::shared(link))
    }

    /// Share an already-open link
    pub fn shared(link: SerialLink) -> SharedBus {
        Arc::new(Mutex::new(Self { link }))
    }

    fn move_to(&mut self, id: u8, position: i32) -> Result<()> {
        let command = encode_move(id, position);
        debug!("LSS {}", command.trim_end());
        self.link.send(command.as_bytes())
    }
}

fn send_move(bus: &SharedBus, id: u8, position: i32) -> Result<()> {
    let mut bus = bus
        .lock()
        .map_err(|_| FiveBarError::Serial("LSS bus lock poisoned".to_string()))?;
    bus.move_to(id, position)
}

/// Rail servo, positioned through a nudge accumulator
#[derive(Debug)]
pub struct LssRail {
    bus: SharedBus,
    id: u8,
    accumulator: NudgeAccumulator,
}

impl LssRail {
    #[must_use]
    pub fn new(bus: SharedBus, id: u8, accumulator: NudgeAccumulator) -> Self {
        Self { bus, id, accumulator }
    }

    /// Reset the accumulator to its minimum and move there
    ///
    /// # Errors
    ///
    /// Returns error if the move cannot be written.
    pub fn home(&mut self) -> Result<()> {
        let target = self.accumulator.home();
        send_move(&self.bus, self.id, target)
    }

    #[must_use]
    pub fn target(&self) -> i32 {
        self.accumulator.target()
    }
}

impl ActuatorBackend for LssRail {
    fn nudge(&mut self, axis: f64) -> Result<()> {
        match self.accumulator.nudge(axis) {
            Some(target) => send_move(&self.bus, self.id, target),
            None => Ok(()),
        }
    }

    fn normalized_position(&self) -> f64 {
        self.accumulator.normalized()
    }

    /// Parks the rail at its minimum; the servo stays powered.
    fn release(&mut self) -> Result<()> {
        self.home()
    }
}

/// Gripper servo, positioned between its open and closed endpoints
#[derive(Debug)]
pub struct LssGripper {
    bus: SharedBus,
    id: u8,
    open: i32,
    close: i32,
}

impl LssGripper {
    #[must_use]
    pub fn new(bus: SharedBus, id: u8, open: i32, close: i32) -> Self {
        Self { bus, id, open, close }
    }
}

impl ActuatorBackend for LssGripper {
    fn set_ratio(&mut self, ratio: f64) -> Result<()> {
        send_move(&self.bus, self.id, gripper_position(self.open, self.close, ratio))
    }

    /// Opens the gripper.
    fn release(&mut self) -> Result<()> {
        send_move(&self.bus, self.id, self.open)
    }
}
