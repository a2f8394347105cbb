//! # Controller Module
//!
//! Game-pad input handling.
//!
//! This module handles:
//! - Game-pad detection and level-state reading via evdev
//! - Rising-edge detection for digital controls
//! - Deadzone and trigger conditioning used by the motion controller

pub mod calibration;
pub mod gamepad;
pub mod sampler;
pub mod snapshot;

pub use calibration::Deadzone;
pub use sampler::{InputSampler, PadSource};
pub use snapshot::{Axes, Axis, Button, Buttons, InputSnapshot, PadReading};
