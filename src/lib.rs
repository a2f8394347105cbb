//! # Five-Bar Teleop Library
//!
//! Drive a two-motor parallel 5-bar linkage, a linear rail and a gripper from
//! a game-pad.
//!
//! This library provides the control core: inverse kinematics and workspace
//! checks for the linkage, game-pad input conditioning, and an actuator
//! boundary that runs the same control logic on real servo buses or in
//! simulation.

pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod kinematics;
pub mod motion;
pub mod serial;
