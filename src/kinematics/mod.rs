//! # Kinematics Module
//!
//! Closed-form inverse kinematics for the parallel 5-bar linkage.
//!
//! This module handles:
//! - Mapping a planar end-effector target to the two drive angles
//! - Rejecting targets blocked by the enclosure, out of reach, or outside
//!   the per-side operating windows
//! - Answering "is this point reachable" for the motion controller

pub mod solver;
pub mod workspace;

pub use solver::{Linkage, Point, Solution};
pub use workspace::Workspace;
