//! # Motion Controller
//!
//! Runs one control tick: game-pad input in, actuator commands out.
//!
//! ## Per tick
//!
//! 1. A `back` press ends the session before anything else happens
//! 2. The right stick (and any held d-pad direction) proposes a new
//!    end-effector position; it is committed only if reachable, and a
//!    committed move is transmitted as a pose
//! 3. The left stick nudges the rail, every tick
//! 4. The analog trigger sets the gripper, only when the ratio moved by more
//!    than the anti-chatter threshold since the last transmitted value
//!
//! A fault on one actuator family is logged and does not stop the others.

use std::f64::consts::PI;
use tracing::{debug, info, warn};

use crate::actuator::{Actuators, Family};
use crate::config::Config;
use crate::controller::{Axis, Button, Deadzone, InputSampler, InputSnapshot};
use crate::error::FiveBarError;
use crate::kinematics::{Point, Solution, Workspace};

/// Known-valid pose the session starts from
pub const HOME: [f64; 2] = [0.0, -2.0];

/// Servo turns per link turn
pub const GEAR_RATIO: f64 = 2.0;

/// D-pad directions as unit steps in mechanism coordinates
const DPAD_DIRECTIONS: [(Button, f64, f64); 4] = [
    (Button::Up, 0.0, 1.0),
    (Button::Down, 0.0, -1.0),
    (Button::Left, -1.0, 0.0),
    (Button::Right, 1.0, 0.0),
];

/// Tunables of the control loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub deadzone: Deadzone,
    /// End-effector displacement per tick at full deflection
    pub effector_step: f64,
    /// Minimum gripper ratio change worth transmitting
    pub gripper_threshold: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            deadzone: Deadzone::default(),
            effector_step: 0.05,
            gripper_threshold: 0.010,
        }
    }
}

impl From<&Config> for MotionSettings {
    fn from(config: &Config) -> Self {
        Self {
            deadzone: Deadzone::new(config.controller.deadzone),
            effector_step: config.motion.effector_step,
            gripper_threshold: config.motion.gripper_threshold,
        }
    }
}

/// Servo angles for a solved pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointCommand {
    /// Right servo, driven by the side 2 link
    pub right: f64,
    /// Left servo, driven by the side 1 link
    pub left: f64,
}

/// Map solved link angles to servo angles.
///
/// The two servos are mirrored: the right one turns against side 2, the left
/// one against side 1 with its zero half a turn away. Both are geared.
#[must_use]
pub fn joint_command(solution: &Solution) -> JointCommand {
    JointCommand {
        right: GEAR_RATIO * -solution.theta2,
        left: GEAR_RATIO * (-solution.theta1 + PI),
    }
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// `back` was pressed; release the actuators and stop ticking
    SessionEnd,
}

/// Owns the end-effector position and the last transmitted gripper ratio.
///
/// The rail target lives in the rail backend.
///
/// # Examples
///
/// ```
/// use fivebar_teleop::actuator::{Actuators, NudgeAccumulator};
/// use fivebar_teleop::controller::InputSampler;
/// use fivebar_teleop::kinematics::Workspace;
/// use fivebar_teleop::motion::{MotionController, MotionSettings, TickOutcome};
///
/// let actuators = Actuators::simulated(NudgeAccumulator::new(0, 36_000, 100));
/// let mut controller =
///     MotionController::new(Workspace::default(), MotionSettings::default(), actuators);
/// let mut sampler = InputSampler::detached();
///
/// assert_eq!(controller.tick(&mut sampler), TickOutcome::Continue);
/// assert!(controller.shutdown().is_empty());
/// ```
pub struct MotionController {
    workspace: Workspace,
    settings: MotionSettings,
    effector: Point,
    last_ratio: Option<f64>,
    actuators: Actuators,
}

impl std::fmt::Debug for MotionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionController")
            .field("settings", &self.settings)
            .field("effector", &self.effector)
            .field("last_ratio", &self.last_ratio)
            .finish_non_exhaustive()
    }
}

impl MotionController {
    /// Controller with the end effector at [`HOME`]
    #[must_use]
    pub fn new(workspace: Workspace, settings: MotionSettings, actuators: Actuators) -> Self {
        Self {
            workspace,
            settings,
            effector: Point::new(HOME[0], HOME[1]),
            last_ratio: None,
            actuators,
        }
    }

    /// Current committed end-effector position
    #[must_use]
    pub fn effector(&self) -> Point {
        self.effector
    }

    /// Last gripper ratio that reached the backend
    #[must_use]
    pub fn last_transmitted_ratio(&self) -> Option<f64> {
        self.last_ratio
    }

    /// Rail position as a fraction of its range
    #[must_use]
    pub fn rail_position(&self) -> f64 {
        self.actuators.rail.normalized_position()
    }

    /// Transmit the pose for the current position.
    ///
    /// Returns `false` if the position does not solve or the arm rejected
    /// the command.
    pub fn sync_pose(&mut self) -> bool {
        match self.workspace.solve(&self.effector) {
            Some(solution) => self.transmit_pose(&solution),
            None => {
                warn!(
                    "Current position ({:.3}, {:.3}) is not reachable, pose not sent",
                    self.effector.x, self.effector.y
                );
                false
            }
        }
    }

    /// Sample `sampler` and run one tick
    pub fn tick(&mut self, sampler: &mut InputSampler) -> TickOutcome {
        let input = sampler.poll();
        self.apply(&input)
    }

    /// Run one tick on an already-sampled snapshot
    pub fn apply(&mut self, input: &InputSnapshot) -> TickOutcome {
        if input.fired(Button::Back) {
            info!("Back pressed, ending session");
            return TickOutcome::SessionEnd;
        }

        self.steer(input);
        self.manual_override(input);
        self.drive_rail(input);
        self.drive_gripper(input);

        TickOutcome::Continue
    }

    /// Release every actuator family. Returns the families that failed.
    pub fn shutdown(&mut self) -> Vec<(Family, FiveBarError)> {
        self.actuators.release_all()
    }

    /// Commit `candidate` if reachable and transmit its pose.
    ///
    /// An unreachable candidate leaves the position untouched.
    pub fn try_move(&mut self, candidate: Point) -> bool {
        let Some(solution) = self.workspace.solve(&candidate) else {
            debug!("Rejected ({:.3}, {:.3})", candidate.x, candidate.y);
            return false;
        };

        self.effector = candidate;
        self.transmit_pose(&solution);
        true
    }

    fn steer(&mut self, input: &InputSnapshot) {
        let dx = input.axis(Axis::RightX);
        let dy = input.axis(Axis::RightY);
        let deadzone = self.settings.deadzone;

        if deadzone.exceeded(dx) || deadzone.exceeded(dy) {
            let step = self.settings.effector_step;
            // Stick-up reads negative
            let candidate = Point::new(self.effector.x + step * dx, self.effector.y - step * dy);
            self.try_move(candidate);
        }
    }

    fn manual_override(&mut self, input: &InputSnapshot) {
        let step = self.settings.effector_step;

        for (button, ux, uy) in DPAD_DIRECTIONS {
            if input.held(button) {
                let candidate = Point::new(self.effector.x + step * ux, self.effector.y + step * uy);
                self.try_move(candidate);
            }
        }
    }

    fn drive_rail(&mut self, input: &InputSnapshot) {
        let axis = self.settings.deadzone.apply(-input.axis(Axis::LeftY));

        if let Err(e) = self.actuators.rail.nudge(axis) {
            warn!("{} nudge failed: {}", Family::Rail, e);
        }
    }

    fn drive_gripper(&mut self, input: &InputSnapshot) {
        let ratio = self.settings.deadzone.trigger_ratio(input.axis(Axis::TriggerAnalog));

        let changed = match self.last_ratio {
            Some(last) => (ratio - last).abs() > self.settings.gripper_threshold,
            None => true,
        };
        if !changed {
            return;
        }

        match self.actuators.gripper.set_ratio(ratio) {
            Ok(()) => self.last_ratio = Some(ratio),
            Err(e) => warn!("{} set_ratio failed: {}", Family::Gripper, e),
        }
    }

    fn transmit_pose(&mut self, solution: &Solution) -> bool {
        let command = joint_command(solution);

        match self.actuators.arm.drive_pose(command.right, command.left) {
            Ok(()) => true,
            Err(e) => {
                warn!("{} drive_pose failed: {}", Family::Arm, e);
                false
            }
        }
    }
}
