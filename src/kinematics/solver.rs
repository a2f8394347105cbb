//! # Inverse Kinematics Solver
//!
//! Two base pivots sit on a horizontal line; each drives a proximal link of
//! length `L1` whose elbow carries a distal link of length `L2`. Both distal
//! links meet at the end effector, so each side is an independent two-link
//! chain sharing one tip.
//!
//! ```text
//!      base1 o-------o base2
//!           /         \        L1
//!   elbow1 o           o elbow2
//!           \         /        L2
//!            \       /
//!             \     /
//!              \   /
//!               \ /
//!                x  end effector
//! ```
//!
//! For each side the base angle follows from the law of cosines:
//!
//! `theta = branch * acos((L1² + d² - L2²) / (2·L1·d)) + atan2(dy, dx)`
//!
//! Side 1 takes the negative branch and side 2 the positive one, which keeps
//! both elbows outboard. The other branch is geometrically valid but the
//! links collide on the physical build.

use nalgebra::{Point2, Vector2};

/// Point in mechanism-plane coordinates.
pub type Point = Point2<f64>;

/// Proximal link length (base pivot to elbow).
pub const L1: f64 = 1.56;

/// Distal link length (elbow to end effector).
pub const L2: f64 = 3.25;

/// Left base pivot.
pub const BASE1: [f64; 2] = [-0.45, 2.0];

/// Right base pivot.
pub const BASE2: [f64; 2] = [0.45, 2.0];

/// Law-of-cosines branch for side 1. Tuned to the physical build; flipping it
/// is a behaviour change that needs hardware re-validation.
pub const SIDE1_BRANCH: f64 = -1.0;

/// Law-of-cosines branch for side 2. Same caveat as [`SIDE1_BRANCH`].
pub const SIDE2_BRANCH: f64 = 1.0;

/// Allowed base angle range for one side, inclusive, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleWindow {
    pub min: f64,
    pub max: f64,
}

impl AngleWindow {
    /// Whether `theta` is a real number inside the window.
    #[must_use]
    pub fn contains(&self, theta: f64) -> bool {
        !theta.is_nan() && theta >= self.min && theta <= self.max
    }
}

/// Side 1 operating window (link collision and cable routing limits).
pub const SIDE1_WINDOW: AngleWindow = AngleWindow { min: -4.2, max: -1.6 };

/// Side 2 operating window. Asymmetric with side 1 because the two sides are
/// mirrored and mechanically different.
pub const SIDE2_WINDOW: AngleWindow = AngleWindow { min: -1.55, max: 1.19 };

/// Region the end effector may occupy before any reach test.
///
/// A box `[x_min, x_max] × [y_min, ∞)` minus the lower-right corner
/// `x > corner_x && y < corner_y`, where the enclosure and hoop sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enclosure {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub corner_x: f64,
    pub corner_y: f64,
}

impl Enclosure {
    /// Whether `p` lies inside the permitted region.
    #[must_use]
    pub fn admits(&self, p: &Point) -> bool {
        let blocked = p.x < self.x_min
            || p.x > self.x_max
            || p.y < self.y_min
            || (p.x > self.corner_x && p.y < self.corner_y);
        !blocked
    }
}

/// Enclosure of the reference build.
pub const ENCLOSURE: Enclosure = Enclosure {
    x_min: -2.5,
    x_max: 2.5,
    y_min: -2.5,
    corner_x: 1.0,
    corner_y: -1.5,
};

/// Fixed geometry and limits of one 5-bar build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linkage {
    pub l1: f64,
    pub l2: f64,
    pub base1: Point,
    pub base2: Point,
    pub window1: AngleWindow,
    pub window2: AngleWindow,
    pub enclosure: Enclosure,
}

impl Default for Linkage {
    fn default() -> Self {
        Self::reference()
    }
}

/// A reachable configuration.
///
/// The elbows are derived values for feasibility checks and display. The
/// angles are what the actuators consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub elbow1: Point,
    pub elbow2: Point,
    pub theta1: f64,
    pub theta2: f64,
}

impl Linkage {
    /// The geometry of the reference build.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            l1: L1,
            l2: L2,
            base1: Point::new(BASE1[0], BASE1[1]),
            base2: Point::new(BASE2[0], BASE2[1]),
            window1: SIDE1_WINDOW,
            window2: SIDE2_WINDOW,
            enclosure: ENCLOSURE,
        }
    }

    /// Longest distance a single side can reach from its base pivot.
    #[must_use]
    pub fn reach(&self) -> f64 {
        self.l1 + self.l2
    }

    /// Solve for the drive angles that place the end effector at `target`.
    ///
    /// Returns `None` when the target is blocked by the enclosure, lies
    /// outside either reach circle, produces degenerate geometry, or needs an
    /// angle outside either operating window.
    ///
    /// # Examples
    ///
    /// ```
    /// use fivebar_teleop::kinematics::{Linkage, Point};
    ///
    /// let linkage = Linkage::reference();
    /// assert!(linkage.solve(&Point::new(0.0, -2.0)).is_some());
    /// assert!(linkage.solve(&Point::new(5.0, 5.0)).is_none());
    /// ```
    #[must_use]
    pub fn solve(&self, target: &Point) -> Option<Solution> {
        if !self.enclosure.admits(target) {
            return None;
        }

        let to_target1 = *target - self.base1;
        let to_target2 = *target - self.base2;

        let reach = self.reach();
        if to_target1.norm() > reach || to_target2.norm() > reach {
            return None;
        }

        let theta1 = self.base_angle(&to_target1, SIDE1_BRANCH);
        let theta2 = self.base_angle(&to_target2, SIDE2_BRANCH);

        if !self.window1.contains(theta1) || !self.window2.contains(theta2) {
            return None;
        }

        Some(Solution {
            elbow1: self.elbow(&self.base1, theta1),
            elbow2: self.elbow(&self.base2, theta2),
            theta1,
            theta2,
        })
    }

    /// Base angle for one side. NaN when the triangle cannot close.
    fn base_angle(&self, to_target: &Vector2<f64>, branch: f64) -> f64 {
        let d = to_target.norm();
        let cos_elbow = (self.l1.powi(2) + d.powi(2) - self.l2.powi(2)) / (2.0 * self.l1 * d);

        // acos returns NaN outside [-1, 1]; the window check rejects it
        branch * cos_elbow.acos() + to_target.y.atan2(to_target.x)
    }

    fn elbow(&self, base: &Point, theta: f64) -> Point {
        *base + Vector2::new(theta.cos(), theta.sin()) * self.l1
    }
}

/// Solve against the reference build.
#[must_use]
pub fn solve(target: &Point) -> Option<Solution> {
    Linkage::reference().solve(target)
}
