//! Reachability checks for candidate end-effector positions.

use super::solver::{Linkage, Point, Solution};

/// Answers whether a point is reachable under every geometric and angular
/// constraint of a [`Linkage`].
///
/// Holds no state beyond the geometry; every query delegates to
/// [`Linkage::solve`], which stays the single source of truth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Workspace {
    linkage: Linkage,
}

impl Workspace {
    #[must_use]
    pub fn new(linkage: Linkage) -> Self {
        Self { linkage }
    }

    #[must_use]
    pub fn linkage(&self) -> &Linkage {
        &self.linkage
    }

    /// Whether the end effector may be moved to `point`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fivebar_teleop::kinematics::{Point, Workspace};
    ///
    /// let workspace = Workspace::default();
    /// assert!(workspace.is_reachable(&Point::new(0.0, -2.0)));
    /// assert!(!workspace.is_reachable(&Point::new(2.0, -2.0)));
    /// ```
    #[must_use]
    pub fn is_reachable(&self, point: &Point) -> bool {
        self.linkage.solve(point).is_some()
    }

    /// Full solution for `point`, if reachable.
    #[must_use]
    pub fn solve(&self, point: &Point) -> Option<Solution> {
        self.linkage.solve(point)
    }
}
