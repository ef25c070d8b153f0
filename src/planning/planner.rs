//! Contract with the external sampling-based path planner.
//!
//! The planner is an opaque collaborator: the worker hands it the snapshot
//! columns and a start/goal pair, and consumes an ordered waypoint sequence
//! plus an "approximate" flag. Nothing here inspects or participates in the
//! backend's search. Alternate backends plug in through [`PathPlanner`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nalgebra::Vector3;
use thiserror::Error;

use crate::geometry::PlanarPose;

use super::bounds::AngularBound;

/// A 2D traversability cell `(x, y)` in planning units.
pub type FloorCell = [f64; 2];

/// Algorithm selector forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerAlgorithm {
    #[default]
    RrtStar,
    Rrt,
    PrmStar,
}

/// Optimization objective forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerObjective {
    #[default]
    PathLength,
    Clearance,
}

/// Everything the backend needs besides the start/goal pair.
#[derive(Debug, Clone, Default)]
pub struct PlannerConstraints {
    /// Landmark positions.
    pub points: Vec<Vector3<f64>>,
    /// Allowed-heading interval per landmark.
    pub bounds: Vec<AngularBound>,
    /// Distance invariances per landmark.
    pub min_dist: Vec<f64>,
    pub max_dist: Vec<f64>,
    /// Found ratio per landmark.
    pub found_ratio: Vec<f64>,
    /// Traversable floor cells.
    pub floor_map: Vec<FloorCell>,
    /// Minimum number of observable landmarks per waypoint.
    pub feature_threshold: usize,
    /// Search algorithm to run.
    pub algorithm: PlannerAlgorithm,
    /// Cost objective to optimize.
    pub objective: PlannerObjective,
}

/// Result of a planning call.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Ordered waypoints from start toward the goal.
    pub waypoints: Vec<PlanarPose>,
    /// True when the goal was not exactly reached but the constraints hold.
    pub approximate: bool,
}

/// Errors surfaced by a planning backend.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("no solution within the time budget")]
    NoSolution,
    #[error("planner backend failed: {0}")]
    Backend(String),
}

/// Cooperative cancellation handle passed into [`PathPlanner::plan`].
///
/// Backends are expected to poll it between iterations so that a shutdown
/// does not have to wait out the full time budget.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Capability implemented by planning backends.
pub trait PathPlanner: Send {
    /// Install the constraint set for subsequent [`PathPlanner::plan`] calls.
    fn configure(&mut self, constraints: PlannerConstraints);

    /// Plan from `start` toward `goal` within `budget`.
    fn plan(
        &mut self,
        start: &PlanarPose,
        goal: &PlanarPose,
        budget: Duration,
        cancel: &CancelToken,
    ) -> Result<PlanOutcome, PlannerError>;
}

/// Trivial backend interpolating a straight segment toward the goal.
///
/// Ignores the constraint set entirely; used by tests and the demo binary
/// where a real sampling-based backend is not available.
#[derive(Debug, Clone)]
pub struct LinePlanner {
    /// Spacing between generated waypoints.
    pub step: f64,
}

impl LinePlanner {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl Default for LinePlanner {
    fn default() -> Self {
        Self { step: 0.25 }
    }
}

impl PathPlanner for LinePlanner {
    fn configure(&mut self, _constraints: PlannerConstraints) {}

    fn plan(
        &mut self,
        start: &PlanarPose,
        goal: &PlanarPose,
        _budget: Duration,
        cancel: &CancelToken,
    ) -> Result<PlanOutcome, PlannerError> {
        if cancel.is_cancelled() {
            return Err(PlannerError::Backend("cancelled".into()));
        }

        let dx = goal.x - start.x;
        let dy = goal.y - start.y;
        let length = (dx * dx + dy * dy).sqrt();
        let heading = dy.atan2(dx);

        let steps = (length / self.step).ceil().max(1.0) as usize;
        let mut waypoints = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            waypoints.push(PlanarPose::new(
                start.x + t * dx,
                start.y + t * dy,
                heading,
            ));
        }
        // The interpolator always reaches the goal position but keeps the
        // segment heading, so the goal yaw is only approximately met.
        let approximate = (goal.yaw - heading).abs() > 1e-9;

        Ok(PlanOutcome {
            waypoints,
            approximate,
        })
    }
}
