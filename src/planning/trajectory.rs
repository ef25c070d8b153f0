//! Append-only log of committed waypoints.
//!
//! The trajectory-following controller reads this log as point-in-time
//! copies while the worker appends committed prefixes. Both operations run
//! under the same lock, so a reader never observes a partial append and two
//! concurrent appends never interleave their elements.

use parking_lot::Mutex;

use crate::geometry::PlanarPose;

/// Lock-guarded, monotonically growing waypoint log.
#[derive(Default)]
pub struct TrajectoryLog {
    waypoints: Mutex<Vec<PlanarPose>>,
}

impl TrajectoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed prefix atomically.
    pub fn append(&self, prefix: &[PlanarPose]) {
        if prefix.is_empty() {
            return;
        }
        self.waypoints.lock().extend_from_slice(prefix);
    }

    /// Full copy of the committed trajectory.
    pub fn read_all(&self) -> Vec<PlanarPose> {
        self.waypoints.lock().clone()
    }

    /// Number of committed waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.lock().is_empty()
    }
}
