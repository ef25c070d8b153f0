//! Planning worker - the thread that turns requests into committed
//! trajectory prefixes.
//!
//! One cycle: consume a request, snapshot the map under its lock, assemble
//! constraints, call the external planner (lock-free, possibly slow), scan
//! the candidate path for the first visibility violation, and commit only the
//! safe prefix. The violating waypoint carries over as the next cycle's start
//! so replanning resumes from the last point where localization is still
//! adequate.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::geometry::{FrameTransformer, PlanarPose, SE3};
use crate::system::shared_state::PlanningShared;

use super::planner::{
    CancelToken, PathPlanner, PlannerAlgorithm, PlannerConstraints, PlannerObjective,
};
use super::request::PlanningRequest;
use super::snapshot::MapSnapshot;
use super::visibility::first_violation;

/// How long the worker blocks on the request mailbox before re-checking the
/// finish flag.
const REQUEST_WAIT: Duration = Duration::from_millis(100);

/// Tunables for the planning worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Goal pose in the planning frame.
    pub goal: PlanarPose,
    /// Minimum observable landmarks per waypoint.
    pub feature_threshold: usize,
    /// Time budget handed to the planner per cycle.
    pub time_budget: Duration,
    /// Search algorithm selector.
    pub algorithm: PlannerAlgorithm,
    /// Cost objective selector.
    pub objective: PlannerObjective,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            goal: PlanarPose::new(5.03, -1.69, -1.5707),
            feature_threshold: 40,
            time_budget: Duration::from_secs(5),
            algorithm: PlannerAlgorithm::default(),
            objective: PlannerObjective::default(),
        }
    }
}

/// The planning thread state.
pub struct PlanningWorker {
    planner: Box<dyn PathPlanner>,
    transformer: FrameTransformer,
    config: WorkerConfig,
    /// Start pose for the next cycle; updated to the violating waypoint after
    /// each commit, overridden by the request pose when tracking supplies
    /// one.
    start: PlanarPose,
    cancel: CancelToken,
}

impl PlanningWorker {
    pub fn new(
        planner: Box<dyn PathPlanner>,
        transformer: FrameTransformer,
        config: WorkerConfig,
    ) -> Self {
        Self {
            planner,
            transformer,
            config,
            start: PlanarPose::new(0.0, 0.0, 0.0),
            cancel: CancelToken::new(),
        }
    }

    /// Cancellation handle for an in-flight planner call. Cloning is cheap;
    /// the system keeps one to fire during shutdown.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Main thread loop: wait for requests and run one cycle per request.
    ///
    /// Exits when finish is requested; at most one cycle is ever in flight.
    pub fn run(&mut self, shared: Arc<PlanningShared>) {
        info!("planning worker started");
        loop {
            if shared.is_finish_requested() {
                break;
            }
            // Consuming the request is also the acknowledgment: the slot is
            // immediately free for the tracking thread to overwrite.
            match shared.requests.wait_timeout(REQUEST_WAIT) {
                Some(request) => self.run_cycle(&shared, &request),
                None => continue,
            }
        }
        shared.set_finished();
        info!("planning worker finished");
    }

    /// One planning cycle. All per-cycle state is rebuilt here; nothing
    /// carries over from a failed cycle except the start pose.
    fn run_cycle(&mut self, shared: &Arc<PlanningShared>, request: &PlanningRequest) {
        // Snapshot under the map lock; the lock is released before planning.
        let snapshot = {
            let map = shared.map.lock();
            MapSnapshot::extract(&map, &self.transformer)
        };
        let Some(snapshot) = snapshot else {
            info!("cycle skipped: map has no usable landmarks");
            return;
        };
        debug!(
            landmarks = snapshot.len(),
            keyframes = snapshot.keyframe_poses.len(),
            "map snapshot extracted"
        );

        let constraints = PlannerConstraints {
            points: snapshot.points.clone(),
            bounds: snapshot.bounds.clone(),
            min_dist: snapshot.min_dist.clone(),
            max_dist: snapshot.max_dist.clone(),
            found_ratio: snapshot.found_ratio.clone(),
            floor_map: shared.floor_map.lock().clone(),
            feature_threshold: self.config.feature_threshold,
            algorithm: self.config.algorithm,
            objective: self.config.objective,
        };
        self.planner.configure(constraints);

        // Tracking's pose, when supplied, takes precedence over the carried
        // start from the previous cycle's violation point.
        if let Some(pose) = &request.pose {
            self.start = planar_from_tracking_pose(pose);
        }

        let outcome = match self.planner.plan(
            &self.start,
            &self.config.goal,
            self.config.time_budget,
            &self.cancel,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "planner call failed");
                return;
            }
        };

        if outcome.waypoints.is_empty() {
            info!("planner returned an empty path");
            return;
        }
        if outcome.approximate {
            debug!("goal reached only approximately");
        }

        match first_violation(
            &outcome.waypoints,
            &snapshot,
            self.config.feature_threshold,
        ) {
            Some(idx) => {
                // Commit the safe prefix; replan next cycle from the
                // violating waypoint.
                shared.trajectory.append(&outcome.waypoints[..idx]);
                self.start = outcome.waypoints[idx];
                info!(
                    committed = idx,
                    total = outcome.waypoints.len(),
                    "visibility violation, committed prefix"
                );
            }
            None => {
                shared.trajectory.append(&outcome.waypoints);
                self.start = *outcome.waypoints.last().unwrap();
                info!(
                    committed = outcome.waypoints.len(),
                    "full trajectory satisfies visibility"
                );
            }
        }
    }
}

/// Planar projection of a tracking pose: translation plus the heading of the
/// rotation's x-axis.
fn planar_from_tracking_pose(pose: &SE3) -> PlanarPose {
    PlanarPose::new(pose.translation.x, pose.translation.y, pose.yaw())
}
