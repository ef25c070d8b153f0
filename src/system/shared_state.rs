//! Shared state between the tracking thread and the planning worker.
//!
//! `PlanningShared` holds everything both sides touch, each piece behind its
//! own guard: the map store behind one exclusive lock (held only for snapshot
//! extraction and visibility queries, never across a planner call), the
//! request mailbox and trajectory log behind their own locks, the auxiliary
//! keyframe FIFO behind a channel, and the shutdown handshake as atomics.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

use crate::geometry::{PlanarPose, SE3};
use crate::map::{KeyFrameId, LandmarkId, MapStore};
use crate::planning::planner::FloorCell;
use crate::planning::request::RequestSlot;
use crate::planning::trajectory::TrajectoryLog;

/// Shared state accessible by the tracking thread, the planning worker, and
/// the trajectory-following controller.
pub struct PlanningShared {
    /// The map of landmarks and keyframes. Exclusive lock, held only for
    /// short read sections on the planning side.
    pub map: Mutex<MapStore>,

    /// Single-slot planning request mailbox.
    pub requests: RequestSlot,

    /// Committed waypoint log.
    pub trajectory: TrajectoryLog,

    /// Floor traversability map forwarded to the planner each cycle.
    pub floor_map: Mutex<Vec<FloorCell>>,

    /// FIFO of keyframes pending processing elsewhere.
    kf_sender: Sender<KeyFrameId>,
    kf_receiver: Receiver<KeyFrameId>,

    /// Worker should exit after the current cycle.
    finish_requested: AtomicBool,

    /// Worker has exited its loop.
    finished: AtomicBool,
}

impl PlanningShared {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Producer API (tracking thread)
    // ─────────────────────────────────────────────────────────────────────

    /// Issue a planning request, overwriting any pending unconsumed one.
    /// `pose` is `None` when tracking has no current pose estimate.
    pub fn send_planning_request(&self, pose: Option<SE3>, keyframe: KeyFrameId) {
        self.requests.send(pose, keyframe);
    }

    /// Enqueue a keyframe for auxiliary processing. The sentinel id (0) is
    /// rejected.
    pub fn insert_keyframe(&self, kf_id: KeyFrameId) {
        if !kf_id.is_valid() {
            debug!("ignoring sentinel keyframe id");
            return;
        }
        // The receiver half lives alongside the sender, so send cannot fail.
        let _ = self.kf_sender.send(kf_id);
    }

    /// Number of keyframes waiting in the FIFO.
    pub fn num_new_keyframes(&self) -> usize {
        self.kf_receiver.len()
    }

    /// Pop up to `n` keyframes, returning the last one popped.
    pub fn pop_keyframe_queue(&self, n: usize) -> Option<KeyFrameId> {
        let mut last = None;
        for _ in 0..n {
            match self.kf_receiver.try_recv() {
                Ok(id) => last = Some(id),
                Err(_) => break,
            }
        }
        last
    }

    /// Replace the floor traversability map.
    pub fn set_floor_map(&self, cells: Vec<FloorCell>) {
        *self.floor_map.lock() = cells;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Consumer API (controller)
    // ─────────────────────────────────────────────────────────────────────

    /// Point-in-time copy of the committed trajectory.
    pub fn planning_trajectory(&self) -> Vec<PlanarPose> {
        self.trajectory.read_all()
    }

    /// Landmarks possibly visible from a pose: the union of the landmark
    /// sets of the nearest keyframe (by squared translational distance) and
    /// its covisible neighbors.
    ///
    /// Takes the map lock for its duration. Returns an empty set when the
    /// map holds no keyframes.
    pub fn visible_points(&self, pose: &SE3) -> HashSet<LandmarkId> {
        let map = self.map.lock();

        let nearest = map.keyframes().filter(|kf| !kf.is_bad).min_by(|a, b| {
            let da = (a.camera_center() - pose.translation).norm_squared();
            let db = (b.camera_center() - pose.translation).norm_squared();
            da.total_cmp(&db)
        });
        let Some(nearest) = nearest else {
            return HashSet::new();
        };

        let mut visible: HashSet<LandmarkId> = nearest.observed_landmarks().copied().collect();
        for &neighbor_id in nearest.covisible_ids() {
            if let Some(neighbor) = map.get_keyframe(neighbor_id) {
                visible.extend(neighbor.observed_landmarks().copied());
            }
        }
        visible
    }

    // ─────────────────────────────────────────────────────────────────────
    // Shutdown handshake
    // ─────────────────────────────────────────────────────────────────────

    /// Ask the worker to exit after the current cycle.
    pub fn request_finish(&self) {
        self.finish_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_finish_requested(&self) -> bool {
        self.finish_requested.load(Ordering::SeqCst)
    }

    /// Set by the worker as it leaves its loop.
    pub fn set_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Default for PlanningShared {
    fn default() -> Self {
        let (kf_sender, kf_receiver) = unbounded();
        Self {
            map: Mutex::new(MapStore::new()),
            requests: RequestSlot::new(),
            trajectory: TrajectoryLog::new(),
            floor_map: Mutex::new(Vec::new()),
            kf_sender,
            kf_receiver,
            finish_requested: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }
}
