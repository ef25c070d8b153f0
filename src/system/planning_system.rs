//! Planning system - thread orchestration around the worker.
//!
//! `PlanningSystem` owns the shared state and spawns the worker thread. The
//! tracking side and the trajectory-following controller interact through
//! the shared handle; shutdown runs the cooperative finish handshake and
//! fires the planner cancel token so an in-flight call can bail out.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::geometry::FrameTransformer;
use crate::planning::planner::{CancelToken, PathPlanner};
use crate::planning::worker::{PlanningWorker, WorkerConfig};

use super::shared_state::PlanningShared;

/// Top-level handle owning the planning worker thread.
pub struct PlanningSystem {
    shared: Arc<PlanningShared>,
    cancel: CancelToken,
    worker_handle: Option<JoinHandle<()>>,
}

impl PlanningSystem {
    /// Spawn the worker thread with the given planner backend.
    pub fn new(
        planner: Box<dyn PathPlanner>,
        transformer: FrameTransformer,
        config: WorkerConfig,
    ) -> Self {
        let shared = PlanningShared::new();
        let mut worker = PlanningWorker::new(planner, transformer, config);
        let cancel = worker.cancel_token();

        let worker_handle = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || worker.run(shared))
        };

        Self {
            shared,
            cancel,
            worker_handle: Some(worker_handle),
        }
    }

    /// Shared state handle for producers and consumers.
    pub fn shared(&self) -> &Arc<PlanningShared> {
        &self.shared
    }

    /// Shut down gracefully: request finish, cancel any in-flight planner
    /// call, and join the worker.
    pub fn shutdown(&mut self) {
        self.shared.request_finish();
        self.cancel.cancel();
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
            info!("planning system shut down");
        }
    }
}

impl Drop for PlanningSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}
