//! Single-slot planning request mailbox.
//!
//! The tracking thread issues planning requests faster than cycles complete;
//! queuing them would only replay stale poses. The mailbox therefore holds at
//! most one request and a later `send` overwrites an unconsumed one
//! (last-write-wins). The worker blocks on a condvar with a timeout instead
//! of busy-polling.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::geometry::SE3;
use crate::map::KeyFrameId;

/// A pending planning request from the tracking thread.
#[derive(Debug, Clone, Copy)]
pub struct PlanningRequest {
    /// Current tracking pose at request time; `None` when tracking had no
    /// pose estimate (the worker then replans from its carried start).
    pub pose: Option<SE3>,
    /// Reference keyframe the pose was tracked against.
    pub keyframe: KeyFrameId,
}

/// Last-write-wins mailbox carrying requests between threads.
#[derive(Default)]
pub struct RequestSlot {
    slot: Mutex<Option<PlanningRequest>>,
    available: Condvar,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit a request, overwriting any unconsumed one, and wake the
    /// worker.
    pub fn send(&self, pose: Option<SE3>, keyframe: KeyFrameId) {
        let mut slot = self.slot.lock();
        *slot = Some(PlanningRequest { pose, keyframe });
        self.available.notify_one();
    }

    /// Whether a request is pending.
    pub fn has_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Read and clear the pending request atomically.
    ///
    /// Consuming is also the acknowledgment: once taken, the slot is free
    /// for the next request.
    pub fn take(&self) -> Option<PlanningRequest> {
        self.slot.lock().take()
    }

    /// Wait up to `timeout` for a request, consuming it if one arrives.
    ///
    /// Returns `None` on timeout so the worker can interleave shutdown
    /// checks.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<PlanningRequest> {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            self.available.wait_for(&mut slot, timeout);
        }
        slot.take()
    }
}
