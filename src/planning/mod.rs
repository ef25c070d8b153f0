//! The active-planning core: per-cycle snapshotting, observability bounds,
//! the external planner contract, visibility scanning, and the worker that
//! sequences them.

pub mod bounds;
pub mod planner;
pub mod request;
pub mod snapshot;
pub mod trajectory;
pub mod visibility;
pub mod worker;

pub use bounds::AngularBound;
pub use planner::{PathPlanner, PlanOutcome, PlannerConstraints, PlannerError};
pub use request::{PlanningRequest, RequestSlot};
pub use snapshot::MapSnapshot;
pub use trajectory::TrajectoryLog;
pub use worker::{PlanningWorker, WorkerConfig};
