//! System wiring: shared state and worker thread orchestration.

pub mod planning_system;
pub mod shared_state;

pub use planning_system::PlanningSystem;
pub use shared_state::PlanningShared;
