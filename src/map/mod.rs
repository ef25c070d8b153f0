//! Map entities read by the planning subsystem: landmarks, keyframes, and
//! the store that owns them.

pub mod keyframe;
pub mod landmark;
pub mod map;
pub mod types;

pub use keyframe::KeyFrame;
pub use landmark::Landmark;
pub use map::MapStore;
pub use types::{KeyFrameId, LandmarkId};
