//! Geometry utilities: SE3 transforms and frame conversion.

pub mod frames;
pub mod se3;

pub use frames::{FrameExtrinsics, FrameTransformer, PlanarPose};
pub use se3::{FrameError, SE3};
