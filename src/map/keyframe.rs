//! KeyFrame - a stored camera pose with its observed landmarks.
//!
//! KeyFrames register planning-frame geometry: their SLAM-frame poses are
//! converted to planar world poses during snapshot extraction, and their
//! covisibility links drive the visible-point query.

use std::collections::{HashMap, HashSet};

use crate::geometry::SE3;

use super::types::{KeyFrameId, LandmarkId};

/// A keyframe: pose plus observed landmarks and covisibility links.
#[derive(Debug, Clone)]
pub struct KeyFrame {
    /// Unique identifier.
    pub id: KeyFrameId,

    /// Camera pose in the SLAM world frame (`T_sc`, camera-to-world).
    pub pose: SE3,

    /// Landmarks observed from this keyframe.
    observed: HashSet<LandmarkId>,

    /// Covisibility weights: other keyframes mapped to the number of
    /// landmarks shared with them.
    covisibility: HashMap<KeyFrameId, usize>,

    /// Soft-delete flag.
    pub is_bad: bool,
}

impl KeyFrame {
    pub fn new(id: KeyFrameId, pose: SE3) -> Self {
        Self {
            id,
            pose,
            observed: HashSet::new(),
            covisibility: HashMap::new(),
            is_bad: false,
        }
    }

    /// Camera center in the SLAM world frame.
    pub fn camera_center(&self) -> nalgebra::Vector3<f64> {
        self.pose.translation
    }

    /// Record that this keyframe observes a landmark.
    pub fn add_observation(&mut self, lm_id: LandmarkId) {
        self.observed.insert(lm_id);
    }

    /// Remove an observation. Returns true if it existed.
    pub fn erase_observation(&mut self, lm_id: LandmarkId) -> bool {
        self.observed.remove(&lm_id)
    }

    /// Landmarks observed from this keyframe.
    pub fn observed_landmarks(&self) -> impl Iterator<Item = &LandmarkId> {
        self.observed.iter()
    }

    pub fn num_observations(&self) -> usize {
        self.observed.len()
    }

    /// Set the covisibility weight with another keyframe.
    pub fn add_covisibility(&mut self, kf_id: KeyFrameId, weight: usize) {
        self.covisibility.insert(kf_id, weight);
    }

    /// Remove a covisibility link.
    pub fn erase_covisibility(&mut self, kf_id: KeyFrameId) {
        self.covisibility.remove(&kf_id);
    }

    /// Covisibility weight with another keyframe (0 if unconnected).
    pub fn covisibility_weight(&self, kf_id: KeyFrameId) -> usize {
        self.covisibility.get(&kf_id).copied().unwrap_or(0)
    }

    /// KeyFrames sharing at least one landmark with this one.
    pub fn covisible_ids(&self) -> impl Iterator<Item = &KeyFrameId> {
        self.covisibility.keys()
    }

    /// Mark this keyframe as bad.
    pub fn set_bad(&mut self) {
        self.is_bad = true;
    }
}
