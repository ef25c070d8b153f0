//! MapStore - container for KeyFrames and Landmarks.
//!
//! The store is owned by the tracking/mapping side and mutated concurrently
//! with planning; the planner only reads it while holding the shared map
//! lock. Keyframe ids start at 1 so that 0 stays available as the queue
//! sentinel.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::geometry::SE3;

use super::keyframe::KeyFrame;
use super::landmark::Landmark;
use super::types::{KeyFrameId, LandmarkId};

/// The map: landmarks plus keyframes with covisibility.
pub struct MapStore {
    landmarks: HashMap<LandmarkId, Landmark>,
    keyframes: HashMap<KeyFrameId, KeyFrame>,
    next_kf_id: u64,
    next_lm_id: u64,
}

impl MapStore {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self {
            landmarks: HashMap::new(),
            keyframes: HashMap::new(),
            next_kf_id: 1,
            next_lm_id: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // KeyFrame operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create and add a new KeyFrame, returning its id.
    pub fn create_keyframe(&mut self, pose: SE3) -> KeyFrameId {
        let id = KeyFrameId::new(self.next_kf_id);
        self.next_kf_id += 1;
        self.keyframes.insert(id, KeyFrame::new(id, pose));
        id
    }

    pub fn get_keyframe(&self, id: KeyFrameId) -> Option<&KeyFrame> {
        self.keyframes.get(&id)
    }

    pub fn get_keyframe_mut(&mut self, id: KeyFrameId) -> Option<&mut KeyFrame> {
        self.keyframes.get_mut(&id)
    }

    pub fn keyframes(&self) -> impl Iterator<Item = &KeyFrame> {
        self.keyframes.values()
    }

    pub fn num_keyframes(&self) -> usize {
        self.keyframes.len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Landmark operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create and add a new Landmark, returning its id.
    pub fn create_landmark(
        &mut self,
        position: Vector3<f64>,
        first_kf_id: KeyFrameId,
    ) -> LandmarkId {
        let id = LandmarkId::new(self.next_lm_id);
        self.next_lm_id += 1;
        self.landmarks.insert(id, Landmark::new(id, position, first_kf_id));
        id
    }

    pub fn get_landmark(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    pub fn get_landmark_mut(&mut self, id: LandmarkId) -> Option<&mut Landmark> {
        self.landmarks.get_mut(&id)
    }

    pub fn landmarks(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.values()
    }

    pub fn num_landmarks(&self) -> usize {
        self.landmarks.len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Association
    // ─────────────────────────────────────────────────────────────────────

    /// Record that a keyframe observes a landmark, updating covisibility
    /// weights with every other observer in both directions.
    ///
    /// Returns false if either entity is unknown.
    pub fn associate(&mut self, kf_id: KeyFrameId, lm_id: LandmarkId) -> bool {
        if !self.landmarks.contains_key(&lm_id) || !self.keyframes.contains_key(&kf_id) {
            return false;
        }

        // Other keyframes already observing this landmark.
        let other_observers: Vec<KeyFrameId> = self
            .keyframes
            .values()
            .filter(|kf| kf.id != kf_id && kf.observed_landmarks().any(|&id| id == lm_id))
            .map(|kf| kf.id)
            .collect();

        if let Some(kf) = self.keyframes.get_mut(&kf_id) {
            kf.add_observation(lm_id);
        }

        for other_id in other_observers {
            let new_weight = self
                .keyframes
                .get(&other_id)
                .map(|kf| kf.covisibility_weight(kf_id))
                .unwrap_or(0)
                + 1;
            if let Some(kf) = self.keyframes.get_mut(&kf_id) {
                kf.add_covisibility(other_id, new_weight);
            }
            if let Some(other) = self.keyframes.get_mut(&other_id) {
                other.add_covisibility(kf_id, new_weight);
            }
        }

        true
    }

    /// Mark a landmark as bad (soft delete).
    pub fn retire_landmark(&mut self, id: LandmarkId) {
        if let Some(lm) = self.landmarks.get_mut(&id) {
            lm.set_bad();
        }
    }

    /// Mark a keyframe as bad (soft delete).
    pub fn retire_keyframe(&mut self, id: KeyFrameId) {
        if let Some(kf) = self.keyframes.get_mut(&id) {
            kf.set_bad();
        }
    }
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapStore")
            .field("num_keyframes", &self.keyframes.len())
            .field("num_landmarks", &self.landmarks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframe_ids_skip_sentinel() {
        let mut map = MapStore::new();
        let id = map.create_keyframe(SE3::identity());
        assert!(id.is_valid());
        assert_eq!(id, KeyFrameId::new(1));
    }

    #[test]
    fn test_associate_updates_covisibility() {
        let mut map = MapStore::new();
        let kf1 = map.create_keyframe(SE3::identity());
        let kf2 = map.create_keyframe(SE3::identity());
        let lm = map.create_landmark(Vector3::new(1.0, 0.0, 0.0), kf1);

        assert!(map.associate(kf1, lm));
        assert!(map.associate(kf2, lm));

        assert_eq!(map.get_keyframe(kf1).unwrap().covisibility_weight(kf2), 1);
        assert_eq!(map.get_keyframe(kf2).unwrap().covisibility_weight(kf1), 1);
    }

    #[test]
    fn test_associate_unknown_entities() {
        let mut map = MapStore::new();
        let kf = map.create_keyframe(SE3::identity());
        assert!(!map.associate(kf, LandmarkId::new(42)));
        assert!(!map.associate(KeyFrameId::new(99), LandmarkId::new(42)));
    }

    #[test]
    fn test_retire_landmark() {
        let mut map = MapStore::new();
        let kf = map.create_keyframe(SE3::identity());
        let lm = map.create_landmark(Vector3::zeros(), kf);

        map.retire_landmark(lm);
        assert!(map.get_landmark(lm).unwrap().is_bad);
    }
}
