//! Point-in-time snapshot of the map for one planning cycle.
//!
//! The worker holds the map lock only while the snapshot is built; the
//! (potentially slow) planner call then runs against this frozen copy, so
//! concurrent map mutation never affects the cycle in flight.

use nalgebra::Vector3;
use tracing::debug;

use crate::geometry::{FrameTransformer, PlanarPose};
use crate::map::MapStore;

use super::bounds::AngularBound;

/// Parallel per-landmark columns plus planar keyframe poses, rebuilt from
/// scratch each cycle and discarded at cycle end.
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    /// Landmark positions (world frame).
    pub points: Vec<Vector3<f64>>,

    /// Allowed-heading interval per landmark.
    pub bounds: Vec<AngularBound>,

    /// Minimum observation-distance invariance per landmark.
    pub min_dist: Vec<f64>,

    /// Maximum observation-distance invariance per landmark.
    pub max_dist: Vec<f64>,

    /// Found ratio per landmark.
    pub found_ratio: Vec<f64>,

    /// Planar world poses of all good keyframes.
    pub keyframe_poses: Vec<PlanarPose>,
}

impl MapSnapshot {
    /// Extract a consistent snapshot from the map.
    ///
    /// Landmarks and keyframes flagged bad are skipped. Returns `None` when
    /// no usable landmark remains; a cycle must short-circuit in that case
    /// rather than hand empty columns to the planner.
    ///
    /// The caller is expected to hold the map lock for exactly the duration
    /// of this call.
    pub fn extract(map: &MapStore, transformer: &FrameTransformer) -> Option<MapSnapshot> {
        let mut points = Vec::new();
        let mut bounds = Vec::new();
        let mut min_dist = Vec::new();
        let mut max_dist = Vec::new();
        let mut found_ratio = Vec::new();

        for lm in map.landmarks() {
            if lm.is_bad {
                continue;
            }
            points.push(lm.position);
            bounds.push(AngularBound::from_stats(lm.theta_mean, lm.theta_std));
            min_dist.push(lm.min_distance);
            max_dist.push(lm.max_distance);
            found_ratio.push(lm.found_ratio());
        }

        if points.is_empty() {
            debug!("snapshot skipped: no usable landmarks");
            return None;
        }

        let keyframe_poses = map
            .keyframes()
            .filter(|kf| !kf.is_bad)
            .map(|kf| transformer.keyframe_planar_pose(&kf.pose))
            .collect();

        Some(MapSnapshot {
            points,
            bounds,
            min_dist,
            max_dist,
            found_ratio,
            keyframe_poses,
        })
    }

    /// Number of landmarks in the snapshot.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SE3;

    fn populated_map() -> MapStore {
        let mut map = MapStore::new();
        let kf = map.create_keyframe(SE3::identity());
        for i in 0..3 {
            let lm = map.create_landmark(Vector3::new(i as f64, 0.0, 1.0), kf);
            let lm_ref = map.get_landmark_mut(lm).unwrap();
            lm_ref.set_heading_stats(0.1 * i as f64, 0.05);
            lm_ref.min_distance = 0.2;
            lm_ref.max_distance = 20.0;
        }
        map
    }

    #[test]
    fn test_extract_builds_parallel_columns() {
        let map = populated_map();
        let snapshot = MapSnapshot::extract(&map, &FrameTransformer::default()).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.bounds.len(), 3);
        assert_eq!(snapshot.min_dist.len(), 3);
        assert_eq!(snapshot.max_dist.len(), 3);
        assert_eq!(snapshot.found_ratio.len(), 3);
        assert_eq!(snapshot.keyframe_poses.len(), 1);
    }

    #[test]
    fn test_extract_skips_bad_landmarks() {
        let mut map = populated_map();
        let bad_id = map.landmarks().next().unwrap().id;
        map.retire_landmark(bad_id);

        let snapshot = MapSnapshot::extract(&map, &FrameTransformer::default()).unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_extract_empty_map_returns_none() {
        let map = MapStore::new();
        assert!(MapSnapshot::extract(&map, &FrameTransformer::default()).is_none());
    }

    #[test]
    fn test_extract_all_bad_returns_none() {
        let mut map = populated_map();
        let ids: Vec<_> = map.landmarks().map(|lm| lm.id).collect();
        for id in ids {
            map.retire_landmark(id);
        }
        assert!(MapSnapshot::extract(&map, &FrameTransformer::default()).is_none());
    }

    #[test]
    fn test_extract_skips_bad_keyframes() {
        let mut map = populated_map();
        let kf = map.create_keyframe(SE3::identity());
        map.retire_keyframe(kf);

        let snapshot = MapSnapshot::extract(&map, &FrameTransformer::default()).unwrap();
        assert_eq!(snapshot.keyframe_poses.len(), 1);
    }
}
