//! Visibility scan over a candidate trajectory.
//!
//! Executing a path that starves the tracker of landmarks would degrade
//! localization, so each candidate trajectory is scanned in order for the
//! first waypoint where too few landmarks remain observable. That waypoint
//! becomes the next cycle's start pose; only the prefix before it is safe to
//! commit.

use super::bounds::wrap_angle;
use super::snapshot::MapSnapshot;
use crate::geometry::PlanarPose;

/// Whether a single landmark is observable from a waypoint.
///
/// The heading required to face the landmark must lie inside its angular
/// bound, and the planar distance must fall inside the landmark's
/// observation-distance invariance.
fn is_observable(waypoint: &PlanarPose, snapshot: &MapSnapshot, idx: usize) -> bool {
    let p = &snapshot.points[idx];
    let dx = p.x - waypoint.x;
    let dy = p.y - waypoint.y;

    let dist = (dx * dx + dy * dy).sqrt();
    if dist < snapshot.min_dist[idx] || dist > snapshot.max_dist[idx] {
        return false;
    }

    let facing = dy.atan2(dx);
    snapshot.bounds[idx].contains(wrap_angle(facing))
}

/// Count landmarks observable from a waypoint.
pub fn count_observable(waypoint: &PlanarPose, snapshot: &MapSnapshot) -> usize {
    (0..snapshot.len())
        .filter(|&i| is_observable(waypoint, snapshot, i))
        .count()
}

/// Find the first waypoint whose observable-landmark count drops below
/// `threshold`, scanning in trajectory order.
///
/// Returns `None` when the whole trajectory satisfies the constraint.
pub fn first_violation(
    trajectory: &[PlanarPose],
    snapshot: &MapSnapshot,
    threshold: usize,
) -> Option<usize> {
    trajectory
        .iter()
        .position(|wp| count_observable(wp, snapshot) < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FrameTransformer;
    use crate::geometry::SE3;
    use crate::map::MapStore;
    use nalgebra::Vector3;

    /// One landmark at (1, 0, 0) with heading stats centered on zero, wide
    /// distance invariance.
    fn single_landmark_snapshot() -> MapSnapshot {
        let mut map = MapStore::new();
        let kf = map.create_keyframe(SE3::identity());
        let lm = map.create_landmark(Vector3::new(1.0, 0.0, 0.0), kf);
        let lm_ref = map.get_landmark_mut(lm).unwrap();
        lm_ref.set_heading_stats(0.0, 0.01);
        lm_ref.min_distance = 0.0;
        lm_ref.max_distance = 100.0;
        MapSnapshot::extract(&map, &FrameTransformer::default()).unwrap()
    }

    #[test]
    fn test_no_violation_returns_none() {
        let snapshot = single_landmark_snapshot();
        // All waypoints sit behind the landmark, facing it head-on.
        let traj: Vec<PlanarPose> = (0..5)
            .map(|i| PlanarPose::new(-(i as f64) * 0.1, 0.0, 0.0))
            .collect();
        assert_eq!(first_violation(&traj, &snapshot, 1), None);
    }

    #[test]
    fn test_first_violating_index_is_reported() {
        let snapshot = single_landmark_snapshot();
        // Waypoints 0..=1 face the landmark; from waypoint 2 onward the
        // landmark lies behind (facing angle π, outside [-0.524, 0.524]).
        let traj = vec![
            PlanarPose::new(0.0, 0.0, 0.0),
            PlanarPose::new(0.5, 0.0, 0.0),
            PlanarPose::new(1.5, 0.0, 0.0),
            PlanarPose::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(first_violation(&traj, &snapshot, 1), Some(2));
    }

    #[test]
    fn test_distance_invariance_gates_observability() {
        let mut map = MapStore::new();
        let kf = map.create_keyframe(SE3::identity());
        let lm = map.create_landmark(Vector3::new(1.0, 0.0, 0.0), kf);
        let lm_ref = map.get_landmark_mut(lm).unwrap();
        lm_ref.set_heading_stats(0.0, 0.01);
        lm_ref.min_distance = 0.8;
        lm_ref.max_distance = 2.0;
        let snapshot = MapSnapshot::extract(&map, &FrameTransformer::default()).unwrap();

        // In range and facing the landmark.
        assert_eq!(count_observable(&PlanarPose::new(0.0, 0.0, 0.0), &snapshot), 1);
        // Too close.
        assert_eq!(count_observable(&PlanarPose::new(0.9, 0.0, 0.0), &snapshot), 0);
        // Too far.
        assert_eq!(count_observable(&PlanarPose::new(-3.0, 0.0, 0.0), &snapshot), 0);
    }

    #[test]
    fn test_threshold_above_count_violates_immediately() {
        let snapshot = single_landmark_snapshot();
        let traj = vec![PlanarPose::new(0.0, 0.0, 0.0)];
        assert_eq!(first_violation(&traj, &snapshot, 2), Some(0));
    }

    #[test]
    fn test_empty_trajectory_has_no_violation() {
        let snapshot = single_landmark_snapshot();
        assert_eq!(first_violation(&[], &snapshot, 1), None);
    }
}
