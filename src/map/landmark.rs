//! Landmark - a 3D map point carrying observability statistics.
//!
//! Landmarks are produced by the mapping pipeline; the planner only reads
//! them. Besides the world position, each landmark records the statistics of
//! the headings it was observed from (`theta_mean`/`theta_std`), the distance
//! range over which its descriptor is scale-invariant, and tracking quality
//! counters used for the found ratio.

use nalgebra::Vector3;

use super::types::{KeyFrameId, LandmarkId};

/// A 3D landmark with per-landmark observability statistics.
#[derive(Debug, Clone)]
pub struct Landmark {
    /// Unique identifier.
    pub id: LandmarkId,

    /// 3D position in the SLAM world frame.
    pub position: Vector3<f64>,

    /// Mean heading (rad) from which this landmark was observed.
    pub theta_mean: f64,

    /// Standard deviation of the observation headings.
    pub theta_std: f64,

    /// Minimum distance at which the landmark is reliably observable.
    pub min_distance: f64,

    /// Maximum distance at which the landmark is reliably observable.
    pub max_distance: f64,

    /// Times the landmark fell inside a frame's frustum.
    pub visible_count: u32,

    /// Times the landmark was actually matched.
    pub found_count: u32,

    /// KeyFrame that first triangulated this landmark.
    pub first_kf_id: KeyFrameId,

    /// Soft-delete flag; bad landmarks are skipped by every reader.
    pub is_bad: bool,
}

impl Landmark {
    pub fn new(id: LandmarkId, position: Vector3<f64>, first_kf_id: KeyFrameId) -> Self {
        Self {
            id,
            position,
            theta_mean: 0.0,
            theta_std: 0.0,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            visible_count: 0,
            found_count: 0,
            first_kf_id,
            is_bad: false,
        }
    }

    /// Found ratio: matched observations over frustum appearances.
    ///
    /// Returns 1.0 for a landmark that was never in view, so fresh landmarks
    /// are not penalized.
    pub fn found_ratio(&self) -> f64 {
        if self.visible_count == 0 {
            1.0
        } else {
            self.found_count as f64 / self.visible_count as f64
        }
    }

    /// Update the heading statistics from a set of observation headings.
    pub fn set_heading_stats(&mut self, mean: f64, std: f64) {
        self.theta_mean = mean;
        self.theta_std = std;
    }

    /// Check if a viewing distance is within the invariance range.
    pub fn is_in_distance_range(&self, distance: f64) -> bool {
        distance >= self.min_distance && distance <= self.max_distance
    }

    /// Mark this landmark as bad.
    pub fn set_bad(&mut self) {
        self.is_bad = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_landmark() -> Landmark {
        Landmark::new(
            LandmarkId::new(1),
            Vector3::new(1.0, 2.0, 3.0),
            KeyFrameId::new(1),
        )
    }

    #[test]
    fn test_found_ratio() {
        let mut lm = create_test_landmark();

        // Never in view yet - should not be penalized.
        assert_eq!(lm.found_ratio(), 1.0);

        lm.visible_count = 4;
        lm.found_count = 3;
        assert!((lm.found_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_distance_range() {
        let mut lm = create_test_landmark();
        lm.min_distance = 0.5;
        lm.max_distance = 10.0;

        assert!(lm.is_in_distance_range(1.0));
        assert!(!lm.is_in_distance_range(0.3));
        assert!(!lm.is_in_distance_range(15.0));
    }
}
