//! Per-landmark angular observability bounds.
//!
//! A landmark accumulates statistics over the headings it was observed from.
//! The planner turns those into an allowed-heading interval: the wider the
//! spread of past observations, the wider the interval. A fixed floor margin
//! keeps the interval from collapsing for landmarks seen only once or twice.

use serde::{Deserialize, Serialize};

/// Floor half-width of the bound, 30 degrees in radians.
pub const MIN_MARGIN: f64 = 30.0 / 57.3;

/// Sigma multiplier applied to the observation-heading spread.
const STD_MULTIPLIER: f64 = 2.5;

/// Allowed-heading interval `[lower, upper]` for observing a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularBound {
    pub lower: f64,
    pub upper: f64,
}

impl AngularBound {
    /// Derive the bound from observation-heading statistics:
    /// `margin = max(MIN_MARGIN, 2.5 * std)`, bound `= mean ± margin`.
    pub fn from_stats(mean: f64, std: f64) -> Self {
        let margin = MIN_MARGIN.max(STD_MULTIPLIER * std);
        Self {
            lower: mean - margin,
            upper: mean + margin,
        }
    }

    /// Interval width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether a heading lies inside the bound, comparing modulo 2π against
    /// the interval center.
    pub fn contains(&self, heading: f64) -> bool {
        let center = 0.5 * (self.lower + self.upper);
        let offset = wrap_angle(heading - center);
        offset.abs() <= 0.5 * self.width()
    }
}

/// Normalize an angle to (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_floor_margin_for_sparse_landmarks() {
        // A nearly-zero spread must not collapse the interval.
        let bound = AngularBound::from_stats(0.0, 0.01);
        assert_relative_eq!(bound.lower, -MIN_MARGIN, epsilon = 1e-12);
        assert_relative_eq!(bound.upper, MIN_MARGIN, epsilon = 1e-12);
    }

    #[test]
    fn test_wide_spread_widens_bound() {
        let std = 0.5; // 2.5 * 0.5 = 1.25 > MIN_MARGIN
        let bound = AngularBound::from_stats(1.0, std);
        assert_relative_eq!(bound.lower, 1.0 - 1.25, epsilon = 1e-12);
        assert_relative_eq!(bound.upper, 1.0 + 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_bound_invariants() {
        for &(mean, std) in &[(0.0, 0.0), (1.2, 0.3), (-2.0, 1.0), (3.0, 0.001)] {
            let bound = AngularBound::from_stats(mean, std);
            assert!(bound.lower < bound.upper);
            assert!(bound.width() >= 2.0 * MIN_MARGIN - 1e-12);
        }
    }

    #[test]
    fn test_contains_wraps() {
        // Bound centered at π should accept headings just past -π.
        let bound = AngularBound::from_stats(PI, 0.0);
        assert!(bound.contains(PI));
        assert!(bound.contains(-PI + 0.1));
        assert!(!bound.contains(0.0));
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(0.5), 0.5, epsilon = 1e-12);
    }
}
