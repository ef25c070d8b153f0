//! SE(3) rigid transforms.
//!
//! Poses are stored as a unit quaternion plus translation. The planning
//! subsystem receives keyframe poses from the SLAM side as homogeneous 4x4
//! matrices, so conversion from (and back to) that form lives here.

use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3};
use thiserror::Error;

/// Tolerance for the orthonormality check when ingesting a raw matrix.
const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// Errors raised when converting raw pose data into an [`SE3`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// The upper-left 3x3 block of a homogeneous matrix is not a rotation.
    #[error("rotation block is not orthonormal (deviation {deviation:.3e})")]
    NonOrthonormalRotation { deviation: f64 },
}

/// A rigid transform in SE(3): rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl SE3 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Build from a rotation matrix and translation without validation.
    ///
    /// Callers constructing poses from trusted sources (e.g. composed
    /// transforms) use this; untrusted 4x4 input goes through
    /// [`SE3::from_homogeneous`] instead.
    pub fn from_parts(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation: UnitQuaternion::from_rotation_matrix(&rotation),
            translation,
        }
    }

    /// Parse a homogeneous 4x4 matrix, failing fast on a malformed rotation.
    ///
    /// A non-orthonormal rotation block would silently produce garbage Euler
    /// angles downstream, so it is rejected here.
    pub fn from_homogeneous(m: &Matrix4<f64>) -> Result<Self, FrameError> {
        let r: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
        let deviation =
            (r * r.transpose() - Matrix3::identity()).norm() + (r.determinant() - 1.0).abs();
        if deviation > ORTHONORMAL_TOLERANCE {
            return Err(FrameError::NonOrthonormalRotation { deviation });
        }
        Ok(Self {
            rotation: UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(r)),
            translation: m.fixed_view::<3, 1>(0, 3).into_owned(),
        })
    }

    /// Render as a homogeneous 4x4 matrix.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(self.rotation.to_rotation_matrix().matrix());
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// Compose with another transform: `self * other`.
    pub fn compose(&self, other: &SE3) -> SE3 {
        SE3 {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// The inverse transform.
    pub fn inverse(&self) -> SE3 {
        let rot_inv = self.rotation.inverse();
        SE3 {
            rotation: rot_inv,
            translation: -(rot_inv * self.translation),
        }
    }

    /// Apply to a point.
    pub fn transform_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * p + self.translation
    }

    /// Planar heading of the transform's x-axis, `atan2(r10, r00)`.
    ///
    /// This is the yaw reading used for the current tracking pose, which is
    /// already expressed in a planar-friendly frame.
    pub fn yaw(&self) -> f64 {
        let r = self.rotation.to_rotation_matrix();
        r[(1, 0)].atan2(r[(0, 0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_compose_inverse_round_trip() {
        let t = SE3 {
            rotation: UnitQuaternion::from_euler_angles(0.1, -0.4, 1.2),
            translation: Vector3::new(1.0, -2.0, 0.5),
        };
        let round_trip = t.compose(&t.inverse());
        assert_relative_eq!(round_trip.translation.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(round_trip.rotation.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_homogeneous_round_trip() {
        let t = SE3 {
            rotation: UnitQuaternion::from_euler_angles(-0.3, 0.2, 0.9),
            translation: Vector3::new(3.0, 1.0, -1.0),
        };
        let back = SE3::from_homogeneous(&t.to_homogeneous()).unwrap();
        assert_relative_eq!((back.translation - t.translation).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(back.rotation.angle_to(&t.rotation), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_homogeneous_rejects_non_orthonormal() {
        let mut m = Matrix4::identity();
        m[(0, 0)] = 2.0; // scaled axis, not a rotation
        assert!(SE3::from_homogeneous(&m).is_err());
    }

    #[test]
    fn test_yaw_extraction() {
        let t = SE3 {
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
            translation: Vector3::zeros(),
        };
        assert_relative_eq!(t.yaw(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point() {
        let t = SE3 {
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
            translation: Vector3::new(1.0, 0.0, 0.0),
        };
        let p = t.transform_point(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }
}
