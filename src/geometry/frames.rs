//! Coordinate frame conversion between the SLAM map frame and the planning
//! world frame.
//!
//! Three frames are involved:
//!
//! 1. **World frame** - planar frame the planner reasons in (X-forward, Z-up).
//! 2. **SLAM frame** - frame the map stores keyframe poses in (camera
//!    convention, Z along the optical axis).
//! 3. **Body/camera frames** - the camera is rigidly mounted on the robot
//!    body with a fixed offset.
//!
//! Keyframe poses arrive as `T_sc` (camera-to-SLAM-world). The planner needs
//! the body pose in the world frame, projected to the plane:
//!
//! ```text
//! T_wb = T_sw^-1 * T_sc * T_bc^-1
//! ```
//!
//! with `T_sw` the world-to-SLAM transform and `T_bc` the camera-to-body
//! mounting transform. Yaw is read from the ZYX Euler decomposition of the
//! resulting rotation (the angle about Z), which assumes the standard
//! forward-mounted sensor convention.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use super::se3::SE3;

/// A planar pose in the world frame. Also the waypoint type for planned
/// trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPose {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl PlanarPose {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Squared planar distance to another pose.
    pub fn distance_sq(&self, other: &PlanarPose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Fixed mounting transforms supplied at construction time.
#[derive(Debug, Clone, Copy)]
pub struct FrameExtrinsics {
    /// World-to-SLAM transform (`T_sw`).
    pub t_slam_world: SE3,
    /// Camera-to-body transform (`T_bc`).
    pub t_body_cam: SE3,
}

impl Default for FrameExtrinsics {
    /// Mounting of the reference robot: camera looking forward, offset from
    /// the body origin by the calibrated lever arm.
    fn default() -> Self {
        #[rustfmt::skip]
        let r_sw = Rotation3::from_matrix_unchecked(nalgebra::Matrix3::new(
            0.0, -1.0,  0.0,
            0.0,  0.0, -1.0,
            1.0,  0.0,  0.0,
        ));
        #[rustfmt::skip]
        let r_bc = Rotation3::from_matrix_unchecked(nalgebra::Matrix3::new(
             0.0,  0.0, 1.0,
            -1.0,  0.0, 0.0,
             0.0, -1.0, 0.0,
        ));
        Self {
            t_slam_world: SE3::from_parts(r_sw, Vector3::new(-0.10, 0.0, -0.25)),
            t_body_cam: SE3::from_parts(r_bc, Vector3::new(0.25, -0.10, 0.0)),
        }
    }
}

/// Stateless converter from SLAM-frame keyframe poses to planar world poses.
#[derive(Debug, Clone)]
pub struct FrameTransformer {
    t_world_slam: SE3,
    t_cam_body: SE3,
}

impl FrameTransformer {
    /// Create a transformer from the mounting extrinsics. The inverses are
    /// precomputed since every keyframe conversion uses them.
    pub fn new(extrinsics: FrameExtrinsics) -> Self {
        Self {
            t_world_slam: extrinsics.t_slam_world.inverse(),
            t_cam_body: extrinsics.t_body_cam.inverse(),
        }
    }

    /// Convert a keyframe's camera pose `T_sc` into the body pose in the
    /// world frame, `T_wb = T_sw^-1 * T_sc * T_bc^-1`.
    pub fn keyframe_body_pose(&self, t_sc: &SE3) -> SE3 {
        self.t_world_slam.compose(t_sc).compose(&self.t_cam_body)
    }

    /// Planar projection of a keyframe pose: position on the ground plane
    /// plus yaw from the ZYX Euler decomposition.
    pub fn keyframe_planar_pose(&self, t_sc: &SE3) -> PlanarPose {
        let t_wb = self.keyframe_body_pose(t_sc);
        let (_, _, yaw) = t_wb.rotation.euler_angles();
        PlanarPose::new(t_wb.translation.x, t_wb.translation.y, yaw)
    }
}

impl Default for FrameTransformer {
    fn default() -> Self {
        Self::new(FrameExtrinsics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    #[test]
    fn test_identity_keyframe_cancels_extrinsics() {
        // For the reference mounting, T_sw^-1 * T_bc^-1 is the identity, so
        // an identity keyframe pose lands at the world origin facing forward.
        let transformer = FrameTransformer::default();
        let pose = transformer.keyframe_planar_pose(&SE3::identity());
        assert_relative_eq!(pose.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose.yaw, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_body_pose_round_trips_through_extrinsics() {
        let extrinsics = FrameExtrinsics::default();
        let transformer = FrameTransformer::new(extrinsics);

        // Forward-map an arbitrary body pose into a keyframe pose, then
        // recover it.
        let t_wb = SE3 {
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, 0.7),
            translation: Vector3::new(1.5, -0.5, 0.0),
        };
        let t_sc = extrinsics
            .t_slam_world
            .compose(&t_wb)
            .compose(&extrinsics.t_body_cam);

        let recovered = transformer.keyframe_body_pose(&t_sc);
        assert_relative_eq!(
            (recovered.translation - t_wb.translation).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(recovered.rotation.angle_to(&t_wb.rotation), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_planar_yaw_matches_body_heading() {
        let extrinsics = FrameExtrinsics::default();
        let transformer = FrameTransformer::new(extrinsics);

        let t_wb = SE3 {
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, -1.1),
            translation: Vector3::new(0.3, 2.0, 0.0),
        };
        let t_sc = extrinsics
            .t_slam_world
            .compose(&t_wb)
            .compose(&extrinsics.t_body_cam);

        let planar = transformer.keyframe_planar_pose(&t_sc);
        assert_relative_eq!(planar.x, 0.3, epsilon = 1e-9);
        assert_relative_eq!(planar.y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(planar.yaw, -1.1, epsilon = 1e-9);
    }
}
