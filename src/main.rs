use std::time::Duration;

use anyhow::Result;
use nalgebra::Vector3;
use tracing::info;

use vslam_planning::geometry::{FrameTransformer, PlanarPose, SE3};
use vslam_planning::map::KeyFrameId;
use vslam_planning::planning::planner::LinePlanner;
use vslam_planning::planning::worker::WorkerConfig;
use vslam_planning::system::PlanningSystem;

/// Demo: a corridor of landmarks, a trivial planner backend, and one
/// tracking thread issuing requests while the worker commits prefixes.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = WorkerConfig {
        goal: PlanarPose::new(5.0, 0.0, 0.0),
        feature_threshold: 3,
        time_budget: Duration::from_secs(1),
        ..WorkerConfig::default()
    };
    let mut system = PlanningSystem::new(
        Box::new(LinePlanner::new(0.25)),
        FrameTransformer::default(),
        config,
    );

    // Populate the map: landmarks spread along the corridor, observed from
    // the origin keyframe.
    {
        let shared = system.shared();
        let mut map = shared.map.lock();
        let kf = map.create_keyframe(SE3::identity());
        for i in 0..20 {
            let x = 2.0 + 0.4 * i as f64;
            let y = if i % 2 == 0 { 1.0 } else { -1.0 };
            let lm = map.create_landmark(Vector3::new(x, y, 1.0), kf);
            let lm_ref = map.get_landmark_mut(lm).unwrap();
            lm_ref.set_heading_stats(0.0, 0.3);
            lm_ref.min_distance = 0.1;
            lm_ref.max_distance = 30.0;
            map.associate(kf, lm);
        }
        info!(landmarks = map.num_landmarks(), "map populated");
    }

    // Floor map: a coarse traversable strip along the corridor.
    let floor: Vec<[f64; 2]> = (0..60)
        .flat_map(|i| {
            let x = 0.1 * i as f64;
            [[x, -0.5], [x, 0.0], [x, 0.5]]
        })
        .collect();
    system.shared().set_floor_map(floor);

    // Tracking side: a burst of requests; the mailbox coalesces them.
    for i in 0..3 {
        let pose = SE3 {
            rotation: nalgebra::UnitQuaternion::identity(),
            translation: Vector3::new(0.1 * i as f64, 0.0, 0.0),
        };
        system
            .shared()
            .send_planning_request(Some(pose), KeyFrameId::new(1));
        std::thread::sleep(Duration::from_millis(200));
    }

    let committed = system.shared().planning_trajectory();
    info!(waypoints = committed.len(), "committed trajectory");
    for wp in committed.iter().take(10) {
        info!(x = wp.x, y = wp.y, yaw = wp.yaw, "waypoint");
    }

    system.shutdown();
    Ok(())
}
