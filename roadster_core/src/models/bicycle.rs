// roadster_core/src/models/bicycle.rs

//! Kinematic bicycle model: both wheels of an axle collapsed onto the
//! centerline, no tire slip, rear axle follows the front.
//!
//! Heading is measured from the world +X axis toward +Z, so a vehicle at
//! heading `θ` moves along `(cos θ, 0, sin θ)`.

use crate::params::{DriveTuning, VehicleParameters};
use crate::types::{wrap_heading, Position};
use nalgebra::Vector3;

/// Result of advancing the pose over one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseUpdate {
    pub position: Position,
    pub heading: f64,
    pub yaw_rate: f64,
}

/// Angle between the heading and the velocity of the center of gravity (rad).
pub fn slip_angle(steer_angle: f64, lf: f64, lr: f64) -> f64 {
    (lr * steer_angle.tan()).atan2(lf + lr)
}

/// Yaw rate for a given speed and steer angle (rad/s).
pub fn yaw_rate(velocity: f64, wheelbase: f64, steer_angle: f64) -> f64 {
    (velocity / wheelbase) * steer_angle.tan()
}

/// Moves the vehicle over `dt` at the given (already updated) velocity and
/// steer angle.
///
/// Inside the dead zone the heading is frozen and the position advances in a
/// straight line, which keeps near-zero speeds from producing rotation jitter.
pub fn advance_pose(
    position: &Position,
    heading: f64,
    velocity: f64,
    steer_angle: f64,
    dt: f64,
    params: &VehicleParameters,
    tuning: &DriveTuning,
) -> PoseUpdate {
    if velocity.abs() <= tuning.dead_zone_speed {
        let travel = Vector3::new(heading.cos(), 0.0, heading.sin()) * (velocity * dt);
        return PoseUpdate {
            position: position + travel,
            heading,
            yaw_rate: 0.0,
        };
    }

    let beta = slip_angle(steer_angle, params.lf, params.lr);
    let course = heading + beta;
    let travel = Vector3::new(course.cos(), 0.0, course.sin()) * (velocity * dt);

    let omega = yaw_rate(velocity, params.wheelbase, steer_angle);
    PoseUpdate {
        position: position + travel,
        heading: wrap_heading(heading + omega * dt),
        yaw_rate: omega,
    }
}
