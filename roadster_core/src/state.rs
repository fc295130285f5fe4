// roadster_core/src/state.rs

use crate::types::{wrap_heading, Position};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// The full kinematic state of one vehicle.
///
/// The integrator reads one of these and returns the next; it never keeps a
/// copy of its own, so any number of vehicles can be advanced side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::component::Component))]
pub struct VehicleState {
    /// World-space location (m). `y` is carried through unchanged.
    pub position: Position,
    /// Yaw angle in `[0, 2π)` (rad).
    pub heading: f64,
    /// Signed speed along the heading (m/s). Negative when reversing.
    pub velocity: f64,
    /// Longitudinal acceleration applied during the last step (m/s^2).
    pub acceleration: f64,
    /// Front-wheel steer angle (rad). Positive steers left.
    pub steer_angle: f64,
    /// Yaw rate produced by the last step (rad/s).
    pub yaw_rate: f64,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros(), 0.0)
    }
}

impl VehicleState {
    /// A stationary vehicle with centered steering.
    pub fn at_rest(position: Position, heading: f64) -> Self {
        Self {
            position,
            heading: wrap_heading(heading),
            velocity: 0.0,
            acceleration: 0.0,
            steer_angle: 0.0,
            yaw_rate: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }
}
