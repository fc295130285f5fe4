// roadster_core/src/models/load_transfer.rs

//! Quasi-static normal loads from longitudinal and lateral weight transfer.
//!
//! The body is treated as rigid: load moves between axles with the
//! longitudinal acceleration and between sides with the lateral acceleration,
//! both scaled by the CG height. Suspension geometry and roll-center height are
//! not modeled.

use crate::models::bicycle::slip_angle;
use crate::params::VehicleParameters;
use crate::state::VehicleState;
use crate::types::GRAVITY;
use serde::{Deserialize, Serialize};

/// Normal force at each wheel (N).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerLoads {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

impl CornerLoads {
    /// Loads in `[FL, FR, RL, RR]` order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Everything derived from a state for display. Recomputed every step and
/// never fed back into the integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::component::Component))]
pub struct DerivedLoads {
    /// Front axle normal force (N).
    pub front_axle: f64,
    /// Rear axle normal force (N).
    pub rear_axle: f64,
    pub corners: CornerLoads,
    /// Steady-state lateral acceleration `v²·tan δ / L` (m/s^2). Positive to the left.
    pub lateral_acceleration: f64,
    /// CG slip angle (rad).
    pub slip_angle: f64,
    /// Body roll angle from the lateral transfer and roll stiffness (rad).
    pub roll_angle: f64,
}

/// Axle loads of the vehicle standing still on level ground, `(front, rear)`.
pub fn static_axle_loads(params: &VehicleParameters) -> (f64, f64) {
    let weight = params.mass * GRAVITY;
    (
        (params.lr / params.wheelbase) * weight,
        (params.lf / params.wheelbase) * weight,
    )
}

/// Computes the loads implied by `state`. Pure; does not apply any clamping.
///
/// The axle figures charge half the lateral transfer against each axle; the
/// corner figures split each axle left/right and move `ΔFz_lat / 2` from the
/// inside to the outside wheel, so the four corners always sum to the weight.
pub fn derive_loads(state: &VehicleState, params: &VehicleParameters) -> DerivedLoads {
    let lateral_acceleration =
        state.velocity * state.velocity * state.steer_angle.tan() / params.wheelbase;

    let (front_static, rear_static) = static_axle_loads(params);
    let long_transfer = (params.cg_height / params.wheelbase) * params.mass * state.acceleration;
    let lat_transfer = (params.cg_height / params.track_width) * params.mass * lateral_acceleration;

    let front_long = front_static - long_transfer;
    let rear_long = rear_static + long_transfer;

    // A left turn (positive a_lat) unloads the left side.
    let half_lat = lat_transfer / 2.0;
    let corners = CornerLoads {
        front_left: front_long / 2.0 - half_lat,
        front_right: front_long / 2.0 + half_lat,
        rear_left: rear_long / 2.0 - half_lat,
        rear_right: rear_long / 2.0 + half_lat,
    };

    DerivedLoads {
        front_axle: front_long - half_lat,
        rear_axle: rear_long - half_lat,
        corners,
        lateral_acceleration,
        slip_angle: slip_angle(state.steer_angle, params.lf, params.lr),
        roll_angle: params.mass * lateral_acceleration * params.cg_height / params.roll_stiffness,
    }
}

impl DerivedLoads {
    /// Replaces negative normal forces with zero.
    ///
    /// A lifted wheel hands its deficit to the other wheel on the same axle,
    /// and a lifted axle hands its deficit to the other axle, so totals are kept
    /// wherever the pair total is still positive.
    pub fn clamped_non_negative(mut self) -> Self {
        (self.front_axle, self.rear_axle) = shift_deficit(self.front_axle, self.rear_axle);

        let c = &mut self.corners;
        (c.front_left, c.front_right) = shift_deficit(c.front_left, c.front_right);
        (c.rear_left, c.rear_right) = shift_deficit(c.rear_left, c.rear_right);
        self
    }
}

fn shift_deficit(a: f64, b: f64) -> (f64, f64) {
    if a < 0.0 {
        (0.0, (a + b).max(0.0))
    } else if b < 0.0 {
        ((a + b).max(0.0), 0.0)
    } else {
        (a, b)
    }
}
