// roadster_core/src/models/longitudinal.rs

use crate::params::{DriveTuning, ResistanceModel, VehicleParameters};

/// Longitudinal acceleration for one step (m/s^2).
///
/// Positive demand scales `max_acceleration`, negative demand scales
/// `max_deceleration`, and zero demand hands over to the coast resistance.
/// `dt` must be positive; it is only used to stop the coast model from
/// overshooting zero.
pub fn longitudinal_acceleration(
    demand: f64,
    velocity: f64,
    dt: f64,
    params: &VehicleParameters,
    tuning: &DriveTuning,
) -> f64 {
    if demand > 0.0 {
        params.max_acceleration * demand
    } else if demand < 0.0 {
        params.max_deceleration * demand
    } else {
        coast_acceleration(&tuning.resistance, velocity, dt)
    }
}

/// Passive deceleration when no pedal is pressed. Always opposes `velocity`
/// and is zero at standstill.
pub fn coast_acceleration(model: &ResistanceModel, velocity: f64, dt: f64) -> f64 {
    match *model {
        ResistanceModel::Proportional { rolling, drag } => {
            rolling * (-velocity) + drag * (-velocity * velocity.abs())
        }
        ResistanceModel::CoastFriction { deceleration } => {
            if velocity == 0.0 {
                return 0.0;
            }
            let a = -deceleration * velocity.signum();
            // Land on zero rather than crossing it.
            if (velocity + a * dt).signum() != velocity.signum() {
                -velocity / dt
            } else {
                a
            }
        }
    }
}

/// Integrates velocity over `dt` and applies the asymmetric speed limits.
pub fn integrate_velocity(velocity: f64, acceleration: f64, dt: f64, tuning: &DriveTuning) -> f64 {
    (velocity + acceleration * dt).clamp(tuning.reverse_speed_limit, tuning.forward_speed_limit)
}
