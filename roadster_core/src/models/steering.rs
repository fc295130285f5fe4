// roadster_core/src/models/steering.rs

use crate::params::DriveTuning;

/// Slews the steer angle toward the driver's demand.
///
/// A non-zero demand moves the angle at `steer_rate · demand`. With no demand
/// the angle either holds or, if `steer_centering_rate` is set, returns toward
/// center without passing it. The result is always inside `[-max_steer, max_steer]`.
pub fn update_steer_angle(
    steer_angle: f64,
    demand: f64,
    dt: f64,
    max_steer: f64,
    tuning: &DriveTuning,
) -> f64 {
    let next = if demand != 0.0 {
        steer_angle + tuning.steer_rate * demand * dt
    } else if tuning.steer_centering_rate > 0.0 {
        let step = tuning.steer_centering_rate * dt;
        if steer_angle.abs() <= step {
            0.0
        } else {
            steer_angle - step * steer_angle.signum()
        }
    } else {
        steer_angle
    };
    next.clamp(-max_steer, max_steer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const MAX: f64 = 0.26;

    #[test]
    fn slews_at_steer_rate() {
        let tuning = DriveTuning::default();
        let angle = update_steer_angle(0.0, 1.0, 0.1, MAX, &tuning);
        assert_abs_diff_eq!(angle, 0.15, epsilon = 1e-12);
        let angle = update_steer_angle(angle, -0.5, 0.1, MAX, &tuning);
        assert_abs_diff_eq!(angle, 0.075, epsilon = 1e-12);
    }

    #[test]
    fn clamps_to_max_steer() {
        let tuning = DriveTuning::default();
        assert_eq!(update_steer_angle(0.2, 1.0, 1.0, MAX, &tuning), MAX);
        assert_eq!(update_steer_angle(-0.2, -1.0, 1.0, MAX, &tuning), -MAX);
    }

    #[test]
    fn holds_without_demand_by_default() {
        let tuning = DriveTuning::default();
        assert_eq!(update_steer_angle(0.1, 0.0, 0.5, MAX, &tuning), 0.1);
    }

    #[test]
    fn centering_returns_to_zero_without_overshoot() {
        let tuning = DriveTuning {
            steer_centering_rate: 1.0,
            ..Default::default()
        };
        assert_abs_diff_eq!(
            update_steer_angle(0.2, 0.0, 0.1, MAX, &tuning),
            0.1,
            epsilon = 1e-12
        );
        assert_eq!(update_steer_angle(-0.05, 0.0, 0.1, MAX, &tuning), 0.0);
    }
}
