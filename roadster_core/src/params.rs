// roadster_core/src/params.rs

use crate::error::ParamError;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when checking `lf + lr == wheelbase`.
const AXLE_SPLIT_TOLERANCE: f64 = 1e-6;

// =========================================================================
// == Vehicle Parameters ==
// =========================================================================

/// The static, physical description of a vehicle. Set once when the vehicle is
/// created and never mutated by the integrator.
///
/// All values are SI: kg, m, N/rad, N·m/rad, rad, m/s^2. Both `max_acceleration`
/// and `max_deceleration` are positive magnitudes; the sign comes from the demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct VehicleParameters {
    /// Total vehicle mass (kg).
    pub mass: f64,
    /// Distance between front and rear axles (m).
    pub wheelbase: f64,
    /// Distance from the center of gravity to the front axle (m).
    pub lf: f64,
    /// Distance from the center of gravity to the rear axle (m).
    pub lr: f64,
    /// Distance between left and right wheel centers (m).
    pub track_width: f64,
    /// Height of the center of gravity above the ground (m).
    pub cg_height: f64,
    /// Yaw moment of inertia (kg·m^2).
    pub yaw_inertia: f64,
    /// Front axle cornering stiffness (N/rad).
    pub front_cornering_stiffness: f64,
    /// Rear axle cornering stiffness (N/rad).
    pub rear_cornering_stiffness: f64,
    /// Body roll stiffness (N·m/rad). Only feeds the reported roll angle.
    pub roll_stiffness: f64,
    /// Largest front-wheel steer angle in either direction (rad).
    pub max_steer: f64,
    /// Acceleration at full throttle demand (m/s^2).
    pub max_acceleration: f64,
    /// Deceleration magnitude at full brake demand (m/s^2).
    pub max_deceleration: f64,
}

impl Default for VehicleParameters {
    fn default() -> Self {
        // A mid-size sedan with a centered CG.
        Self {
            mass: 1500.0,
            wheelbase: 2.5,
            lf: 1.25,
            lr: 1.25,
            track_width: 1.6,
            cg_height: 0.5,
            yaw_inertia: 2250.0,
            front_cornering_stiffness: 80_000.0,
            rear_cornering_stiffness: 80_000.0,
            roll_stiffness: 150_000.0,
            max_steer: 15.0_f64.to_radians(),
            max_acceleration: 5.0,
            max_deceleration: 10.0,
        }
    }
}

impl VehicleParameters {
    /// Checks that every parameter is finite and positive and that the CG
    /// position is consistent with the wheelbase.
    pub fn validate(&self) -> Result<(), ParamError> {
        let fields = [
            ("mass", self.mass),
            ("wheelbase", self.wheelbase),
            ("lf", self.lf),
            ("lr", self.lr),
            ("track_width", self.track_width),
            ("cg_height", self.cg_height),
            ("yaw_inertia", self.yaw_inertia),
            ("front_cornering_stiffness", self.front_cornering_stiffness),
            ("rear_cornering_stiffness", self.rear_cornering_stiffness),
            ("roll_stiffness", self.roll_stiffness),
            ("max_steer", self.max_steer),
            ("max_acceleration", self.max_acceleration),
            ("max_deceleration", self.max_deceleration),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamError::NotPositive { name, value });
            }
        }

        if ((self.lf + self.lr) - self.wheelbase).abs() > AXLE_SPLIT_TOLERANCE * self.wheelbase {
            return Err(ParamError::AxleSplit {
                lf: self.lf,
                lr: self.lr,
                wheelbase: self.wheelbase,
            });
        }
        Ok(())
    }

    /// Vehicle weight (N).
    pub fn weight(&self) -> f64 {
        self.mass * crate::types::GRAVITY
    }
}

// =========================================================================
// == Drive Tuning ==
// =========================================================================

/// How the vehicle slows down when neither throttle nor brake is demanded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")] // `type = "..."` in TOML picks the variant
#[serde(rename_all = "PascalCase")]
pub enum ResistanceModel {
    /// Linear rolling resistance plus quadratic aerodynamic drag, both opposing
    /// the velocity: `a = rolling·(-v) + drag·(-v·|v|)`.
    Proportional { rolling: f64, drag: f64 },
    /// Constant deceleration opposing motion. The last step before standstill
    /// lands exactly on zero instead of reversing direction.
    CoastFriction { deceleration: f64 },
}

impl Default for ResistanceModel {
    fn default() -> Self {
        ResistanceModel::Proportional {
            rolling: 0.015,
            drag: 0.001,
        }
    }
}

/// What to do with normal loads that come out negative under extreme transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadClampPolicy {
    /// Report the raw linear model, negative values included.
    #[default]
    Unclamped,
    /// A lifted wheel (or axle) carries zero load; its deficit is taken from
    /// the partner on the same axle (or from the other axle).
    ClampNonNegative,
}

/// The tunable constants of the integrator that are not physical properties of
/// the vehicle body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DriveTuning {
    /// Steering wheel slew rate at full steer demand (rad/s).
    pub steer_rate: f64,
    /// Rate at which the steer angle returns to center with no steer demand (rad/s).
    /// Zero keeps the last angle.
    pub steer_centering_rate: f64,
    /// Highest forward speed (m/s, positive).
    pub forward_speed_limit: f64,
    /// Highest reverse speed (m/s, negative).
    pub reverse_speed_limit: f64,
    /// Below this speed the bicycle model is not applied (m/s).
    pub dead_zone_speed: f64,
    pub resistance: ResistanceModel,
    pub load_clamp: LoadClampPolicy,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self {
            steer_rate: 1.5,
            steer_centering_rate: 0.0,
            forward_speed_limit: 30.0,
            reverse_speed_limit: -15.0,
            dead_zone_speed: 0.1,
            resistance: ResistanceModel::default(),
            load_clamp: LoadClampPolicy::default(),
        }
    }
}

impl DriveTuning {
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.steer_rate.is_finite() && self.steer_rate > 0.0) {
            return Err(ParamError::NotPositive {
                name: "steer_rate",
                value: self.steer_rate,
            });
        }

        let mut non_negative = vec![
            ("steer_centering_rate", self.steer_centering_rate),
            ("dead_zone_speed", self.dead_zone_speed),
        ];
        match self.resistance {
            ResistanceModel::Proportional { rolling, drag } => {
                non_negative.push(("resistance.rolling", rolling));
                non_negative.push(("resistance.drag", drag));
            }
            ResistanceModel::CoastFriction { deceleration } => {
                non_negative.push(("resistance.deceleration", deceleration));
            }
        }
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ParamError::NegativeTuning { name, value });
            }
        }

        let (reverse, forward) = (self.reverse_speed_limit, self.forward_speed_limit);
        if !(reverse.is_finite() && forward.is_finite() && reverse < 0.0 && forward > 0.0) {
            return Err(ParamError::SpeedLimits { reverse, forward });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(VehicleParameters::default().validate(), Ok(()));
        assert_eq!(DriveTuning::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_and_non_finite_parameters() {
        let params = VehicleParameters {
            track_width: 0.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamError::NotPositive {
                name: "track_width",
                value: 0.0
            })
        );

        let params = VehicleParameters {
            mass: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamError::NotPositive { name: "mass", .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_axle_split() {
        let params = VehicleParameters {
            lf: 1.0,
            lr: 1.0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ParamError::AxleSplit { .. })));
    }

    #[test]
    fn rejects_bad_speed_limits() {
        let tuning = DriveTuning {
            reverse_speed_limit: 5.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ParamError::SpeedLimits { .. })
        ));
    }

    #[test]
    fn rejects_negative_resistance() {
        let tuning = DriveTuning {
            resistance: ResistanceModel::CoastFriction { deceleration: -1.0 },
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ParamError::NegativeTuning {
                name: "resistance.deceleration",
                ..
            })
        ));
    }
}
