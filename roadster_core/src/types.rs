// roadster_core/src/types.rs

use nalgebra::Vector3;
use std::f64::consts::TAU;

// --- Core Type Aliases ---
/// World-space position. The ground plane is x/z; y is carried but never integrated.
pub type Position = Vector3<f64>;

// --- Physical Constants ---
/// Standard gravity in m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Wraps an angle into the canonical heading range `[0, 2π)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `2π`, so that
/// case is folded back onto zero.
pub fn wrap_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
