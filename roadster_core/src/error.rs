// roadster_core/src/error.rs

use thiserror::Error;

/// Raised when a vehicle is configured with values the integrator cannot run with.
///
/// Parameters are checked once at construction; a NaN or a zero wheelbase would
/// otherwise poison every subsequent step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("parameter `{name}` must be finite and greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("axle distances do not add up: lf ({lf}) + lr ({lr}) != wheelbase ({wheelbase})")]
    AxleSplit { lf: f64, lr: f64, wheelbase: f64 },

    #[error("speed limits must satisfy reverse < 0 < forward (got reverse {reverse}, forward {forward})")]
    SpeedLimits { reverse: f64, forward: f64 },

    #[error("tuning value `{name}` must be finite and not negative (got {value})")]
    NegativeTuning { name: &'static str, value: f64 },
}

/// Errors reported by [`crate::integrator::VehicleIntegrator::checked_step`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StepError {
    #[error("time step must be a finite number of seconds (got {0})")]
    InvalidTimestep(f64),
}
