// roadster_core/src/integrator.rs

use crate::error::{ParamError, StepError};
use crate::input::ControlInput;
use crate::models::bicycle::advance_pose;
use crate::models::load_transfer::{derive_loads, DerivedLoads};
use crate::models::longitudinal::{integrate_velocity, longitudinal_acceleration};
use crate::models::steering::update_steer_angle;
use crate::params::{DriveTuning, LoadClampPolicy, VehicleParameters};
use crate::state::VehicleState;

/// Advances `state` by `dt` seconds under `controls`.
///
/// The update is semi-implicit Euler: longitudinal acceleration and velocity
/// first, then the steer angle, then the pose using the new velocity and angle.
/// A non-positive or non-finite `dt` leaves the state untouched (a paused clock
/// or the very first frame), and the loads are still derived for it.
/// Demands outside `[-1, 1]` are clamped and NaN demands count as zero.
pub fn step(
    state: &VehicleState,
    params: &VehicleParameters,
    tuning: &DriveTuning,
    controls: ControlInput,
    dt: f64,
) -> (VehicleState, DerivedLoads) {
    if !(dt.is_finite() && dt > 0.0) {
        return (*state, loads_for(state, params, tuning));
    }
    let controls = controls.clamped();

    let acceleration = longitudinal_acceleration(
        controls.acceleration_demand,
        state.velocity,
        dt,
        params,
        tuning,
    );
    let velocity = integrate_velocity(state.velocity, acceleration, dt, tuning);
    let steer_angle = update_steer_angle(
        state.steer_angle,
        controls.steer_demand,
        dt,
        params.max_steer,
        tuning,
    );
    let pose = advance_pose(
        &state.position,
        state.heading,
        velocity,
        steer_angle,
        dt,
        params,
        tuning,
    );

    let next = VehicleState {
        position: pose.position,
        heading: pose.heading,
        velocity,
        acceleration,
        steer_angle,
        yaw_rate: pose.yaw_rate,
    };
    let loads = loads_for(&next, params, tuning);
    (next, loads)
}

fn loads_for(state: &VehicleState, params: &VehicleParameters, tuning: &DriveTuning) -> DerivedLoads {
    let loads = derive_loads(state, params);
    match tuning.load_clamp {
        LoadClampPolicy::Unclamped => loads,
        LoadClampPolicy::ClampNonNegative => loads.clamped_non_negative(),
    }
}

/// A validated vehicle model: parameters and tuning that have passed their
/// checks, ready to step any number of states.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::component::Component))]
pub struct VehicleIntegrator {
    params: VehicleParameters,
    tuning: DriveTuning,
}

impl VehicleIntegrator {
    pub fn new(params: VehicleParameters, tuning: DriveTuning) -> Result<Self, ParamError> {
        params.validate()?;
        tuning.validate()?;
        Ok(Self { params, tuning })
    }

    pub fn params(&self) -> &VehicleParameters {
        &self.params
    }

    pub fn tuning(&self) -> &DriveTuning {
        &self.tuning
    }

    /// See [`step`].
    pub fn step(
        &self,
        state: &VehicleState,
        controls: ControlInput,
        dt: f64,
    ) -> (VehicleState, DerivedLoads) {
        step(state, &self.params, &self.tuning, controls, dt)
    }

    /// Like [`VehicleIntegrator::step`], but writes the new state back in place.
    pub fn step_in_place(
        &self,
        state: &mut VehicleState,
        controls: ControlInput,
        dt: f64,
    ) -> DerivedLoads {
        let (next, loads) = self.step(state, controls, dt);
        *state = next;
        loads
    }

    /// Like [`VehicleIntegrator::step`], but reports a NaN or infinite `dt`
    /// instead of silently skipping it. `dt <= 0` is still a no-op.
    pub fn checked_step(
        &self,
        state: &VehicleState,
        controls: ControlInput,
        dt: f64,
    ) -> Result<(VehicleState, DerivedLoads), StepError> {
        if !dt.is_finite() {
            return Err(StepError::InvalidTimestep(dt));
        }
        Ok(self.step(state, controls, dt))
    }

    /// Loads for `state` with this vehicle's clamp policy applied.
    pub fn derive_loads(&self, state: &VehicleState) -> DerivedLoads {
        loads_for(state, &self.params, &self.tuning)
    }
}
