// roadster_core/src/input.rs

//! Maps raw driver signals onto the normalized demands the integrator consumes.

use serde::{Deserialize, Serialize};

/// The instantaneous state of the driver's controls.
///
/// Digital buttons are expressed as intensity `1.0` (pressed) or `0.0`; analog
/// triggers may use anything in between. `quit` is never read by the core and
/// exists so a host can carry the whole control frame in one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawControls {
    pub accelerate: f64,
    pub brake: f64,
    pub steer_left: f64,
    pub steer_right: f64,
    pub quit: bool,
}

impl RawControls {
    /// Builds a control frame from digital buttons.
    pub fn from_buttons(
        accelerate: bool,
        brake: bool,
        steer_left: bool,
        steer_right: bool,
        quit: bool,
    ) -> Self {
        let level = |pressed: bool| if pressed { 1.0 } else { 0.0 };
        Self {
            accelerate: level(accelerate),
            brake: level(brake),
            steer_left: level(steer_left),
            steer_right: level(steer_right),
            quit,
        }
    }
}

/// Normalized demands for one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::component::Component))]
pub struct ControlInput {
    /// `[-1, 1]`; negative values brake.
    pub acceleration_demand: f64,
    /// `[-1, 1]`; positive values steer left.
    pub steer_demand: f64,
}

impl ControlInput {
    /// Creates a control input, clamping both demands into `[-1, 1]`.
    /// A NaN demand is treated as no demand.
    pub fn new(acceleration_demand: f64, steer_demand: f64) -> Self {
        Self {
            acceleration_demand: clamp_demand(acceleration_demand),
            steer_demand: clamp_demand(steer_demand),
        }
    }

    pub fn neutral() -> Self {
        Self::default()
    }

    /// Re-applies the `[-1, 1]` clamp. The fields are public, so a value built
    /// by hand or deserialized may not have gone through [`ControlInput::new`].
    pub fn clamped(self) -> Self {
        Self::new(self.acceleration_demand, self.steer_demand)
    }
}

fn clamp_demand(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

fn intensity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Converts [`RawControls`] into a [`ControlInput`].
///
/// Opposing inputs are resolved in a fixed order: accelerate wins over brake,
/// and steer-right wins over steer-left.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputMapper;

impl InputMapper {
    pub fn map(&self, raw: &RawControls) -> ControlInput {
        let accelerate = intensity(raw.accelerate);
        let brake = intensity(raw.brake);
        let acceleration_demand = if accelerate > 0.0 {
            accelerate
        } else if brake > 0.0 {
            -brake
        } else {
            0.0
        };

        let mut steer_demand = 0.0;
        let left = intensity(raw.steer_left);
        if left > 0.0 {
            steer_demand = left;
        }
        let right = intensity(raw.steer_right);
        if right > 0.0 {
            steer_demand = -right;
        }

        ControlInput::new(acceleration_demand, steer_demand)
    }
}

impl From<&RawControls> for ControlInput {
    fn from(raw: &RawControls) -> Self {
        InputMapper.map(raw)
    }
}
