// roadster_sim/src/simulation/core/components.rs

use bevy::prelude::{Component, Resource};
use roadster_core::prelude::RawControls;

/// Marks a vehicle whose `ControlInput` is fed from the keyboard state.
/// Vehicles without it keep whatever controls were written to them.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct KeyboardDriven;

/// The raw controls read from the keyboard this frame.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DriverControls(pub RawControls);
