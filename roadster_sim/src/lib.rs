// roadster_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::driver::ScriptedDriverPlugin;
use crate::simulation::plugins::telemetry::TelemetryPlugin;
use crate::simulation::plugins::vehicles::VehiclePlugin;

// This prelude is for convenience for other files WITHIN the roadster_sim crate.
pub mod prelude;

// This module contains all the simulation-specific logic.
pub mod cli;
pub mod simulation;

#[cfg(test)]
mod testing;

/// The main plugin that brings together all the simulation parts.
/// `main.rs` inserts the resolved configuration and then adds this one plugin.
pub struct RoadsterSimulationPlugin;

impl Plugin for RoadsterSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Core setup (spawns vehicles, sets up stages, ends the run).
            SimulationSetupPlugin,
            // Plays the scenario script on the keyboard state.
            ScriptedDriverPlugin,
            // Keyboard mapping and the vehicle integrator.
            VehiclePlugin,
            // Log summaries and the telemetry stream.
            TelemetryPlugin,
        ));
    }
}
