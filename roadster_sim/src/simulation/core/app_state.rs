// src/simulation/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. Configuration has already been resolved by the time
    /// the app starts, so we go straight to spawning entities from it.
    #[default]
    SceneBuilding,

    /// The scene is built. The main simulation loop is now running.
    Running,

    /// The run is over (quit pressed or duration reached). Results are
    /// reported and the app exits.
    Finished,
}

/// System sets to control the order of execution when entering `SceneBuilding`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneBuildSet {
    /// Spawn one entity per resolved vehicle.
    SpawnVehicles,
    /// Hand over to the main loop.
    Finalize,
}

/// System sets to control the order of execution when entering `Finished`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishSet {
    /// Log final states and flush any open outputs.
    Report,
    /// Ask the app to exit.
    Exit,
}

// =========================================================================
// == Main Simulation Sets (The "Data Flow Graph") ==
// =========================================================================

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    // --- PreUpdate ---
    /// The scripted driver presses and releases keys for this frame.
    Driver,
    /// Pressed keys are mapped into each vehicle's control mailbox.
    Input,

    // --- Update, or FixedUpdate when a fixed rate is configured ---
    /// The vehicle integrator steps every vehicle.
    Integration,

    // --- Update ---
    /// Checks whether the run should end.
    Supervision,

    // --- PostUpdate ---
    /// Periodic summaries and telemetry records.
    Telemetry,
}
