// roadster_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the entire roadster_core prelude so you can easily access
// pure types like `VehicleState`, `VehicleIntegrator`, `DerivedLoads`, etc.
pub use roadster_core::prelude::*;

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::core::app_state::{AppState, FinishSet, SceneBuildSet, SimulationSet};
pub use crate::simulation::core::components::{DriverControls, KeyboardDriven};
pub use crate::simulation::core::simulation_setup::FinishReason;

pub use crate::simulation::plugins::driver::DriverScript;
pub use crate::simulation::plugins::telemetry::TelemetrySink;
