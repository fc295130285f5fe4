// roadster_sim/src/simulation/config/structs.rs

use bevy::prelude::{KeyCode, Resource};
use figment::value::Value;
use nalgebra::Vector3;
use roadster_core::prelude::{DriveTuning, VehicleParameters, VehicleState};
use serde::Deserialize;
use std::path::PathBuf;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # ScenarioConfig
/// The root of the data parsed from a `scenario.toml` file.
#[derive(Resource, Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub telemetry: Telemetry,

    // The TOML has `[[vehicles]]`, which becomes a Vec of VehicleEntry structs.
    #[serde(default)]
    pub vehicles: Vec<VehicleEntry>,

    /// Timed key presses played back by the scripted driver.
    #[serde(default)]
    pub script: Vec<ScriptSegment>,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct Simulation {
    /// Length of the run in seconds of simulated time.
    pub duration_seconds: f64,
    /// Frame period in seconds. In realtime mode the runner sleeps this long
    /// between frames; otherwise simulated time advances by exactly this much
    /// per frame.
    pub frame_dt: f64,
    /// Pace frames against the wall clock instead of running flat out.
    pub realtime: bool,
    /// When set, the integrator runs at this fixed rate, decoupled from the
    /// frame rate.
    pub fixed_hz: Option<f64>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            duration_seconds: 20.0,
            frame_dt: 1.0 / 60.0,
            realtime: false,
            fixed_hz: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct Telemetry {
    /// Period of the human-readable log summary, in simulated seconds.
    pub log_every_seconds: f64,
    /// Optional JSON-lines file receiving one record per vehicle per frame.
    pub output: Option<PathBuf>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            log_every_seconds: 1.0,
            output: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct VehicleEntry {
    pub name: String,
    /// Catalog key of the base definition, e.g. `"vehicles.sedan"`.
    #[serde(default)]
    pub from: Option<String>,
    /// Partial definition deep-merged over the catalog entry.
    #[serde(default, rename = "override")]
    pub overrides: Option<Value>,
    #[serde(default)]
    pub start: StartingPose,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(deny_unknown_fields, default)]
pub struct StartingPose {
    pub x: f64,
    /// Height is carried through untouched; the vehicle drives in the X/Z plane.
    pub y: f64,
    pub z: f64,
    pub heading_deg: f64,
    /// Initial signed forward speed (m/s).
    pub speed: f64,
}

impl StartingPose {
    pub fn to_state(&self) -> VehicleState {
        VehicleState::at_rest(
            Vector3::new(self.x, self.y, self.z),
            self.heading_deg.to_radians(),
        )
        .with_velocity(self.speed)
    }
}

/// The contents of one catalog file, and the shape a vehicle resolves to.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct VehicleDefinition {
    #[serde(default)]
    pub parameters: VehicleParameters,
    #[serde(default)]
    pub tuning: DriveTuning,
}

// =========================================================================
// == Driver Script ==
// =========================================================================

/// A driver control as named in scenario scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKey {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
    Quit,
}

impl ControlKey {
    pub const ALL: [ControlKey; 5] = [
        ControlKey::Accelerate,
        ControlKey::Brake,
        ControlKey::SteerLeft,
        ControlKey::SteerRight,
        ControlKey::Quit,
    ];

    /// Keys bound to this control. The first one is what the script presses.
    pub fn key_codes(&self) -> &'static [KeyCode] {
        match self {
            ControlKey::Accelerate => &[KeyCode::KeyW, KeyCode::ArrowUp],
            ControlKey::Brake => &[KeyCode::KeyS, KeyCode::ArrowDown],
            ControlKey::SteerLeft => &[KeyCode::KeyA, KeyCode::ArrowLeft],
            ControlKey::SteerRight => &[KeyCode::KeyD, KeyCode::ArrowRight],
            ControlKey::Quit => &[KeyCode::Escape],
        }
    }
}

/// Holds `controls` down for `start <= t < end` (simulated seconds).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptSegment {
    pub start: f64,
    pub end: f64,
    pub controls: Vec<ControlKey>,
}

impl ScriptSegment {
    pub fn is_active(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}
