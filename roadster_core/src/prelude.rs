// roadster_core/src/prelude.rs

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::input::{ControlInput, InputMapper, RawControls};
pub use crate::models::load_transfer::{CornerLoads, DerivedLoads};
pub use crate::params::{DriveTuning, LoadClampPolicy, ResistanceModel, VehicleParameters};
pub use crate::state::VehicleState;
pub use crate::types::{wrap_heading, Position, GRAVITY};

// --- The Integrator (the main contract of the library) ---
pub use crate::integrator::{step, VehicleIntegrator};
pub use crate::models::load_transfer::derive_loads;

// --- Errors ---
pub use crate::error::{ParamError, StepError};
