// roadster_core/src/lib.rs

// This file defines the public modules of the library.
pub mod error;
pub mod input;
pub mod integrator;
pub mod models;
pub mod params;
pub mod prelude;
pub mod state;
pub mod types;
