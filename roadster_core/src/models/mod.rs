// roadster_core/src/models/mod.rs

//! The individual pieces of the per-step update. Each one is a pure function
//! of its inputs so it can be checked on its own; `integrator` wires them up.

pub mod bicycle;
pub mod load_transfer;
pub mod longitudinal;
pub mod steering;
