pub mod driver;
pub mod telemetry;
pub mod vehicles;
