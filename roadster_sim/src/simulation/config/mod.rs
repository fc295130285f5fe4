// roadster_sim/src/simulation/config/mod.rs

//! This module handles loading, resolving, and validating all simulation
//! configuration from disk, including the prefab catalog system.

mod catalog;
mod resolver;

pub mod structs;

use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use roadster_core::prelude::{ParamError, VehicleIntegrator, VehicleState};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;
pub use catalog::{load_catalog, PrefabCatalog};
pub use resolver::{resolve_definition_value, resolve_vehicle};
pub use structs::{ScenarioConfig, VehicleEntry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
    #[error("vehicle '{vehicle}' refers to unknown prefab '{key}'")]
    UnknownPrefab { vehicle: String, key: String },
    #[error("'{key}' must be a table to be merged")]
    NotATable { key: String },
    #[error("vehicle '{vehicle}' could not be resolved: {source}")]
    Resolve {
        vehicle: String,
        #[source]
        source: Box<figment::Error>,
    },
    #[error("vehicle '{vehicle}' is invalid: {source}")]
    InvalidVehicle {
        vehicle: String,
        #[source]
        source: ParamError,
    },
    #[error("invalid [simulation] setting: {0}")]
    Simulation(String),
    #[error("scenario defines no vehicles")]
    NoVehicles,
    #[error("vehicle name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("vehicle '{vehicle}' starts at {speed} m/s, outside its speed limits [{min}, {max}]")]
    StartSpeed {
        vehicle: String,
        speed: f64,
        min: f64,
        max: f64,
    },
}

/// A vehicle that has been resolved against the catalog and validated.
#[derive(Debug, Clone)]
pub struct ResolvedVehicle {
    pub name: String,
    pub integrator: VehicleIntegrator,
    pub start: VehicleState,
}

/// The final, resolved vehicle configurations, in scenario order.
#[derive(Resource, Default, Debug, Clone)]
pub struct ResolvedVehicles(pub Vec<ResolvedVehicle>);

/// Parses a scenario file. Does not touch the catalog.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ConfigError> {
    info!("Loading scenario from: {:?}", path);
    Figment::new()
        .merge(Toml::file_exact(path))
        .extract()
        .map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

/// Applies command-line overrides on top of the file contents.
pub fn apply_cli_overrides(config: &mut ScenarioConfig, cli: &Cli) {
    if let Some(duration) = cli.duration {
        config.simulation.duration_seconds = duration;
    }
    if let Some(hz) = cli.fixed_hz {
        config.simulation.fixed_hz = Some(hz);
    }
    if let Some(path) = &cli.telemetry {
        config.telemetry.output = Some(path.clone());
    }
}

/// Checks the `[simulation]` and `[telemetry]` tables for values the host
/// cannot run with.
pub fn validate_simulation(config: &ScenarioConfig) -> Result<(), ConfigError> {
    let sim = &config.simulation;
    if !(sim.duration_seconds.is_finite() && sim.duration_seconds > 0.0) {
        return Err(ConfigError::Simulation(format!(
            "duration_seconds must be positive, got {}",
            sim.duration_seconds
        )));
    }
    if !(sim.frame_dt.is_finite() && sim.frame_dt > 0.0) {
        return Err(ConfigError::Simulation(format!(
            "frame_dt must be positive, got {}",
            sim.frame_dt
        )));
    }
    if let Some(hz) = sim.fixed_hz {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ConfigError::Simulation(format!(
                "fixed_hz must be positive, got {hz}"
            )));
        }
    }
    let every = config.telemetry.log_every_seconds;
    if !(every.is_finite() && every > 0.0) {
        return Err(ConfigError::Simulation(format!(
            "telemetry.log_every_seconds must be positive, got {every}"
        )));
    }
    for segment in &config.script {
        if !(segment.start.is_finite() && segment.end.is_finite() && segment.start <= segment.end) {
            return Err(ConfigError::Simulation(format!(
                "script segment [{}, {}) is not a valid time range",
                segment.start, segment.end
            )));
        }
    }
    Ok(())
}

/// Resolves every `[[vehicles]]` entry against the catalog.
pub fn resolve_vehicles(
    config: &ScenarioConfig,
    catalog: &PrefabCatalog,
) -> Result<ResolvedVehicles, ConfigError> {
    if config.vehicles.is_empty() {
        return Err(ConfigError::NoVehicles);
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(config.vehicles.len());
    for entry in &config.vehicles {
        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::DuplicateName(entry.name.clone()));
        }
        let integrator = resolve_vehicle(entry, catalog)?;
        let tuning = integrator.tuning();
        let speed = entry.start.speed;
        if !(tuning.reverse_speed_limit..=tuning.forward_speed_limit).contains(&speed) {
            return Err(ConfigError::StartSpeed {
                vehicle: entry.name.clone(),
                speed,
                min: tuning.reverse_speed_limit,
                max: tuning.forward_speed_limit,
            });
        }
        info!(
            "Resolved vehicle '{}' (from {:?}): mass {} kg, wheelbase {} m",
            entry.name,
            entry.from,
            integrator.params().mass,
            integrator.params().wheelbase
        );
        resolved.push(ResolvedVehicle {
            name: entry.name.clone(),
            integrator,
            start: entry.start.to_state(),
        });
    }
    Ok(ResolvedVehicles(resolved))
}

/// Everything the host needs before the app is built.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub config: ScenarioConfig,
    pub vehicles: ResolvedVehicles,
}

/// Loads the scenario named on the command line, applies the CLI overrides,
/// and resolves its vehicles against the catalog.
pub fn load_from_cli(cli: &Cli) -> Result<LoadedScenario, ConfigError> {
    let mut config = load_scenario(&cli.scenario)?;
    apply_cli_overrides(&mut config, cli);
    validate_simulation(&config)?;

    let catalog = load_catalog(&cli.catalog)?;
    let vehicles = resolve_vehicles(&config, &catalog)?;
    Ok(LoadedScenario { config, vehicles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::ControlKey;
    use approx::assert_abs_diff_eq;
    use clap::Parser;

    const SCENARIO: &str = r#"
        [simulation]
        duration_seconds = 12.0
        frame_dt = 0.02
        fixed_hz = 200.0

        [telemetry]
        log_every_seconds = 0.5

        [[vehicles]]
        name = "ego"
        [vehicles.start]
        x = 1.0
        z = -2.0
        heading_deg = 90.0
        speed = 3.0

        [[vehicles]]
        name = "heavy"
        [vehicles.override.parameters]
        mass = 2400.0

        [[script]]
        start = 0.0
        end = 4.0
        controls = ["accelerate", "steer_left"]

        [[script]]
        start = 11.0
        end = 12.0
        controls = ["quit"]
    "#;

    fn parse(toml: &str) -> Result<ScenarioConfig, figment::Error> {
        Figment::new().merge(Toml::string(toml)).extract()
    }

    #[test]
    fn parses_a_complete_scenario() {
        let config = parse(SCENARIO).unwrap();
        assert_eq!(config.simulation.duration_seconds, 12.0);
        assert_eq!(config.simulation.fixed_hz, Some(200.0));
        assert!(!config.simulation.realtime);
        assert_eq!(config.telemetry.log_every_seconds, 0.5);
        assert_eq!(config.vehicles.len(), 2);
        assert_eq!(
            config.script[0].controls,
            vec![ControlKey::Accelerate, ControlKey::SteerLeft]
        );
        validate_simulation(&config).unwrap();

        let start = config.vehicles[0].start.to_state();
        assert_eq!(start.position.x, 1.0);
        assert_eq!(start.position.z, -2.0);
        assert_abs_diff_eq!(start.heading, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(start.velocity, 3.0);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config = parse("[[vehicles]]\nname = \"solo\"").unwrap();
        assert_eq!(config.simulation.frame_dt, 1.0 / 60.0);
        assert!(config.telemetry.output.is_none());
        assert!(config.script.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[simulation]\nduraton_seconds = 3.0").is_err());
        assert!(parse("[[script]]\nstart = 0.0\nend = 1.0\ncontrols = [\"honk\"]").is_err());
    }

    #[test]
    fn resolves_all_vehicles() {
        let config = parse(SCENARIO).unwrap();
        let resolved = resolve_vehicles(&config, &PrefabCatalog::default()).unwrap();
        assert_eq!(resolved.0.len(), 2);
        assert_eq!(resolved.0[1].integrator.params().mass, 2400.0);
        assert_eq!(resolved.0[0].start.velocity, 3.0);
    }

    #[test]
    fn rejects_empty_and_duplicate_vehicle_lists() {
        let empty = ScenarioConfig::default();
        assert!(matches!(
            resolve_vehicles(&empty, &PrefabCatalog::default()),
            Err(ConfigError::NoVehicles)
        ));

        let twins = parse("[[vehicles]]\nname = \"a\"\n[[vehicles]]\nname = \"a\"").unwrap();
        assert!(matches!(
            resolve_vehicles(&twins, &PrefabCatalog::default()),
            Err(ConfigError::DuplicateName(name)) if name == "a"
        ));
    }

    #[test]
    fn rejects_start_speed_outside_limits() {
        for speed in ["100.0", "-20.0", "nan"] {
            let toml = format!("[[vehicles]]\nname = \"fast\"\n[vehicles.start]\nspeed = {speed}");
            let config = parse(&toml).unwrap();
            assert!(matches!(
                resolve_vehicles(&config, &PrefabCatalog::default()),
                Err(ConfigError::StartSpeed { vehicle, .. }) if vehicle == "fast"
            ));
        }

        let at_limit = parse("[[vehicles]]\nname = \"edge\"\n[vehicles.start]\nspeed = -15.0").unwrap();
        let resolved = resolve_vehicles(&at_limit, &PrefabCatalog::default()).unwrap();
        assert_eq!(resolved.0[0].start.velocity, -15.0);
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = parse(SCENARIO).unwrap();
        let cli = Cli::parse_from([
            "roadster",
            "--duration",
            "3.5",
            "--fixed-hz",
            "50",
            "--telemetry",
            "out.jsonl",
        ]);
        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.simulation.duration_seconds, 3.5);
        assert_eq!(config.simulation.fixed_hz, Some(50.0));
        assert_eq!(config.telemetry.output, Some(PathBuf::from("out.jsonl")));
    }

    #[test]
    fn validation_catches_bad_timing() {
        let mut config = parse(SCENARIO).unwrap();
        config.simulation.frame_dt = 0.0;
        assert!(matches!(
            validate_simulation(&config),
            Err(ConfigError::Simulation(_))
        ));

        let mut config = parse(SCENARIO).unwrap();
        config.script[0].end = -1.0;
        assert!(validate_simulation(&config).is_err());
    }

    #[test]
    fn bundled_scenarios_resolve_against_bundled_catalog() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets");
        let catalog = load_catalog(&assets.join("catalog")).unwrap();
        assert!(catalog.get("vehicles.sedan").is_some());

        for scenario in ["00_figure_eight.toml", "01_brake_and_reverse.toml"] {
            let config = load_scenario(&assets.join("scenarios").join(scenario)).unwrap();
            validate_simulation(&config).unwrap();
            let resolved = resolve_vehicles(&config, &catalog).unwrap();
            assert!(!resolved.0.is_empty(), "{scenario} has no vehicles");
        }
    }

    #[test]
    fn missing_scenario_file_is_a_load_error() {
        let err = load_scenario(Path::new("no/such/scenario.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }
}
