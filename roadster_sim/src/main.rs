// roadster_sim/src/main.rs

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;

use roadster_sim::cli::Cli;
use roadster_sim::prelude::{AppState, TelemetrySink};
use roadster_sim::simulation::config::load_from_cli;
use roadster_sim::RoadsterSimulationPlugin;

fn main() -> AppExit {
    // --- 1. Parse the command line ---
    let cli = Cli::parse();

    let mut app = App::new();

    // Logging comes first so configuration loading is reported.
    app.add_plugins(LogPlugin {
        filter: cli.log_level.clone(),
        ..default()
    });

    // --- 2. Load, resolve and validate the scenario ---
    let loaded = match load_from_cli(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{}", e);
            return AppExit::error();
        }
    };
    let simulation = loaded.config.simulation.clone();

    let telemetry = match &loaded.config.telemetry.output {
        Some(path) => match TelemetrySink::create(path) {
            Ok(sink) => {
                info!("Writing telemetry to {:?}", path);
                sink
            }
            Err(e) => {
                error!("Cannot open telemetry output {:?}: {}", path, e);
                return AppExit::error();
            }
        },
        None => TelemetrySink::default(),
    };

    // --- 3. Configure the frame loop ---
    let frame = Duration::from_secs_f64(simulation.frame_dt);
    if simulation.realtime {
        app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
    } else {
        // Run flat out, advancing simulated time by exactly one frame per update.
        app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
            .insert_resource(TimeUpdateStrategy::ManualDuration(frame));
    }

    info!(
        "Running for {:.1} s of simulated time, frame dt {:.4} s, {}",
        simulation.duration_seconds,
        simulation.frame_dt,
        match simulation.fixed_hz {
            Some(hz) => format!("vehicles stepped at a fixed {hz} Hz"),
            None => "vehicles stepped once per frame".to_string(),
        }
    );

    // --- 4. Hand the resolved configuration to the simulation ---
    app.add_plugins(StatesPlugin)
        .insert_resource(loaded.config)
        .insert_resource(loaded.vehicles)
        .insert_resource(telemetry)
        .init_state::<AppState>()
        .add_plugins(RoadsterSimulationPlugin);

    app.run()
}
