// roadster_sim/src/simulation/core/simulation_setup.rs

use crate::prelude::*;
use crate::simulation::config::ResolvedVehicles;

/// Why the run ended. Inserted when the app enters `Finished`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Quit,
    DurationReached,
}

pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // This plugin's job is to read the config and add resources and the
        // lifecycle systems.
        let config = app
            .world()
            .get_resource::<ScenarioConfig>()
            .cloned()
            .unwrap_or_default();

        if let Some(hz) = config.simulation.fixed_hz {
            app.insert_resource(Time::<Fixed>::from_hz(hz));
        }

        // --- INITIALIZE RESOURCES ---
        app.init_resource::<ScenarioConfig>()
            .init_resource::<ResolvedVehicles>()
            .init_resource::<DriverControls>()
            // No InputPlugin in a headless app, so the keyboard state is ours to own.
            .init_resource::<ButtonInput<KeyCode>>();

        // --- CONFIGURE THE SPAWNING PIPELINE ---
        app.configure_sets(
            OnEnter(AppState::SceneBuilding),
            (SceneBuildSet::SpawnVehicles, SceneBuildSet::Finalize).chain(),
        )
        .add_systems(
            OnEnter(AppState::SceneBuilding),
            (
                spawn_vehicles.in_set(SceneBuildSet::SpawnVehicles),
                transition_to_running.in_set(SceneBuildSet::Finalize),
            ),
        );

        // Configure the runtime schedule graph.
        app.configure_sets(
            PreUpdate,
            (SimulationSet::Driver, SimulationSet::Input).chain(),
        )
        .configure_sets(
            Update,
            (SimulationSet::Integration, SimulationSet::Supervision).chain(),
        )
        .add_systems(
            Update,
            supervise_run
                .in_set(SimulationSet::Supervision)
                .run_if(in_state(AppState::Running)),
        );

        // --- SHUTDOWN ---
        app.configure_sets(
            OnEnter(AppState::Finished),
            (FinishSet::Report, FinishSet::Exit).chain(),
        )
        .add_systems(
            OnEnter(AppState::Finished),
            (
                log_final_states.in_set(FinishSet::Report),
                request_exit.in_set(FinishSet::Exit),
            ),
        );
    }
}

fn spawn_vehicles(mut commands: Commands, resolved: Res<ResolvedVehicles>) {
    for vehicle in &resolved.0 {
        info!(
            "[SPAWN] '{}' at ({:.2}, {:.2}, {:.2}), heading {:.1} deg, speed {:.2} m/s",
            vehicle.name,
            vehicle.start.position.x,
            vehicle.start.position.y,
            vehicle.start.position.z,
            vehicle.start.heading.to_degrees(),
            vehicle.start.velocity
        );

        commands.spawn((
            Name::new(vehicle.name.clone()),
            vehicle.integrator.clone(),
            vehicle.start,
            ControlInput::neutral(),
            vehicle.integrator.derive_loads(&vehicle.start),
            KeyboardDriven,
        ));
    }
}

fn transition_to_running(
    resolved: Res<ResolvedVehicles>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    info!(
        "Scene built with {} vehicle(s). Transitioning to Running state.",
        resolved.0.len()
    );
    next_state.set(AppState::Running);
}

/// Ends the run when quit is pressed or the configured duration has elapsed.
fn supervise_run(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    controls: Res<DriverControls>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let elapsed = time.elapsed_secs_f64();
    let reason = if controls.0.quit {
        FinishReason::Quit
    } else if elapsed >= config.simulation.duration_seconds {
        FinishReason::DurationReached
    } else {
        return;
    };

    info!("Run finished at t = {:.3} s ({:?}).", elapsed, reason);
    commands.insert_resource(reason);
    next_state.set(AppState::Finished);
}

fn log_final_states(query: Query<(&Name, &VehicleState, &DerivedLoads)>) {
    for (name, state, loads) in &query {
        info!(
            "[FINAL] '{}': position ({:.3}, {:.3}, {:.3}), heading {:.2} deg, velocity {:.3} m/s, \
             steer {:.2} deg, Fz front {:.1} N, rear {:.1} N",
            name,
            state.position.x,
            state.position.y,
            state.position.z,
            state.heading.to_degrees(),
            state.velocity,
            state.steer_angle.to_degrees(),
            loads.front_axle,
            loads.rear_axle
        );
    }
}

fn request_exit(mut exit: EventWriter<AppExit>) {
    exit.write(AppExit::Success);
}
