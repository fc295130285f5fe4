// roadster_sim/src/simulation/plugins/vehicles.rs

use crate::prelude::*;

// --- THE PLUGIN ---
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        let fixed_rate = app
            .world()
            .get_resource::<ScenarioConfig>()
            .and_then(|config| config.simulation.fixed_hz)
            .is_some();

        app.init_resource::<DriverControls>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(
                PreUpdate,
                read_keyboard
                    .in_set(SimulationSet::Input)
                    .run_if(in_state(AppState::Running)),
            );

        // The integrator reads `Res<Time>`, which is the fixed clock inside
        // `FixedUpdate` and the virtual clock inside `Update`.
        let integrate = integrate_vehicles
            .in_set(SimulationSet::Integration)
            .run_if(in_state(AppState::Running));
        if fixed_rate {
            app.add_systems(FixedUpdate, integrate);
        } else {
            app.add_systems(Update, integrate);
        }
    }
}

// --- SYSTEMS ---

/// Returns true if any key bound to `control` is held down.
fn held(keys: &ButtonInput<KeyCode>, control: ControlKey) -> bool {
    keys.any_pressed(control.key_codes().iter().copied())
}

/// Maps the keyboard state into the control mailbox of every
/// keyboard-driven vehicle.
fn read_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut driver: ResMut<DriverControls>,
    mut query: Query<&mut ControlInput, With<KeyboardDriven>>,
) {
    let raw = RawControls::from_buttons(
        held(&keys, ControlKey::Accelerate),
        held(&keys, ControlKey::Brake),
        held(&keys, ControlKey::SteerLeft),
        held(&keys, ControlKey::SteerRight),
        held(&keys, ControlKey::Quit),
    );
    driver.0 = raw;

    let controls = InputMapper.map(&raw);
    for mut input in &mut query {
        *input = controls;
    }
}

/// RUNTIME: Steps every vehicle by the frame (or fixed) time delta.
fn integrate_vehicles(
    time: Res<Time>,
    mut query: Query<(
        &Name,
        &VehicleIntegrator,
        &ControlInput,
        &mut VehicleState,
        &mut DerivedLoads,
    )>,
) {
    let dt = time.delta_secs_f64();
    for (name, model, controls, mut state, mut loads) in &mut query {
        match model.checked_step(&state, *controls, dt) {
            Ok((next, next_loads)) => {
                *state = next;
                *loads = next_loads;
                trace!(
                    "[{}] dt {:.4} v {:.3} heading {:.4} steer {:.4}",
                    name,
                    dt,
                    state.velocity,
                    state.heading,
                    state.steer_angle
                );
            }
            Err(e) => warn!("[{}] step skipped: {}", name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn test_app(fixed_hz: Option<f64>) -> App {
        let mut config = ScenarioConfig::default();
        config.simulation.fixed_hz = fixed_hz;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(10)))
            .insert_resource(config)
            .init_state::<AppState>()
            .add_plugins(VehiclePlugin)
            .add_systems(
                Startup,
                |mut next: ResMut<NextState<AppState>>| next.set(AppState::Running),
            );
        if let Some(hz) = fixed_hz {
            app.insert_resource(Time::<Fixed>::from_hz(hz));
        }
        app
    }

    fn spawn_vehicle(app: &mut App, keyboard: bool) -> Entity {
        let model = VehicleIntegrator::new(VehicleParameters::default(), DriveTuning::default())
            .unwrap();
        let state = VehicleState::default();
        let loads = model.derive_loads(&state);
        let mut entity = app.world_mut().spawn((
            Name::new("test"),
            model,
            state,
            ControlInput::neutral(),
            loads,
        ));
        if keyboard {
            entity.insert(KeyboardDriven);
        }
        entity.id()
    }

    #[test]
    fn keyboard_state_reaches_the_mailbox() {
        let mut app = test_app(None);
        let driven = spawn_vehicle(&mut app, true);
        let manual = spawn_vehicle(&mut app, false);
        app.update();

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::ArrowUp);
            keys.press(KeyCode::KeyS);
            keys.press(KeyCode::KeyA);
        }
        app.update();

        // Accelerate wins over brake; only left is held.
        let controls = *app.world().get::<ControlInput>(driven).unwrap();
        assert_eq!(controls.acceleration_demand, 1.0);
        assert_eq!(controls.steer_demand, 1.0);
        assert_eq!(
            *app.world().get::<ControlInput>(manual).unwrap(),
            ControlInput::neutral()
        );
        assert!(!app.world().resource::<DriverControls>().0.quit);
    }

    #[test]
    fn throttle_accelerates_the_vehicle_each_frame() {
        let mut app = test_app(None);
        let car = spawn_vehicle(&mut app, true);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);

        for _ in 0..100 {
            app.update();
        }

        let state = app.world().get::<VehicleState>(car).unwrap();
        // 100 frames of 10 ms at 5 m/s^2.
        assert_abs_diff_eq!(state.velocity, 5.0, epsilon = 1e-6);
        assert!(state.position.x > 2.0);
        let loads = app.world().get::<DerivedLoads>(car).unwrap();
        assert!(loads.rear_axle > loads.front_axle);
    }

    #[test]
    fn fixed_rate_steps_independently_of_frames() {
        let mut app = test_app(Some(200.0));
        let car = spawn_vehicle(&mut app, true);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);

        for _ in 0..100 {
            app.update();
        }

        // One simulated second at 200 Hz, give or take the fixed-step remainder.
        let state = app.world().get::<VehicleState>(car).unwrap();
        assert_abs_diff_eq!(state.velocity, 5.0, epsilon = 0.05);
    }
}
