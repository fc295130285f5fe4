// roadster_sim/src/simulation/plugins/driver.rs

//! Plays a scenario's `[[script]]` back on the keyboard state, standing in for
//! a human at the keys.

use crate::prelude::*;
use std::collections::HashSet;

/// The timed key presses of the current scenario.
#[derive(Resource, Debug, Default, Clone)]
pub struct DriverScript(pub Vec<ScriptSegment>);

impl DriverScript {
    /// Controls held down at simulated time `t`.
    pub fn active_controls(&self, t: f64) -> HashSet<ControlKey> {
        self.0
            .iter()
            .filter(|segment| segment.is_active(t))
            .flat_map(|segment| segment.controls.iter().copied())
            .collect()
    }
}

pub struct ScriptedDriverPlugin;

impl Plugin for ScriptedDriverPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DriverScript>() {
            let script = app
                .world()
                .get_resource::<ScenarioConfig>()
                .map(|config| config.script.clone())
                .unwrap_or_default();
            app.insert_resource(DriverScript(script));
        }

        app.init_resource::<ButtonInput<KeyCode>>().add_systems(
            PreUpdate,
            drive_script
                .in_set(SimulationSet::Driver)
                .run_if(in_state(AppState::Running)),
        );
    }
}

/// Presses the keys of every active control and releases the rest.
fn drive_script(
    time: Res<Time>,
    script: Res<DriverScript>,
    mut keys: ResMut<ButtonInput<KeyCode>>,
) {
    let t = time.elapsed_secs_f64();
    let active = script.active_controls(t);

    keys.clear();
    for control in ControlKey::ALL {
        // The first binding is the one the script uses.
        let Some(&code) = control.key_codes().first() else {
            continue;
        };
        if active.contains(&control) {
            if !keys.pressed(code) {
                debug!("Script: {:?} down at t = {:.3} s", control, t);
            }
            keys.press(code);
        } else if keys.pressed(code) {
            debug!("Script: {:?} up at t = {:.3} s", control, t);
            keys.release(code);
        }
    }
}
