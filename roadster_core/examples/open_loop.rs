// roadster_core/examples/open_loop.rs

//! Drives the integrator directly, without any host engine.
//!
//! Accelerates for three seconds, holds a left turn for three more, then
//! brakes into reverse, printing the state and axle loads twice a second.
//!
//! To run this example:
//! `cargo run -p roadster_core --example open_loop`

use roadster_core::prelude::*;

fn main() -> Result<(), ParamError> {
    let model = VehicleIntegrator::new(VehicleParameters::default(), DriveTuning::default())?;
    let mapper = InputMapper;

    let dt = 0.016;
    let mut state = VehicleState::default();
    let mut t = 0.0;

    println!("    t      x       z    heading      v    steer   Fz front   Fz rear");
    for frame in 0..(10.0 / dt) as usize {
        let raw = RawControls::from_buttons(t < 3.0, t >= 6.0, (3.0..6.0).contains(&t), false, false);
        let loads = model.step_in_place(&mut state, mapper.map(&raw), dt);
        t += dt;

        if frame % 31 == 0 {
            println!(
                "{:5.2} {:7.2} {:7.2} {:8.1}° {:6.2} {:7.2}° {:9.1} {:9.1}",
                t,
                state.position.x,
                state.position.z,
                state.heading.to_degrees(),
                state.velocity,
                state.steer_angle.to_degrees(),
                loads.front_axle,
                loads.rear_axle
            );
        }
    }
    Ok(())
}
