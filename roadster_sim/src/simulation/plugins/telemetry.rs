// roadster_sim/src/simulation/plugins/telemetry.rs

//! Periodic log summaries and an optional JSON-lines record stream.

use crate::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Height of a wheel's load indicator per newton of normal force.
pub const LOAD_INDICATOR_SCALE: f64 = 0.0005;

/// Indicator heights for `[FL, FR, RL, RR]`.
pub fn indicator_heights(corners: &CornerLoads) -> [f64; 4] {
    corners.as_array().map(|load| load * LOAD_INDICATOR_SCALE)
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry write failed: {0}")]
    Io(#[from] io::Error),
    #[error("telemetry record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of the telemetry stream.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord<'a> {
    pub time: f64,
    pub vehicle: &'a str,
    pub controls: &'a ControlInput,
    pub state: &'a VehicleState,
    pub loads: &'a DerivedLoads,
    pub indicator_heights: [f64; 4],
}

/// Destination of telemetry records. Disabled unless a writer is attached.
#[derive(Resource, Default)]
pub struct TelemetrySink {
    writer: Option<Box<dyn Write + Send + Sync>>,
    records: u64,
}

impl TelemetrySink {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn from_writer(writer: impl Write + Send + Sync + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            records: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub fn write_record(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TelemetryError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn disable(&mut self) {
        self.writer = None;
    }
}

/// Simulated time of the next human-readable summary.
#[derive(Resource, Debug, Default)]
struct SummaryClock {
    next_at: f64,
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScenarioConfig>()
            .init_resource::<TelemetrySink>()
            .init_resource::<SummaryClock>()
            .add_systems(
                PostUpdate,
                (record_telemetry, log_summary)
                    .in_set(SimulationSet::Telemetry)
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(
                OnEnter(AppState::Finished),
                flush_telemetry.in_set(FinishSet::Report),
            );
    }
}

fn record_telemetry(
    time: Res<Time>,
    mut sink: ResMut<TelemetrySink>,
    query: Query<(&Name, &ControlInput, &VehicleState, &DerivedLoads)>,
) {
    if !sink.is_enabled() {
        return;
    }
    let t = time.elapsed_secs_f64();
    for (name, controls, state, loads) in &query {
        let record = TelemetryRecord {
            time: t,
            vehicle: name.as_str(),
            controls,
            state,
            loads,
            indicator_heights: indicator_heights(&loads.corners),
        };
        if let Err(e) = sink.write_record(&record) {
            error!("{}. Telemetry output disabled.", e);
            sink.disable();
            return;
        }
    }
}

fn log_summary(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    mut clock: ResMut<SummaryClock>,
    query: Query<(&Name, &VehicleState, &DerivedLoads)>,
) {
    let t = time.elapsed_secs_f64();
    if t < clock.next_at {
        return;
    }
    let every = config.telemetry.log_every_seconds;
    clock.next_at = ((t / every).floor() + 1.0) * every;

    for (name, state, loads) in &query {
        info!(
            "[{}] t={:.2}s pos=({:.2}, {:.2}) heading={:.1}deg v={:.2}m/s steer={:.1}deg \
             a_lat={:.2}m/s^2 Fz F/R={:.0}/{:.0}N",
            name,
            t,
            state.position.x,
            state.position.z,
            state.heading.to_degrees(),
            state.velocity,
            state.steer_angle.to_degrees(),
            loads.lateral_acceleration,
            loads.front_axle,
            loads.rear_axle
        );
    }
}

fn flush_telemetry(mut sink: ResMut<TelemetrySink>) {
    if !sink.is_enabled() {
        return;
    }
    match sink.flush() {
        Ok(()) => info!("Telemetry flushed ({} records).", sink.records_written()),
        Err(e) => error!("{}", e),
    }
}
