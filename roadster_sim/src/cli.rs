use clap::Parser;
use std::path::PathBuf;

/// Roadster: a headless, frame-stepped ground vehicle simulator.
///
/// This struct defines the command-line arguments accepted by the `roadster`
/// binary. Values given here override the scenario file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/00_figure_eight.toml")]
    pub scenario: PathBuf,

    /// Root of the vehicle prefab catalog.
    #[arg(short, long, default_value = "assets/catalog")]
    pub catalog: PathBuf,

    /// Override the run length, in simulated seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Step the vehicles at a fixed rate (Hz) instead of once per frame.
    #[arg(long)]
    pub fixed_hz: Option<f64>,

    /// Write one JSON telemetry record per vehicle per frame to this file.
    #[arg(short, long)]
    pub telemetry: Option<PathBuf>,

    /// Log filter passed to the logger, e.g. `info` or `warn,roadster_sim=trace`.
    #[arg(long, default_value = "info,roadster_sim=debug,roadster_core=debug")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_assets() {
        let cli = Cli::parse_from(["roadster"]);
        assert_eq!(
            cli.scenario,
            PathBuf::from("assets/scenarios/00_figure_eight.toml")
        );
        assert_eq!(cli.catalog, PathBuf::from("assets/catalog"));
        assert!(cli.duration.is_none());
        assert!(cli.fixed_hz.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
