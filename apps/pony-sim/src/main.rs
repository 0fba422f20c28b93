//! Plays scripted pony scenarios on the command line.
//!
//! ```text
//! pony-sim --scenario shake
//! pony-sim --scenario all --real-time --config pony.toml
//! RUST_LOG=ponyboop_core=debug pony-sim --scenario boop-burst
//! ```

mod config_file;
mod scenario;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::scenario::{play, Driver, Scenario, Script};

#[derive(Debug, Parser)]
#[command(name = "pony-sim")]
#[command(about = "Simulate a desktop pony against a scripted host window")]
struct Cli {
    /// TOML file overriding the default pony configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sleep through the scenario on the wall clock instead of skipping ahead.
    #[arg(long)]
    real_time: bool,
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = config_file::load(cli.config.as_deref())?;
    log::debug!("using {config:?}");

    let driver = Driver::new(cli.real_time);
    for &scenario in cli.scenario.expand() {
        println!("=== {scenario:?} ===");
        let script = Script::for_scenario(scenario, &config);
        let outcome = play(scenario, &script, &config, &driver);
        println!(
            "--- {} render update(s), {} shake event(s)",
            outcome.renders.len(),
            outcome.shakes.len()
        );
    }
    Ok(())
}
