mod scenario;

use clap::Parser;
use log::*;
use scenario::*;
use squadron::config::Settings;
use squadron::logging;
use squadron::sim::Sandbox;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squadron-sim", about = "Replay a squad scenario in the sandbox")]
struct Args {
    /// Scenario file to replay.
    #[arg(short, long, default_value = "scenarios/skirmish.json")]
    scenario: PathBuf,

    /// Settings file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(short, long, default_value_t = 120)]
    ticks: u32,

    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.25)]
    dt: f64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    logging::setup_logging(logging::verbosity_from_count(args.verbose))
        .map_err(|err| format!("Failed to set up logging: {}", err))?;

    let settings = match &args.config {
        Some(path) => Settings::load(path).map_err(|err| format!("Failed to load settings: {}", err))?,
        None => Settings::default(),
    };

    info!("Loading scenario {}...", args.scenario.display());
    let scenario = load_scenario(&args.scenario)?;
    info!("Finished loading scenario: {}", scenario.description);

    let mut sandbox = Sandbox::new(settings);
    scenario.spawn_agents(&mut sandbox);

    info!("Simulating {} ticks of {}s...", args.ticks, args.dt);

    for tick in 0..args.ticks {
        scenario.apply_tick(&mut sandbox, tick)?;
        sandbox.tick(args.dt);
    }

    info!("Simulation complete at {:.2}s", sandbox.elapsed_seconds());

    for notification in sandbox.notifications() {
        debug!("Notification: {}", notification.message);
    }

    let report = serde_json::to_string_pretty(&sandbox.snapshots()).map_err(|err| format!("Failed to serialize snapshots: {}", err))?;

    println!("{}", report);

    Ok(())
}
