//! Headless harness that replays signal scenarios against the reconciler.

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scenario::ScenarioRunner;

#[derive(Debug, Parser)]
#[command(name = "shellbar-host", about = "Replay a signal scenario against the shellbar reconciler")]
struct Cli {
	/// Scenario file (JSON array of steps) to replay.
	#[arg(long)]
	scenario: PathBuf,

	/// Emit the report as JSON instead of the human summary.
	#[arg(long)]
	json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let contents = std::fs::read_to_string(&cli.scenario)
		.with_context(|| format!("failed to read scenario {}", cli.scenario.display()))?;
	let steps = scenario::parse(&contents)
		.with_context(|| format!("failed to parse scenario {}", cli.scenario.display()))?;

	let report = ScenarioRunner::new().run(&steps).await;

	if cli.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		println!("steps applied:      {}", report.steps_applied);
		println!("session live:       {}", report.session_live);
		println!("user unlocked:      {}", report.unlocked);
		match report.reported_status {
			Some(status) => println!("reported status:    visible={} stashed={}", status.visible, status.stashed),
			None => println!("reported status:    (none)"),
		}
		println!("controller attaches: {}", report.controller_attach_count);
		println!("compositor log ({} entries):", report.notifications.len());
		for status in &report.notifications {
			println!("  visible={} stashed={}", status.visible, status.stashed);
		}
	}

	Ok(())
}
