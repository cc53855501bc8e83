//! Load-Balancer Simulation Engine CLI
//!
//! ```bash
//! # T=1000, two servers weighted 0.4/0.6, lambda=1.5, buffers 5 and 10, mu 1.0 and 1.2
//! lb-sim 1000 2 0.4 0.6 1.5 5 10 1.0 1.2
//!
//! # Reproducible run with the full report as JSON
//! lb-sim --seed 42 --output report.json 1000 2 0.4 0.6 1.5 5 10 1.0 1.2
//! ```
//!
//! Prints `serviced dropped last_event_time avg_wait avg_service` on success.
//! Diagnostics and logs go to stderr.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lb_simulation_engine::{RngSource, SimulationConfig, Simulator};

#[derive(Parser, Debug)]
#[command(name = "lb-sim")]
#[command(about = "Simulate a probabilistic load balancer in front of bounded FIFO servers", long_about = None)]
struct Args {
    /// Seed for the random source (drawn from OS entropy if omitted)
    #[arg(short, long, env = "LB_SIM_SEED")]
    seed: Option<u64>,

    /// Output JSON file path for the full report (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// T M P_1..P_M lambda Q_1..Q_M mu_1..mu_M
    #[arg(value_name = "PARAMS", trailing_var_arg = true, allow_hyphen_values = true)]
    params: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lb_simulation_engine=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(line) = run(Args::parse())? {
        println!("{}", line);
    }
    Ok(())
}

/// Run one simulation and return the result line, or `None` when no
/// parameters were given
fn run(args: Args) -> anyhow::Result<Option<String>> {
    if args.params.is_empty() {
        return Ok(None);
    }

    let config = SimulationConfig::from_args(&args.params)
        .context("invalid simulation parameters")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    debug!(seed, "seeding random source");

    let report = Simulator::new(&config, RngSource::seeded(seed))?
        .with_seed(seed)
        .run()?;

    if let Some(output_path) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&output_path, json)
            .with_context(|| format!("failed to write report to {}", output_path.display()))?;
        debug!(path = %output_path.display(), "report saved");
    }

    Ok(Some(report.to_string()))
}
