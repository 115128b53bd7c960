use anyhow::Result;
use clap::Parser;
use tracing::info;

use sim::{load_config, run, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = args.apply(load_config(&args.config)?);
    info!(?cfg, "Sim config loaded");

    let summary = run(&cfg)?;
    info!(
        collisions = summary.collisions,
        hull_hits = summary.hull_hits,
        integrity = summary.final_health.integrity,
        energy = summary.final_health.total_energy,
        "Run complete"
    );
    Ok(())
}
