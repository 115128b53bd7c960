use std::path::PathBuf;

use clap::Parser;

use crate::Config;

#[derive(Parser, Debug, Clone)]
#[command(name = "sim")]
#[command(about = "Headless host for the underwater impact simulation", long_about = None)]
pub struct Args {
    /// Path to the TOML config; defaults apply when the file is missing
    #[arg(long, default_value = "sim.toml")]
    pub config: PathBuf,
    /// Override the number of ticks to run
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Override the RNG seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Pace ticks against the wall clock and read controls from the pilot thread
    #[arg(long, default_value_t = false)]
    pub realtime: bool,
}

impl Args {
    /// Command-line values win over the config file.
    pub fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ticks) = self.ticks {
            cfg.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        cfg.realtime |= self.realtime;
        cfg
    }
}
