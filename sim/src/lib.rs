//! Headless host for the impact physics: loads a TOML scenario, builds the
//! trench world and drives a piloted submersible plus a few fish through it.

mod args;
mod config;
pub mod pilot;
mod runner;

pub use args::Args;
pub use config::{load_config, parse_config, BodyOverrides, Config};
pub use runner::{run, RunSummary};
