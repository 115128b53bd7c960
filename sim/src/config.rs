use std::path::Path;

use anyhow::{Context, Result};
use impact::{BodySpec, WorldSpec};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pilot::PilotSegment;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ticks: u64,
    pub tick_rate_hz: u32,
    /// Emit a telemetry line every this many ticks; `0` disables it.
    pub log_every: u64,
    pub seed: u64,
    pub realtime: bool,
    pub world: WorldSpec,
    /// Spawn column of the submersible in pixels; the world's centre when unset.
    pub spawn_x: Option<f32>,
    /// Free-swimming fish sharing the water with the submersible.
    pub fish: u32,
    pub pilot: Vec<PilotSegment>,
    pub body: BodyOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks: 3600,
            tick_rate_hz: 60,
            log_every: 60,
            seed: 7,
            realtime: false,
            world: WorldSpec::default(),
            spawn_x: None,
            fish: 3,
            pilot: vec![
                PilotSegment { ticks: 240, thrust: 1.0, spray: 0.0, ballast: 50.0 },
                PilotSegment { ticks: 120, thrust: 0.6, spray: 0.5, ballast: 60.0 },
                PilotSegment { ticks: 600, thrust: 1.0, spray: 0.0, ballast: 75.0 },
                PilotSegment { ticks: 240, thrust: 0.0, spray: -0.3, ballast: 20.0 },
            ],
            body: BodyOverrides::default(),
        }
    }
}

/// Optional per-run tweaks layered over the body preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOverrides {
    pub mass: Option<f32>,
    pub speed_resolution: Option<f32>,
    pub rotation_resolution: Option<f32>,
    pub initial_energy: Option<f32>,
    pub initial_integrity: Option<f32>,
    pub spawn_depth: Option<f32>,
}

impl BodyOverrides {
    pub fn apply(&self, mut spec: BodySpec) -> BodySpec {
        if let Some(v) = self.mass {
            spec.mass = v;
        }
        if let Some(v) = self.speed_resolution {
            spec.speed_resolution = v;
        }
        if let Some(v) = self.rotation_resolution {
            spec.rotation_resolution = v;
        }
        if let Some(v) = self.initial_energy {
            spec.initial_energy = v;
        }
        if let Some(v) = self.initial_integrity {
            spec.initial_integrity = v;
        }
        if let Some(v) = self.spawn_depth {
            spec.spawn_depth = v;
        }
        spec
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_config(text: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(text)?;
    anyhow::ensure!(cfg.tick_rate_hz > 0, "tick_rate_hz must be positive");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = parse_config(
            r#"
            ticks = 10
            [world]
            cols = 50
            [body]
            mass = 12.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ticks, 10);
        assert_eq!(cfg.tick_rate_hz, 60);
        assert_eq!(cfg.world.cols, 50);
        assert_eq!(cfg.world.rows, WorldSpec::default().rows);
        assert_eq!(cfg.body.mass, Some(12.5));
        assert!(!cfg.pilot.is_empty());
    }

    #[test]
    fn pilot_segments_parse_with_neutral_ballast_default() {
        let cfg = parse_config(
            r#"
            [[pilot]]
            ticks = 30
            thrust = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.pilot.len(), 1);
        assert_eq!(cfg.pilot[0].ballast, 50.0);
        assert_eq!(cfg.pilot[0].spray, 0.0);
    }

    #[test]
    fn zero_tick_rate_rejected() {
        assert!(parse_config("tick_rate_hz = 0").is_err());
        assert!(parse_config("ticks = \"many\"").is_err());
    }

    #[test]
    fn overrides_layer_over_preset() {
        let o = BodyOverrides { mass: Some(40.0), spawn_depth: Some(10.0), ..Default::default() };
        let spec = o.apply(impact::subspecs::sub20_spec());
        assert_eq!(spec.mass, 40.0);
        assert_eq!(spec.spawn_depth, 10.0);
        assert_eq!(spec.speed_resolution, 5.0);
    }
}
