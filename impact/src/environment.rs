//! Ambient world: water bands, the air/surface layer and energy sources.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::mask::Mask;
use crate::math::{range_value, PixelRect, Vec2f, Vec2i};

/// A horizontal layer of water starting at pixel row `top`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterBand {
    pub top: f32,
    /// Thickness in pixels; `None` extends to the bottom of the world.
    pub depth: Option<f32>,
    pub temperature: f32,
    pub min_temperature: f32,
    pub max_temperature: f32,
}

impl WaterBand {
    pub fn total_depth(&self) -> f32 {
        self.top + self.depth.unwrap_or(f32::INFINITY)
    }
}

/// Geometry of the air layer above the waterline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSpec {
    /// Mean pixel row of the water surface.
    pub waterline: f32,
    /// Height of the air mask above the waterline.
    pub air_height: u32,
    pub wave_amplitude: f32,
    pub wave_length: f32,
    /// Surface probing only runs while the body is less than this many
    /// pixels below the waterline.
    pub probe_gate_depth: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub shallow: WaterBand,
    pub deep: WaterBand,
    pub surface: SurfaceSpec,
    /// Temperature of the host electronics; feeds the body's internal temperature.
    pub system_temperature: f32,
    pub drift_interval_ms: u64,
    pub drift_step: u32,
    pub solar_efficiency: f32,
    pub underwater_solar_factor: f32,
    /// Solar gain only reaches this many pixels past the bottom of the shallow band.
    pub solar_gate_margin: f32,
    pub thermal_efficiency: f32,
}

/// Runtime environment built from an [`EnvironmentSpec`] for a given world width.
#[derive(Debug)]
pub struct Environment {
    pub spec: EnvironmentSpec,
    air_mask: Arc<Mask>,
    air_top: i32,
    last_drift: Option<Duration>,
}

impl Environment {
    pub fn new(spec: EnvironmentSpec, world_width: u32) -> Self {
        let s = &spec.surface;
        let air_top = (s.waterline - s.air_height as f32).floor() as i32;
        let (amp, len, waterline) = (s.wave_amplitude, s.wave_length.max(1.0), s.waterline);
        // crests reach below the mean waterline
        let height = s.air_height + amp.abs().ceil() as u32;
        let air_mask = Mask::from_fn(world_width, height, |x, y| {
            let wave = amp * (x as f32 / len * std::f32::consts::TAU).sin();
            ((air_top + y as i32) as f32) < waterline + wave
        });
        Self { spec, air_mask: Arc::new(air_mask), air_top, last_drift: None }
    }

    pub fn air_mask(&self) -> &Arc<Mask> { &self.air_mask }
    pub fn air_top(&self) -> i32 { self.air_top }

    /// Row below which surface probing is skipped.
    pub fn floating_check_start_from(&self) -> f32 {
        self.spec.surface.waterline + self.spec.surface.probe_gate_depth
    }

    /// Ambient water temperature for a pixel row: shallow band, deep band,
    /// or `0` above the water.
    pub fn water_temp_at(&self, y: f32) -> f32 {
        if y > self.spec.shallow.top {
            if y > self.spec.deep.top {
                self.spec.deep.temperature
            } else {
                self.spec.shallow.temperature
            }
        } else {
            0.0
        }
    }

    /// Pixels of `mask` (placed at `rect`) that sit in the air.
    pub fn out_of_water_area(&self, mask: &Mask, rect: PixelRect) -> u32 {
        self.air_mask.overlap_area(mask, rect.min - Vec2i::new(0, self.air_top))
    }

    /// Whether a probe mask centred on `center` touches the air.
    pub fn probe_in_air(&self, probe: &Mask, center: Vec2f) -> bool {
        let rect = PixelRect::centered_at(center, probe.size());
        self.air_mask.overlap(probe, rect.min - Vec2i::new(0, self.air_top)).is_some()
    }

    /// Energy gained from sunlight, `[0, 1]`.
    pub fn solar_energy(&self, pos_y: f32, out_of_water_area: u32, contour_area: u32) -> f32 {
        let spec = &self.spec;
        if pos_y > spec.shallow.total_depth() + spec.solar_gate_margin {
            return 0.0;
        }
        let mut gain = 0.0;
        if contour_area > 0 && out_of_water_area > 0 {
            gain = spec.solar_efficiency * out_of_water_area as f32 / contour_area as f32;
        }
        gain += spec.shallow.top / pos_y.max(1.0) * spec.solar_efficiency * spec.underwater_solar_factor;
        gain.min(1.0)
    }

    /// Energy harvested from hot surroundings, rising linearly inside the
    /// open band 50°..200°. Outside it the harvester yields nothing.
    pub fn thermal_energy(&self, surrounding_temp: f32) -> f32 {
        if surrounding_temp <= 50.0 || surrounding_temp >= 200.0 {
            return 0.0;
        }
        range_value(surrounding_temp, 50.0, 200.0, 0.0, 1.0) * self.spec.thermal_efficiency
    }

    /// Random-walk the band temperatures once per drift interval.
    pub fn drift(&mut self, now: Duration, rng: &mut impl Rng) {
        let interval = Duration::from_millis(self.spec.drift_interval_ms);
        match self.last_drift {
            Some(last) if now.saturating_sub(last) <= interval => return,
            None => {
                self.last_drift = Some(now);
                return;
            }
            _ => {}
        }
        let step = self.spec.drift_step;
        for band in [&mut self.spec.shallow, &mut self.spec.deep] {
            band.temperature = random_value_change(rng, band.temperature, band.min_temperature, band.max_temperature, step);
        }
        trace!(shallow = self.spec.shallow.temperature, deep = self.spec.deep.temperature, "water temperature drift");
        self.last_drift = Some(now);
    }
}

fn random_value_change(rng: &mut impl Rng, value: f32, min: f32, max: f32, max_step: u32) -> f32 {
    let up = rng.gen_bool(0.5);
    let change = rng.gen_range(0..=max_step) as f32;
    let mut v = value;
    if up && v < max {
        v += change;
    } else if !up && v > min {
        v -= change;
    }
    v.clamp(min, max)
}

/// Depth in metres (100 px = 10 m, surface offset 40 m), never negative.
pub fn depth_from_pixels(y: f32) -> f32 {
    (y / 10.0 - 40.0).max(0.0)
}

/// Horizontal distance in metres from the left edge of the world.
pub fn distance_from_pixels(x: f32) -> f32 {
    (x / 10.0).max(0.0)
}

/// Pressure in atmospheres.
pub fn pressure_from_depth(depth: f32) -> f32 {
    1.0 + depth / 10.0
}
