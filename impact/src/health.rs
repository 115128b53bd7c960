//! Hull integrity and battery bookkeeping for a mobile body.
//!
//! Every rate here is expressed per [`TIME_SCALE`] ticks, so a single frame
//! only nudges the stored values.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::math::range_value;

pub const TIME_SCALE: f32 = 10_000.0;
/// Minimum wall-clock gap between two damaging hits.
pub const HIT_COOLDOWN: Duration = Duration::from_millis(1000);
/// Hits below this energy never damage the hull.
pub const HIT_ENERGY_THRESHOLD: f32 = 0.5;
pub const HIT_DAMAGE_FACTOR: f32 = 0.01;
pub const BATTERY_LATCH_BELOW: f32 = 0.005;
pub const BATTERY_RELEASE_ABOVE: f32 = 0.025;
pub const IDLE_DRAW: f32 = 0.05;
const SURFACING_EFFICIENCY: f32 = 0.05;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealingMode {
    /// Repair while part of the hull is above the waterline.
    #[default]
    Surfacing,
    /// Declared for vent-dwelling bodies; yields no healing yet.
    ThermalVent,
    /// Declared for bodies hiding in plants; yields no healing yet.
    PlantCover,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyConsumption {
    pub thrust: f32,
    pub spray: f32,
    pub total: f32,
}

impl EnergyConsumption {
    pub fn from_controls(thrust: f32, spray: f32) -> Self {
        let (thrust, spray) = (thrust.abs(), spray.abs());
        Self { thrust, spray, total: ((thrust + spray) / 2.0 + IDLE_DRAW).min(1.0) }
    }
}

/// Per-tick inputs gathered by the motion step.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthInputs {
    pub outer_temperature: f32,
    pub outer_pressure: f32,
    pub thrust: f32,
    pub spray: f32,
    pub velocity: f32,
    pub rotation_momentum: f32,
    pub surrounding_risk: f32,
    pub energy_in: f32,
    pub out_of_water_area: u32,
    pub contour_area: u32,
}

/// Read-only view published with the body telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub integrity: f32,
    pub total_energy: f32,
    pub damage_rate: f32,
    pub heal_rate: f32,
    pub consumption: EnergyConsumption,
    pub internal_temperature: f32,
    pub outer_pressure: f32,
    pub battery_empty: bool,
}

#[derive(Debug, Clone)]
pub struct UnitHealth {
    integrity: f32,
    total_energy: f32,
    healing_mode: HealingMode,
    system_temperature: f32,
    /// `None` until the first hit, so a hit in the first second after spawn
    /// still lands. Hosts that want a spawn grace period seed it through
    /// [`UnitHealth::with_hit_cooldown_from`].
    last_hit: Option<Duration>,
    battery_empty: bool,
    damage_rate: f32,
    heal_rate: f32,
    consumption: EnergyConsumption,
    internal_temperature: f32,
    outer_pressure: f32,
}

impl UnitHealth {
    pub fn new(integrity: f32, total_energy: f32, healing_mode: HealingMode, system_temperature: f32) -> Self {
        let mut health = Self {
            integrity: integrity.clamp(0.0, 1.0),
            total_energy: total_energy.clamp(0.0, 1.0),
            healing_mode,
            system_temperature,
            last_hit: None,
            battery_empty: false,
            damage_rate: 0.0,
            heal_rate: 0.0,
            consumption: EnergyConsumption::default(),
            internal_temperature: system_temperature,
            outer_pressure: 1.0,
        };
        health.update_battery_latch();
        health
    }

    /// Start the hit cooldown at `spawned`, ignoring hits for the first
    /// [`HIT_COOLDOWN`] after it.
    pub fn with_hit_cooldown_from(mut self, spawned: Duration) -> Self {
        self.last_hit = Some(spawned);
        self
    }

    pub fn integrity(&self) -> f32 { self.integrity }
    pub fn total_energy(&self) -> f32 { self.total_energy }
    pub fn battery_empty(&self) -> bool { self.battery_empty }
    pub fn healing_mode(&self) -> HealingMode { self.healing_mode }

    /// A damaged hull sinks: `0` when intact, down to `-1` when destroyed.
    pub fn structural_buoyancy(&self) -> f32 {
        self.integrity - 1.0
    }

    /// Record a collision carrying `energy_added`. Returns whether the hull
    /// took damage. The cooldown clock restarts on every hit that lands
    /// outside the cooldown, damaging or not.
    pub fn register_hit(&mut self, energy_added: f32, now: Duration) -> bool {
        if let Some(last) = self.last_hit {
            if now.saturating_sub(last) <= HIT_COOLDOWN {
                return false;
            }
        }
        self.last_hit = Some(now);
        if energy_added <= HIT_ENERGY_THRESHOLD {
            return false;
        }
        self.integrity = (self.integrity - energy_added * HIT_DAMAGE_FACTOR).max(0.0);
        debug!(energy_added, integrity = self.integrity, "hull hit registered");
        true
    }

    /// Advance one tick.
    pub fn update(&mut self, inputs: &HealthInputs) {
        self.outer_pressure = inputs.outer_pressure;
        self.internal_temperature = internal_temperature(self.system_temperature, inputs.outer_temperature);
        self.consumption = EnergyConsumption::from_controls(inputs.thrust, inputs.spray);
        self.damage_rate = damage_rate(
            self.internal_temperature,
            inputs.surrounding_risk,
            inputs.velocity,
            inputs.rotation_momentum,
        );
        self.heal_rate = match self.healing_mode {
            HealingMode::Surfacing if inputs.contour_area > 0 => {
                inputs.out_of_water_area as f32 / inputs.contour_area as f32 * SURFACING_EFFICIENCY
            }
            _ => 0.0,
        };

        self.total_energy = (self.total_energy + (inputs.energy_in - self.consumption.total) / TIME_SCALE).clamp(0.0, 1.0);
        self.integrity = (self.integrity + (self.heal_rate - self.damage_rate) / TIME_SCALE).clamp(0.0, 1.0);
        self.update_battery_latch();
    }

    fn update_battery_latch(&mut self) {
        if !self.battery_empty && self.total_energy < BATTERY_LATCH_BELOW {
            self.battery_empty = true;
            info!(energy = self.total_energy, "battery empty");
        } else if self.battery_empty && self.total_energy > BATTERY_RELEASE_ABOVE {
            self.battery_empty = false;
            info!(energy = self.total_energy, "battery recovered");
        }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            integrity: self.integrity,
            total_energy: self.total_energy,
            damage_rate: self.damage_rate,
            heal_rate: self.heal_rate,
            consumption: self.consumption,
            internal_temperature: self.internal_temperature,
            outer_pressure: self.outer_pressure,
            battery_empty: self.battery_empty,
        }
    }
}

/// Hotter surroundings weigh more heavily than the electronics' own heat.
pub fn internal_temperature(system: f32, outer: f32) -> f32 {
    if outer > system {
        (system + outer * 1.5) / 2.0
    } else {
        (system + outer) / 2.0
    }
}

/// Damage per [`TIME_SCALE`] ticks from overheating and risky motion.
pub fn damage_rate(internal_temperature: f32, risk: f32, velocity: f32, rotation_momentum: f32) -> f32 {
    let heat = if internal_temperature > 80.0 {
        range_value(internal_temperature.min(200.0), 80.0, 200.0, 0.0, 1.0)
    } else {
        0.0
    };
    let motion = risk * (velocity.abs() + rotation_momentum.abs()) / 2.0 * 0.2;
    0.5 * (heat + motion)
}
