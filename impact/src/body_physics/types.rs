use serde::{Deserialize, Serialize};

use crate::grid::{CellRange, EntityId};
use crate::health::HealthSnapshot;
use crate::math::{Vec2f, Vec2i};
use crate::CellProps;

/// Scalars sampled from the pilot once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Forward/backward drive in `[-1, 1]`.
    pub thrust: f32,
    /// Steering jets in `[-1, 1]`; positive turns counter-clockwise.
    pub spray: f32,
    /// Ballast tank fill in percent; `50` is neutral.
    pub ballast_fill: f32,
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self { thrust: 0.0, spray: 0.0, ballast_fill: 50.0 }
    }
}

impl ControlInputs {
    pub fn clamped(self) -> Self {
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            thrust: finite(self.thrust, 0.0).clamp(-1.0, 1.0),
            spray: finite(self.spray, 0.0).clamp(-1.0, 1.0),
            ballast_fill: finite(self.ballast_fill, 50.0).clamp(0.0, 100.0),
        }
    }

    /// Ballast contribution to buoyancy: `+1` with empty tanks, `-1` full.
    pub fn ballast_buoyancy(&self) -> f32 {
        2.0 * (50.0 - self.ballast_fill) / 100.0
    }
}

/// Pose, momenta and last-tick aggregates of a mobile body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Centre of the body in world pixels.
    pub position: Vec2f,
    /// Degrees in `[0, 360)`, counter-clockwise on screen.
    pub heading: f32,
    pub velocity: f32,
    pub rotation_momentum: f32,
    pub buoyancy_momentum: f32,
    pub resistance_passable: f32,
    pub resistance_nonpassable: f32,
    pub surrounding_temp: f32,
    pub surrounding_risk: f32,
    pub mean_force: f32,
    /// Hull pixels above the waterline, refreshed while near the surface.
    pub out_of_water_area: u32,
}

impl BodyState {
    pub fn at(position: Vec2f, heading: f32) -> Self {
        Self { position, heading, ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    Terrain { col: u32, row: u32 },
    Occupant(EntityId),
}

/// One overlap found during an impact pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World pixel of the first shared pixel.
    pub point: Vec2i,
    pub props: CellProps,
    pub source: ContactSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactOutcome {
    /// Pose committed, `surface_nudges` pixels pushed down by the surface clamp.
    Moved { surface_nudges: u32 },
    /// Bounced; pose unchanged.
    Collided { off_map: bool, hull_damaged: bool },
}

impl ImpactOutcome {
    pub fn collided(&self) -> bool {
        matches!(self, ImpactOutcome::Collided { .. })
    }
}

/// Telemetry for one motion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub outcome: ImpactOutcome,
    pub depth: f32,
    pub pressure: f32,
    pub distance: f32,
    pub energy_in: f32,
    pub health: HealthSnapshot,
}

/// Optional per-tick feed for renderers and debugging tools.
#[derive(Debug, Clone, Default)]
pub struct ImpactDebug {
    pub window: Option<CellRange>,
    pub contacts: Vec<Contact>,
    /// Cells in the window holding non-passable terrain.
    pub solid_cells: Vec<(u32, u32)>,
    pub next_position: Vec2f,
    pub next_heading: f32,
    pub off_map: bool,
    pub buoyancy: f32,
    pub resistance_effect: f32,
    pub solar_energy: f32,
    pub thermal_energy: f32,
}
