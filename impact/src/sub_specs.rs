use serde::{Deserialize, Serialize};

use crate::health::HealingMode;
use crate::mask::Mask;
use crate::window::WindowSize;
use crate::WorldError;

/// Silhouette used as the body's contour mask; an ellipse inscribed in
/// `width x height` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullSpec {
    pub width: u32,
    pub height: u32,
}

impl HullSpec {
    pub fn build_mask(&self) -> Mask {
        let (a, b) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        Mask::from_fn(self.width, self.height, |x, y| {
            let dx = (x as f32 + 0.5 - a) / a;
            let dy = (y as f32 + 0.5 - b) / b;
            dx * dx + dy * dy <= 1.0
        })
    }
}

/// Tunable parameters for one class of mobile body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySpec {
    pub mass: f32,
    pub speed_resolution: f32,
    pub rotation_resolution: f32,
    /// Passed to the buoyancy integrator, which does not use it.
    pub buoyancy_resolution: f32,
    pub window: WindowSize,
    pub hull: HullSpec,
    pub initial_energy: f32,
    pub initial_integrity: f32,
    pub healing_mode: HealingMode,
    /// Spawn point, in pixels below the waterline.
    pub spawn_depth: f32,
    /// Upper bound on one-pixel nudges of the surface clamp per tick.
    pub max_surface_nudges: u32,
}

impl BodySpec {
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(WorldError::InvalidMass(self.mass));
        }
        for (field, value) in [
            ("initial_energy", self.initial_energy),
            ("initial_integrity", self.initial_integrity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorldError::InvalidProps { field, value, expected: "within [0, 1]" });
            }
        }
        for (field, value) in [
            ("speed_resolution", self.speed_resolution),
            ("rotation_resolution", self.rotation_resolution),
            ("buoyancy_resolution", self.buoyancy_resolution),
        ] {
            if !value.is_finite() {
                return Err(WorldError::InvalidProps { field, value, expected: "finite" });
            }
        }
        if self.hull.width == 0 || self.hull.height == 0 {
            return Err(WorldError::InvalidProps {
                field: "hull",
                value: self.hull.width.min(self.hull.height) as f32,
                expected: "non-empty hull",
            });
        }
        Ok(())
    }
}

pub mod subspecs {
    use super::*;

    // Two-seat research submersible; the default player body.
    pub fn sub20_spec() -> BodySpec {
        BodySpec {
            mass: 20.0,
            speed_resolution: 5.0,
            rotation_resolution: 1.0,
            buoyancy_resolution: 1.0,
            window: WindowSize { cols: 12, rows: 12 },
            hull: HullSpec { width: 350, height: 150 },
            initial_energy: 0.4,
            initial_integrity: 1.0,
            healing_mode: HealingMode::Surfacing,
            spawn_depth: 150.0,
            max_surface_nudges: 512,
        }
    }

    // Small reef fish; light and agile, hides in kelp.
    pub fn fish_spec() -> BodySpec {
        BodySpec {
            mass: 5.0,
            speed_resolution: 3.0,
            rotation_resolution: 2.0,
            buoyancy_resolution: 1.0,
            window: WindowSize { cols: 4, rows: 4 },
            hull: HullSpec { width: 48, height: 20 },
            initial_energy: 1.0,
            initial_integrity: 1.0,
            healing_mode: HealingMode::PlantCover,
            spawn_depth: 300.0,
            max_surface_nudges: 128,
        }
    }
}
