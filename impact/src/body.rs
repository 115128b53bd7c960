use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::body_physics::{step_body, step_body_dbg, BodyState, ControlInputs, ImpactDebug, StepReport};
use crate::grid::EntityId;
use crate::health::UnitHealth;
use crate::mask::{Mask, ShapeId};
use crate::math::{PixelRect, Vec2f};
use crate::sub_specs::BodySpec;
use crate::world::World;
use crate::{CellProps, WorldError};

const PROBE_RADIUS: u32 = 5;

/// A submersible or free-swimming organism driven by control inputs.
#[derive(Debug, Clone)]
pub struct MobileBody {
    pub(crate) spec: BodySpec,
    pub(crate) shape: ShapeId,
    pub(crate) contour_area: u32,
    pub(crate) probe: Mask,
    pub(crate) spawn: Vec2f,
    pub(crate) occupant: Option<EntityId>,
    pub(crate) state: BodyState,
    pub(crate) health: UnitHealth,
}

impl MobileBody {
    /// Spawn `spec.spawn_depth` pixels below the waterline at column `x`.
    pub fn spawn(world: &mut World, spec: BodySpec, x: f32) -> Result<Self, WorldError> {
        let y = world.environment.spec.surface.waterline + spec.spawn_depth;
        Self::spawn_at(world, spec, Vec2f::new(x, y))
    }

    pub fn spawn_at(world: &mut World, spec: BodySpec, position: Vec2f) -> Result<Self, WorldError> {
        spec.validate()?;
        let contour = spec.hull.build_mask();
        let contour_area = contour.count();
        let shape = world.shapes.insert(contour);
        let health = UnitHealth::new(
            spec.initial_integrity,
            spec.initial_energy,
            spec.healing_mode,
            world.environment.spec.system_temperature,
        );
        info!(x = position.x, y = position.y, mass = spec.mass, "mobile body spawned");
        Ok(Self {
            spec,
            shape,
            contour_area,
            probe: Mask::circle(PROBE_RADIUS),
            spawn: position,
            occupant: None,
            state: BodyState::at(position, 0.0),
            health,
        })
    }

    /// Make the body visible to other bodies' impact passes. Its own pass
    /// skips this registration.
    pub fn register_as_occupant(
        &mut self,
        world: &mut World,
        label: &str,
        props: CellProps,
    ) -> Result<EntityId, WorldError> {
        if let Some(id) = self.occupant {
            return Err(WorldError::DuplicateOccupant(id));
        }
        let mask = world.shapes.rotated(self.shape, self.state.heading).ok_or(WorldError::UnknownShape(self.shape.0))?;
        let top_left = PixelRect::centered_at(self.state.position, mask.size()).min;
        let id = world.population.spawn(&mut world.grid, label, mask, top_left, props)?;
        self.occupant = Some(id);
        Ok(id)
    }

    pub fn step(&mut self, world: &mut World, inputs: ControlInputs, now: Duration) -> Result<StepReport, WorldError> {
        step_body(world, self, inputs, now)
    }

    pub fn step_dbg(
        &mut self,
        world: &mut World,
        inputs: ControlInputs,
        now: Duration,
        dbg: &mut ImpactDebug,
    ) -> Result<StepReport, WorldError> {
        step_body_dbg(world, self, inputs, now, Some(dbg))
    }

    /// Back to the spawn point, level. Momenta are kept.
    pub fn reset_position(&mut self, world: &mut World) -> Result<(), WorldError> {
        self.state.position = self.spawn;
        self.state.heading = 0.0;
        if let Some(id) = self.occupant {
            let mask: Arc<Mask> = world.shapes.get(self.shape).cloned().ok_or(WorldError::UnknownShape(self.shape.0))?;
            let top_left = PixelRect::centered_at(self.spawn, mask.size()).min;
            world.population.relocate(&mut world.grid, id, top_left, Some(mask))?;
        }
        Ok(())
    }

    pub fn state(&self) -> &BodyState { &self.state }
    pub fn health(&self) -> &UnitHealth { &self.health }
    pub fn spec(&self) -> &BodySpec { &self.spec }
    pub fn shape(&self) -> ShapeId { self.shape }
    pub fn contour_area(&self) -> u32 { self.contour_area }
    pub fn spawn_point(&self) -> Vec2f { self.spawn }
    pub fn occupant_id(&self) -> Option<EntityId> { self.occupant }
}
