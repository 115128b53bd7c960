//! Registry of organisms and other bodies that occupy grid cells.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::grid::{EntityId, WorldGrid};
use crate::mask::Mask;
use crate::math::{PixelRect, Vec2i};
use crate::{CellProps, WorldError};

/// A life unit (plant, shellfish, fish, or a registered mobile body).
#[derive(Debug, Clone)]
pub struct LifeUnit {
    pub id: EntityId,
    pub label: String,
    pub mask: Arc<Mask>,
    pub top_left: Vec2i,
    pub props: CellProps,
}

impl LifeUnit {
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.top_left, self.mask.size())
    }
}

/// Owns every life unit and keeps the grid's occupant index in step.
#[derive(Debug, Default)]
pub struct Population {
    units: BTreeMap<EntityId, LifeUnit>,
    next_id: u32,
}

impl Population {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, id: EntityId) -> Option<&LifeUnit> { self.units.get(&id) }

    pub fn iter(&self) -> impl Iterator<Item = &LifeUnit> { self.units.values() }

    pub fn len(&self) -> usize { self.units.len() }
    pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// Register a new unit covering every cell its bounding box touches.
    pub fn spawn(
        &mut self,
        grid: &mut WorldGrid,
        label: impl Into<String>,
        mask: Arc<Mask>,
        top_left: Vec2i,
        props: CellProps,
    ) -> Result<EntityId, WorldError> {
        props.validate()?;
        let id = EntityId(self.next_id);
        let unit = LifeUnit { id, label: label.into(), mask, top_left, props };
        let cells = grid.covered_cells(unit.rect()).ok_or(WorldError::CellOutOfRange {
            col: top_left.x.max(0) as u32 / grid.cell_size(),
            row: top_left.y.max(0) as u32 / grid.cell_size(),
            cols: grid.cols(),
            rows: grid.rows(),
        })?;
        grid.add_occupant(id, cells)?;
        debug!(%id, label = %unit.label, ?cells, "life unit spawned");
        self.units.insert(id, unit);
        self.next_id += 1;
        Ok(id)
    }

    pub fn despawn(&mut self, grid: &mut WorldGrid, id: EntityId) -> Result<LifeUnit, WorldError> {
        let cells = grid.coverage_of(id).ok_or(WorldError::UnknownOccupant(id))?;
        grid.remove_occupant(id, cells)?;
        self.units.remove(&id).ok_or(WorldError::UnknownOccupant(id))
    }

    /// Move (and optionally reshape) a unit, updating its cell coverage.
    /// Positions that would leave the grid entirely are rejected and the
    /// unit keeps its previous placement.
    pub fn relocate(
        &mut self,
        grid: &mut WorldGrid,
        id: EntityId,
        top_left: Vec2i,
        mask: Option<Arc<Mask>>,
    ) -> Result<(), WorldError> {
        let unit = self.units.get_mut(&id).ok_or(WorldError::UnknownOccupant(id))?;
        let mask = mask.unwrap_or_else(|| Arc::clone(&unit.mask));
        let rect = PixelRect::new(top_left, mask.size());
        let cells = grid.covered_cells(rect).ok_or(WorldError::CellOutOfRange {
            col: top_left.x.max(0) as u32 / grid.cell_size(),
            row: top_left.y.max(0) as u32 / grid.cell_size(),
            cols: grid.cols(),
            rows: grid.rows(),
        })?;
        grid.move_occupant(id, cells)?;
        unit.top_left = top_left;
        unit.mask = mask;
        Ok(())
    }

    /// Ids of units whose bounding box contains a world pixel.
    pub fn units_at(&self, point: Vec2i) -> Vec<EntityId> {
        self.units
            .values()
            .filter(|u| {
                let max = u.top_left + u.mask.size();
                point.x >= u.top_left.x && point.y >= u.top_left.y && point.x < max.x && point.y < max.y
            })
            .map(|u| u.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_relocate_despawn_keep_grid_in_sync() {
        let mut grid = WorldGrid::new(8, 8, 32).unwrap();
        let mut pop = Population::new();
        let kelp = Arc::new(Mask::filled(40, 20));
        let id = pop.spawn(&mut grid, "kelp", kelp, Vec2i::new(20, 10), CellProps::CLEAR.with_risk(0.1)).unwrap();
        // 20..60 x 10..30 -> cols 0..=1, row 0
        assert!(grid.get_cell(0, 0).unwrap().is_occupied());
        assert!(grid.get_cell(1, 0).unwrap().is_occupied());
        assert!(!grid.get_cell(0, 1).unwrap().is_occupied());

        pop.relocate(&mut grid, id, Vec2i::new(100, 100), None).unwrap();
        assert!(!grid.get_cell(0, 0).unwrap().is_occupied());
        assert!(grid.get_cell(3, 3).unwrap().is_occupied());
        assert!(grid.occupants_consistent());

        assert!(pop.relocate(&mut grid, id, Vec2i::new(-500, 0), None).is_err());
        assert_eq!(pop.get(id).unwrap().top_left, Vec2i::new(100, 100));

        let unit = pop.despawn(&mut grid, id).unwrap();
        assert_eq!(unit.label, "kelp");
        assert_eq!(grid.occupant_count(), 0);
        assert!(pop.is_empty());
    }

    #[test]
    fn units_at_uses_bounding_box() {
        let mut grid = WorldGrid::new(8, 8, 32).unwrap();
        let mut pop = Population::new();
        let id = pop.spawn(&mut grid, "clam", Arc::new(Mask::circle(4)), Vec2i::new(64, 64), CellProps::CLEAR).unwrap();
        assert_eq!(pop.units_at(Vec2i::new(65, 65)), vec![id]);
        assert!(pop.units_at(Vec2i::new(80, 80)).is_empty());
    }

    #[test]
    fn invalid_props_never_register() {
        let mut grid = WorldGrid::new(4, 4, 32).unwrap();
        let mut pop = Population::new();
        let res = pop.spawn(&mut grid, "bad", Arc::new(Mask::filled(4, 4)), Vec2i::ZERO, CellProps::solid(3.0));
        assert!(res.is_err());
        assert_eq!(grid.occupant_count(), 0);
    }
}
