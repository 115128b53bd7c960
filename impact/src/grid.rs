//! Uniform world grid with a bidirectional occupant index.
//!
//! `cell -> occupants` and `occupant -> covered cells` are only ever changed
//! together through [`WorldGrid::add_occupant`] / [`WorldGrid::remove_occupant`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mask::Mask;
use crate::math::{PixelRect, Vec2f, Vec2i};
use crate::{CellProps, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inclusive rectangle of grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub col_start: u32,
    pub row_start: u32,
    pub col_end: u32,
    pub row_end: u32,
}

impl CellRange {
    pub fn single(col: u32, row: u32) -> Self {
        Self { col_start: col, row_start: row, col_end: col, row_end: row }
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.col_start..=self.col_end).contains(&col) && (self.row_start..=self.row_end).contains(&row)
    }

    pub fn cell_count(&self) -> usize {
        ((self.col_end - self.col_start + 1) * (self.row_end - self.row_start + 1)) as usize
    }

    /// Row-major iteration, `(col, row)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.row_start..=self.row_end).flat_map(move |row| (self.col_start..=self.col_end).map(move |col| (col, row)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub props: CellProps,
    /// Terrain silhouette; `None` means open water.
    pub terrain: Option<Arc<Mask>>,
    occupants: BTreeSet<EntityId>,
}

impl Cell {
    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.occupants.iter().copied()
    }

    pub fn is_occupied(&self) -> bool { !self.occupants.is_empty() }
}

#[derive(Debug)]
pub struct WorldGrid {
    cols: u32,
    rows: u32,
    cell_size: u32,
    cells: Vec<Cell>,
    coverage: HashMap<EntityId, CellRange>,
}

impl WorldGrid {
    pub fn new(cols: u32, rows: u32, cell_size: u32) -> Result<Self, WorldError> {
        if cols == 0 || rows == 0 || cell_size == 0 {
            return Err(WorldError::InvalidDimensions { cols, rows, cell_size });
        }
        Ok(Self {
            cols,
            rows,
            cell_size,
            cells: vec![Cell::default(); cols as usize * rows as usize],
            coverage: HashMap::new(),
        })
    }

    pub fn cols(&self) -> u32 { self.cols }
    pub fn rows(&self) -> u32 { self.rows }
    pub fn cell_size(&self) -> u32 { self.cell_size }
    pub fn pixel_width(&self) -> f32 { (self.cols * self.cell_size) as f32 }
    pub fn pixel_height(&self) -> f32 { (self.rows * self.cell_size) as f32 }

    #[inline]
    fn index(&self, col: u32, row: u32) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row as usize * self.cols as usize + col as usize)
    }

    pub fn get_cell(&self, col: u32, row: u32) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Author a cell. Occupant membership is left untouched.
    pub fn set_cell(&mut self, col: u32, row: u32, props: CellProps, terrain: Option<Arc<Mask>>) -> Result<(), WorldError> {
        props.validate()?;
        let idx = self.index(col, row).ok_or(WorldError::CellOutOfRange { col, row, cols: self.cols, rows: self.rows })?;
        let cell = &mut self.cells[idx];
        cell.props = props;
        cell.terrain = terrain;
        Ok(())
    }

    /// Pixel-space top-left corner of a cell.
    pub fn cell_top_left(&self, col: u32, row: u32) -> Vec2i {
        Vec2i::new((col * self.cell_size) as i32, (row * self.cell_size) as i32)
    }

    /// Grid coordinate under a pixel position. May fall outside the grid.
    pub fn cell_at(&self, pos: Vec2f) -> Vec2i {
        (pos / self.cell_size as f32).floor().as_ivec2()
    }

    /// Nearest valid grid coordinate.
    pub fn clamp_cell(&self, cell: Vec2i) -> (u32, u32) {
        (
            cell.x.clamp(0, self.cols as i32 - 1) as u32,
            cell.y.clamp(0, self.rows as i32 - 1) as u32,
        )
    }

    /// All cells intersected by an axis-aligned pixel rect, clipped to the
    /// grid. `None` when the rect misses the grid entirely.
    pub fn covered_cells(&self, rect: PixelRect) -> Option<CellRange> {
        if rect.is_empty() {
            return None;
        }
        let cs = self.cell_size as i32;
        let min = Vec2i::new(rect.min.x.div_euclid(cs), rect.min.y.div_euclid(cs));
        let last = rect.max_exclusive() - Vec2i::ONE;
        let max = Vec2i::new(last.x.div_euclid(cs), last.y.div_euclid(cs));
        if max.x < 0 || max.y < 0 || min.x >= self.cols as i32 || min.y >= self.rows as i32 {
            return None;
        }
        let (col_start, row_start) = self.clamp_cell(min);
        let (col_end, row_end) = self.clamp_cell(max);
        Some(CellRange { col_start, row_start, col_end, row_end })
    }

    pub fn coverage_of(&self, id: EntityId) -> Option<CellRange> {
        self.coverage.get(&id).copied()
    }

    pub fn occupant_count(&self) -> usize { self.coverage.len() }

    pub fn add_occupant(&mut self, id: EntityId, cells: CellRange) -> Result<(), WorldError> {
        if self.coverage.contains_key(&id) {
            return Err(WorldError::DuplicateOccupant(id));
        }
        self.check_range(cells)?;
        for (col, row) in cells.iter() {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx].occupants.insert(id);
        }
        self.coverage.insert(id, cells);
        Ok(())
    }

    /// `cells` must match what the occupant was registered with.
    pub fn remove_occupant(&mut self, id: EntityId, cells: CellRange) -> Result<(), WorldError> {
        match self.coverage.get(&id) {
            None => return Err(WorldError::UnknownOccupant(id)),
            Some(registered) if *registered != cells => return Err(WorldError::CoverageMismatch(id)),
            Some(_) => {}
        }
        for (col, row) in cells.iter() {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx].occupants.remove(&id);
        }
        self.coverage.remove(&id);
        Ok(())
    }

    /// Move an occupant's registration; a no-op when coverage is unchanged.
    pub fn move_occupant(&mut self, id: EntityId, cells: CellRange) -> Result<(), WorldError> {
        let current = self.coverage_of(id).ok_or(WorldError::UnknownOccupant(id))?;
        if current == cells {
            return Ok(());
        }
        self.check_range(cells)?;
        self.remove_occupant(id, current)?;
        self.add_occupant(id, cells)
    }

    fn check_range(&self, cells: CellRange) -> Result<(), WorldError> {
        if cells.col_end >= self.cols || cells.row_end >= self.rows || cells.col_start > cells.col_end || cells.row_start > cells.row_end {
            return Err(WorldError::CellOutOfRange { col: cells.col_end, row: cells.row_end, cols: self.cols, rows: self.rows });
        }
        Ok(())
    }

    /// True when both directions of the occupant index agree.
    pub fn occupants_consistent(&self) -> bool {
        let forward = self.coverage.iter().all(|(id, range)| {
            range.iter().all(|(c, r)| self.get_cell(c, r).is_some_and(|cell| cell.occupants.contains(id)))
        });
        let backward = self.cells.iter().enumerate().all(|(i, cell)| {
            let col = (i % self.cols as usize) as u32;
            let row = (i / self.cols as usize) as u32;
            cell.occupants.iter().all(|id| self.coverage.get(id).is_some_and(|r| r.contains(col, row)))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> WorldGrid {
        WorldGrid::new(10, 8, 32).unwrap()
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let g = grid();
        assert!(g.get_cell(9, 7).is_some());
        assert!(g.get_cell(10, 0).is_none());
        assert!(g.get_cell(0, 8).is_none());
        assert_eq!(g.get_cell(3, 3).unwrap().props, CellProps::CLEAR);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(WorldGrid::new(0, 4, 32), Err(WorldError::InvalidDimensions { .. })));
    }

    #[test]
    fn covered_cells_spans_every_intersected_cell() {
        let g = grid();
        let r = g.covered_cells(PixelRect::new(Vec2i::new(30, 0), Vec2i::new(4, 33))).unwrap();
        assert_eq!(r, CellRange { col_start: 0, row_start: 0, col_end: 1, row_end: 1 });
        // exactly one cell when flush with its edges
        let r = g.covered_cells(PixelRect::new(Vec2i::new(32, 32), Vec2i::new(32, 32))).unwrap();
        assert_eq!(r, CellRange::single(1, 1));
        assert!(g.covered_cells(PixelRect::new(Vec2i::new(-100, -100), Vec2i::new(10, 10))).is_none());
        let clipped = g.covered_cells(PixelRect::new(Vec2i::new(300, 240), Vec2i::new(100, 100))).unwrap();
        assert_eq!(clipped, CellRange::single(9, 7));
    }

    #[test]
    fn occupant_index_stays_bidirectional() {
        let mut g = grid();
        let id = EntityId(4);
        let range = CellRange { col_start: 1, row_start: 1, col_end: 2, row_end: 3 };
        g.add_occupant(id, range).unwrap();
        assert!(g.get_cell(2, 3).unwrap().occupants().any(|o| o == id));
        assert!(g.occupants_consistent());
        assert_eq!(g.add_occupant(id, range), Err(WorldError::DuplicateOccupant(id)));

        assert_eq!(g.remove_occupant(id, CellRange::single(1, 1)), Err(WorldError::CoverageMismatch(id)));
        assert!(g.get_cell(1, 1).unwrap().is_occupied(), "failed removal must not touch cells");

        g.move_occupant(id, CellRange::single(5, 5)).unwrap();
        assert!(!g.get_cell(1, 1).unwrap().is_occupied());
        assert!(g.get_cell(5, 5).unwrap().is_occupied());
        assert!(g.occupants_consistent());

        g.remove_occupant(id, CellRange::single(5, 5)).unwrap();
        assert_eq!(g.occupant_count(), 0);
        assert_eq!(g.remove_occupant(id, CellRange::single(5, 5)), Err(WorldError::UnknownOccupant(id)));
    }

    #[test]
    fn set_cell_validates_props() {
        let mut g = grid();
        assert!(g.set_cell(0, 0, CellProps::solid(2.0), None).is_err());
        assert!(g.set_cell(20, 0, CellProps::solid(0.5), None).is_err());
        g.set_cell(0, 0, CellProps::solid(0.5), Some(Arc::new(Mask::filled(32, 32)))).unwrap();
        assert!(g.get_cell(0, 0).unwrap().terrain.is_some());
    }
}
