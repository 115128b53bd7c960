//! The windowed neighbourhood a moving body is tested against each tick.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grid::{CellRange, WorldGrid};
use crate::mask::Mask;
use crate::math::{Vec2f, Vec2i};
use crate::population::{LifeUnit, Population};
use crate::CellProps;

/// Window extent in cells, centred on the body's current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub cols: u32,
    pub rows: u32,
}

impl Default for WindowSize {
    fn default() -> Self { Self { cols: 12, rows: 12 } }
}

/// Read-only snapshot of one grid cell and the units registered in it.
#[derive(Debug, Clone)]
pub struct ImpactCell<'a> {
    pub col: u32,
    pub row: u32,
    pub top_left: Vec2i,
    pub props: CellProps,
    pub terrain: Option<&'a Arc<Mask>>,
    pub population: Vec<&'a LifeUnit>,
}

/// Cell range of the window around `center` (a world pixel position).
///
/// The start edge sits `size / 2` cells before the centre cell and the end
/// edge `size` cells after the start; both are clamped into the grid. A
/// centre outside the world clamps to the nearest edge cell first.
pub fn window_range(grid: &WorldGrid, center: Vec2f, size: WindowSize) -> CellRange {
    let (cc, cr) = grid.clamp_cell(grid.cell_at(center));
    let col_start = cc.saturating_sub(size.cols / 2);
    let row_start = cr.saturating_sub(size.rows / 2);
    let col_end = col_start.saturating_add(size.cols).min(grid.cols() - 1);
    let row_end = row_start.saturating_add(size.rows).min(grid.rows() - 1);
    CellRange { col_start, row_start, col_end, row_end }
}

/// Snapshot every cell of the window, row by row.
pub fn collect_window<'a>(
    grid: &'a WorldGrid,
    population: &'a Population,
    center: Vec2f,
    size: WindowSize,
) -> Vec<ImpactCell<'a>> {
    let range = window_range(grid, center, size);
    let mut out = Vec::with_capacity(range.cell_count());
    for (col, row) in range.iter() {
        let Some(cell) = grid.get_cell(col, row) else {
            continue;
        };
        out.push(ImpactCell {
            col,
            row,
            top_left: grid.cell_top_left(col, row),
            props: cell.props,
            terrain: cell.terrain.as_ref(),
            population: cell.occupants().filter_map(|id| population.get(id)).collect(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;

    #[test]
    fn window_clamps_at_world_edges() {
        let grid = WorldGrid::new(20, 20, 32).unwrap();
        let r = window_range(&grid, Vec2f::new(5.0, 5.0), WindowSize { cols: 6, rows: 4 });
        assert_eq!((r.col_start, r.row_start, r.col_end, r.row_end), (0, 0, 6, 4));
        let r = window_range(&grid, Vec2f::new(639.0, 639.0), WindowSize { cols: 6, rows: 4 });
        assert_eq!((r.col_start, r.row_start, r.col_end, r.row_end), (16, 17, 19, 19));
    }

    #[test]
    fn off_world_center_still_yields_a_window() {
        let grid = WorldGrid::new(10, 10, 32).unwrap();
        let r = window_range(&grid, Vec2f::new(-5000.0, 9000.0), WindowSize { cols: 2, rows: 2 });
        assert_eq!((r.col_start, r.row_start, r.col_end, r.row_end), (0, 8, 2, 9));
        let population = Population::new();
        let cells = collect_window(&grid, &population, Vec2f::new(1e6, 1e6), WindowSize::default());
        assert!(!cells.is_empty());
    }

    #[test]
    fn body_on_cell_boundary_includes_its_own_cell() {
        let grid = WorldGrid::new(10, 10, 32).unwrap();
        let pos = Vec2f::new(64.0, 96.0);
        let own = grid.cell_at(pos);
        for size in [WindowSize { cols: 0, rows: 0 }, WindowSize { cols: 1, rows: 1 }, WindowSize::default()] {
            let population = Population::new();
            let cells = collect_window(&grid, &population, pos, size);
            assert!(
                cells.iter().any(|c| c.col as i32 == own.x && c.row as i32 == own.y),
                "window {size:?} misses own cell {own:?}"
            );
        }
    }

    #[test]
    fn window_carries_occupants() {
        let mut grid = WorldGrid::new(10, 10, 32).unwrap();
        let mut pop = Population::new();
        let id = pop
            .spawn(&mut grid, "urchin", Arc::new(Mask::filled(8, 8)), Vec2i::new(70, 70), CellProps::CLEAR)
            .unwrap();
        let cells = collect_window(&grid, &pop, Vec2f::new(70.0, 70.0), WindowSize { cols: 2, rows: 2 });
        let hits: Vec<EntityId> = cells.iter().flat_map(|c| c.population.iter().map(|u| u.id)).collect();
        assert_eq!(hits, vec![id]);
    }
}
