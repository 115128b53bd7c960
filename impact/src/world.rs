use serde::{Deserialize, Serialize};
use tracing::info;

use crate::environment::{Environment, EnvironmentSpec};
use crate::grid::WorldGrid;
use crate::mask::{ShapeId, ShapeLibrary};
use crate::population::Population;
use crate::{CellProps, WorldError};

/// Grid dimensions fixed at world-load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSpec {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: u32,
}

impl Default for WorldSpec {
    fn default() -> Self {
        Self { cols: 300, rows: 350, cell_size: 32 }
    }
}

/// Everything a body's impact pass reads, plus the shape cache it fills.
#[derive(Debug)]
pub struct World {
    pub grid: WorldGrid,
    pub population: Population,
    pub shapes: ShapeLibrary,
    pub environment: Environment,
}

impl World {
    pub fn new(spec: WorldSpec, environment: EnvironmentSpec) -> Result<Self, WorldError> {
        let grid = WorldGrid::new(spec.cols, spec.rows, spec.cell_size)?;
        let environment = Environment::new(environment, grid.pixel_width() as u32);
        info!(cols = spec.cols, rows = spec.rows, cell_size = spec.cell_size, "world created");
        Ok(Self { grid, population: Population::new(), shapes: ShapeLibrary::new(), environment })
    }

    /// Author a terrain cell from a library shape.
    pub fn paint_terrain(&mut self, col: u32, row: u32, props: CellProps, shape: ShapeId) -> Result<(), WorldError> {
        let mask = self.shapes.get(shape).cloned().ok_or(WorldError::UnknownShape(shape.0))?;
        self.grid.set_cell(col, row, props, Some(mask))
    }
}
