use std::sync::Arc;

use tracing::debug;

use crate::environment::{EnvironmentSpec, SurfaceSpec, WaterBand};
use crate::mask::Mask;
use crate::math::Vec2i;
use crate::world::{World, WorldSpec};
use crate::{CellProps, WorldError};

pub fn default_environment() -> EnvironmentSpec {
    EnvironmentSpec {
        shallow: WaterBand { top: 400.0, depth: Some(400.0), temperature: 19.0, min_temperature: 15.0, max_temperature: 25.0 },
        deep: WaterBand { top: 800.0, depth: None, temperature: 8.0, min_temperature: 4.0, max_temperature: 15.0 },
        surface: SurfaceSpec {
            waterline: 400.0,
            air_height: 400,
            wave_amplitude: 4.0,
            wave_length: 96.0,
            probe_gate_depth: 250.0,
        },
        system_temperature: 45.0,
        drift_interval_ms: 1000,
        drift_step: 1,
        solar_efficiency: 0.5,
        underwater_solar_factor: 0.4,
        solar_gate_margin: 200.0,
        thermal_efficiency: 1.0,
    }
}

pub const ROCK: CellProps = CellProps::solid(1.0);
pub const VENT: CellProps = CellProps { passable: true, resistance: 0.2, temperature: 160.0, risk: 0.3 };
pub const KELP: CellProps = CellProps { passable: true, resistance: 0.3, temperature: 0.0, risk: 0.05 };
pub const URCHIN: CellProps = CellProps { passable: false, resistance: 0.6, temperature: 0.0, risk: 0.5 };

/// Open water over a rocky seabed with a ridge, a hydrothermal vent field
/// and a kelp bed. Layout scales with the grid.
pub fn trench_world(spec: WorldSpec) -> Result<World, WorldError> {
    let mut world = World::new(spec, default_environment())?;
    let cs = spec.cell_size;
    let seabed_rows = (spec.rows / 8).max(1);
    let seabed_top = spec.rows - seabed_rows;

    let rock = world.shapes.insert(Mask::filled(cs, cs));
    // rounded boulders along the seabed surface
    let crest = world.shapes.insert(Mask::from_fn(cs, cs, |x, y| {
        let bump = ((x as f32 / cs as f32) * std::f32::consts::PI).sin();
        y as f32 >= cs as f32 * (0.5 - 0.4 * bump)
    }));
    let mound = world.shapes.insert(Mask::from_fn(cs, cs, |x, y| {
        let dx = x as f32 + 0.5 - cs as f32 / 2.0;
        let r = cs as f32 / 2.0;
        (y as f32) >= cs as f32 - (r * r - dx * dx).max(0.0).sqrt()
    }));

    let vent_cols = (spec.cols * 3 / 5)..(spec.cols * 3 / 5 + (spec.cols / 20).max(1));
    let ridge_col = spec.cols / 3;
    let ridge_height = (seabed_top / 4).min(8);

    for col in 0..spec.cols {
        for row in seabed_top..spec.rows {
            let shape = if row == seabed_top { crest } else { rock };
            world.paint_terrain(col, row, ROCK, shape)?;
        }
        if vent_cols.contains(&col) && seabed_top > 0 {
            world.paint_terrain(col, seabed_top - 1, VENT, mound)?;
        }
    }
    for row in seabed_top.saturating_sub(ridge_height)..seabed_top {
        world.paint_terrain(ridge_col, row, ROCK, rock)?;
    }

    // kelp bed between the ridge and the vents
    let kelp_height = (cs * 3).min(seabed_top * cs);
    let kelp = Arc::new(Mask::from_fn(cs / 2, kelp_height, |x, y| {
        let sway = ((y as f32 / 12.0).sin() * cs as f32 / 8.0) as i32;
        (x as i32 - cs as i32 / 4 - sway).abs() <= (cs as i32 / 8).max(1)
    }));
    let urchin = Arc::new(Mask::circle((cs / 4).max(1)));
    let bed = (ridge_col + 2)..vent_cols.start.max(ridge_col + 2);
    let floor_y = (seabed_top * cs) as i32;
    for (i, col) in bed.step_by(2).enumerate() {
        let x = (col * cs) as i32;
        world.population.spawn(&mut world.grid, "kelp", Arc::clone(&kelp), Vec2i::new(x, floor_y - kelp_height as i32), KELP)?;
        if i % 3 == 1 {
            let y = floor_y - urchin.height() as i32;
            world.population.spawn(&mut world.grid, "urchin", Arc::clone(&urchin), Vec2i::new(x + cs as i32 / 2, y), URCHIN)?;
        }
    }
    debug!(life = world.population.len(), seabed_top, ridge_col, "trench world built");
    Ok(world)
}
