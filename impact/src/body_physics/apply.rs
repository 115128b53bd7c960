use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::aggregate::{calculate_total_force, calculate_total_risk};
use super::types::{BodyState, Contact, ContactSource, ControlInputs, ImpactDebug, ImpactOutcome};
use crate::environment::Environment;
use crate::grid::{EntityId, WorldGrid};
use crate::health::UnitHealth;
use crate::mask::Mask;
use crate::math::{normalize_heading, PixelRect, Vec2f};
use crate::population::Population;
use crate::window::{collect_window, window_range, WindowSize};

/// Read-only world access for one body's impact pass.
#[derive(Debug, Clone, Copy)]
pub struct ImpactContext<'a> {
    pub grid: &'a WorldGrid,
    pub population: &'a Population,
    pub environment: &'a Environment,
    pub window: WindowSize,
    /// Body contour, already rotated to the candidate heading.
    pub contour: &'a Mask,
    /// Small disc tested against the air for the surface clamp.
    pub probe: &'a Mask,
    pub max_surface_nudges: u32,
    /// The body's own occupant registration, skipped during overlap tests.
    pub self_id: Option<EntityId>,
    pub now: Duration,
}

/// Position beyond the world's pixel bounds. The far edges themselves are
/// still on the map.
pub fn check_off_map(position: Vec2f, width: f32, height: f32) -> bool {
    position.x < 0.0 || position.x > width || position.y < 0.0 || position.y > height
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0_f32, 0_u32), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f32 }
}

fn resistances(contacts: &[Contact], passable: bool) -> Vec<f32> {
    contacts
        .iter()
        .filter(|c| c.props.passable == passable)
        .map(|c| c.props.resistance)
        .collect()
}

/// Test the candidate pose against the window around the body and either
/// commit it or bounce.
///
/// The window is centred on the body's *current* position; the candidate
/// only decides where the contour is tested.
pub fn apply_impact(
    ctx: &ImpactContext<'_>,
    controls: ControlInputs,
    state: &mut BodyState,
    health: &mut UnitHealth,
    next_position: Vec2f,
    next_heading: f32,
    mut dbg: Option<&mut ImpactDebug>,
) -> ImpactOutcome {
    let next_heading = normalize_heading(next_heading);
    let off_map = check_off_map(next_position, ctx.grid.pixel_width(), ctx.grid.pixel_height());
    let rect = PixelRect::centered_at(next_position, ctx.contour.size());

    let cells = collect_window(ctx.grid, ctx.population, state.position, ctx.window);
    let mut terrain: Vec<Contact> = Vec::new();
    let mut life: Vec<Contact> = Vec::new();
    let mut tested: BTreeSet<EntityId> = BTreeSet::new();
    if let Some(d) = dbg.as_deref_mut() {
        d.window = Some(window_range(ctx.grid, state.position, ctx.window));
        d.contacts.clear();
        d.solid_cells.clear();
    }

    for cell in &cells {
        if let Some(mask) = cell.terrain {
            if let Some(p) = mask.overlap(ctx.contour, rect.min - cell.top_left) {
                terrain.push(Contact {
                    point: p + cell.top_left,
                    props: cell.props,
                    source: ContactSource::Terrain { col: cell.col, row: cell.row },
                });
            }
            if !cell.props.passable {
                if let Some(d) = dbg.as_deref_mut() {
                    d.solid_cells.push((cell.col, cell.row));
                }
            }
        }
        for unit in &cell.population {
            // a unit spanning several cells is tested once
            if Some(unit.id) == ctx.self_id || !tested.insert(unit.id) {
                continue;
            }
            if let Some(p) = unit.mask.overlap(ctx.contour, rect.min - unit.top_left) {
                life.push(Contact { point: p + unit.top_left, props: unit.props, source: ContactSource::Occupant(unit.id) });
            }
        }
    }

    let cell_passable = calculate_total_force(&resistances(&terrain, true));
    let cell_nonpassable = calculate_total_force(&resistances(&terrain, false));
    let life_passable = calculate_total_force(&resistances(&life, true));
    let life_nonpassable = calculate_total_force(&resistances(&life, false));
    let total_passable = calculate_total_force(&[cell_passable, life_passable]);
    let total_nonpassable = calculate_total_force(&[cell_nonpassable, life_nonpassable]);

    let cells_temp = mean(terrain.iter().map(|c| c.props.temperature));
    let water_temp = ctx.environment.water_temp_at(next_position.y);
    state.surrounding_temp = if cells_temp > 0.0 { (water_temp + cells_temp * 1.5) / 2.0 } else { water_temp };

    let cells_risk = mean(terrain.iter().map(|c| c.props.risk));
    let life_risk = calculate_total_risk(&life.iter().map(|c| c.props.risk).collect::<Vec<_>>());
    state.surrounding_risk = calculate_total_risk(&[cells_risk, life_risk]);

    let mean_force = (controls.thrust.abs() + controls.spray.abs()) / 2.0;

    let outcome = if total_nonpassable > 0.0 || off_map {
        let hull_damaged = !off_map && health.register_hit(mean_force, ctx.now);
        state.velocity = -state.velocity / 2.0;
        state.rotation_momentum = -state.rotation_momentum / 2.0;
        // stalled against the obstacle: let the pilot push back out at once
        if controls.thrust.abs() > 0.0 && state.velocity == 0.0 {
            state.velocity = controls.thrust;
        }
        if controls.spray.abs() > 0.0 && state.rotation_momentum == 0.0 {
            state.rotation_momentum = controls.spray;
        }
        debug!(
            off_map,
            resistance = total_nonpassable,
            contacts = terrain.len() + life.len(),
            velocity = state.velocity,
            "collision response"
        );
        ImpactOutcome::Collided { off_map, hull_damaged }
    } else {
        let (position, surface_nudges) = clamp_to_surface(ctx, state, next_position);
        state.position = position;
        state.heading = next_heading;
        ImpactOutcome::Moved { surface_nudges }
    };

    state.resistance_passable = total_passable;
    state.resistance_nonpassable = total_nonpassable;
    state.mean_force = mean_force;
    trace!(
        x = state.position.x,
        y = state.position.y,
        heading = state.heading,
        velocity = state.velocity,
        resistance_passable = total_passable,
        temp = state.surrounding_temp,
        risk = state.surrounding_risk,
        "impact applied"
    );

    if let Some(d) = dbg {
        d.next_position = next_position;
        d.next_heading = next_heading;
        d.off_map = off_map;
        d.contacts.extend(terrain);
        d.contacts.extend(life);
    }
    outcome
}

/// Push the candidate down one pixel at a time while the centre probe is in
/// the air, refreshing the hull's out-of-water area as it goes. Skipped once
/// the body is deep enough.
fn clamp_to_surface(ctx: &ImpactContext<'_>, state: &mut BodyState, candidate: Vec2f) -> (Vec2f, u32) {
    let env = ctx.environment;
    if state.position.y >= env.floating_check_start_from() {
        state.out_of_water_area = 0;
        return (candidate, 0);
    }
    let mut next = candidate;
    let mut nudges = 0;
    loop {
        let rect = PixelRect::centered_at(next, ctx.contour.size());
        state.out_of_water_area = env.out_of_water_area(ctx.contour, rect);
        if !env.probe_in_air(ctx.probe, next) {
            break;
        }
        if nudges >= ctx.max_surface_nudges {
            warn!(x = next.x, y = next.y, nudges, "surface clamp gave up");
            break;
        }
        next.y += 1.0;
        nudges += 1;
    }
    (next, nudges)
}
