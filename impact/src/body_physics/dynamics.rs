use std::sync::Arc;
use std::time::Duration;

use super::apply::{apply_impact, ImpactContext};
use super::integrate::{
    calculate_buoyancy_momentum, calculate_rotation_momentum, calculate_velocity, resistance_effect,
    ResistanceCategory,
};
use super::types::{ControlInputs, ImpactDebug, StepReport};
use crate::body::MobileBody;
use crate::environment::{depth_from_pixels, distance_from_pixels, pressure_from_depth};
use crate::health::HealthInputs;
use crate::math::{advance_along_heading, normalize_heading, PixelRect};
use crate::world::World;
use crate::WorldError;

/// One motion step for a body: integrate momenta, test the candidate pose,
/// then update health. See `step_body_dbg` for the telemetry variant.
pub fn step_body(world: &mut World, body: &mut MobileBody, inputs: ControlInputs, now: Duration) -> Result<StepReport, WorldError> {
    step_body_dbg(world, body, inputs, now, None)
}

/// Variant of `step_body` that fills out an optional debug feed.
pub fn step_body_dbg(
    world: &mut World,
    body: &mut MobileBody,
    inputs: ControlInputs,
    now: Duration,
    mut dbg: Option<&mut ImpactDebug>,
) -> Result<StepReport, WorldError> {
    let mut controls = inputs.clamped();
    // a flat battery cuts the drives but not the ballast
    if body.health.battery_empty() {
        controls.thrust = 0.0;
        controls.spray = 0.0;
    }
    let spec = &body.spec;
    let buoyancy = controls.ballast_buoyancy() + body.health.structural_buoyancy();

    let state = &mut body.state;
    let effect = resistance_effect(state, controls.thrust, controls.spray, ResistanceCategory::Passable);
    state.velocity = calculate_velocity(state.velocity, controls.thrust, effect, spec.mass, spec.speed_resolution);
    state.rotation_momentum =
        calculate_rotation_momentum(state.rotation_momentum, controls.spray, effect, spec.mass, spec.rotation_resolution);
    state.buoyancy_momentum = calculate_buoyancy_momentum(
        state.buoyancy_momentum,
        buoyancy,
        state.resistance_passable,
        spec.buoyancy_resolution,
    );

    let next_heading = normalize_heading(state.heading + state.rotation_momentum);
    let mut next_position = advance_along_heading(state.position, next_heading, state.velocity);
    // buoyancy only wins when it outpaces the drive
    if state.velocity.abs() <= state.buoyancy_momentum.abs() {
        next_position.y -= state.buoyancy_momentum;
    }

    let contour = world.shapes.rotated(body.shape, next_heading).ok_or(WorldError::UnknownShape(body.shape.0))?;
    let ctx = ImpactContext {
        grid: &world.grid,
        population: &world.population,
        environment: &world.environment,
        window: spec.window,
        contour: &contour,
        probe: &body.probe,
        max_surface_nudges: spec.max_surface_nudges,
        self_id: body.occupant,
        now,
    };
    let outcome = apply_impact(&ctx, controls, state, &mut body.health, next_position, next_heading, dbg.as_deref_mut());

    if let Some(id) = body.occupant {
        if !outcome.collided() {
            let top_left = PixelRect::centered_at(state.position, contour.size()).min;
            world.population.relocate(&mut world.grid, id, top_left, Some(Arc::clone(&contour)))?;
        }
    }

    let env = &world.environment;
    let solar = env.solar_energy(state.position.y, state.out_of_water_area, body.contour_area);
    let thermal = env.thermal_energy(state.surrounding_temp);
    let depth = depth_from_pixels(state.position.y);
    let pressure = pressure_from_depth(depth);
    body.health.update(&HealthInputs {
        outer_temperature: state.surrounding_temp,
        outer_pressure: pressure,
        thrust: controls.thrust,
        spray: controls.spray,
        velocity: state.velocity,
        rotation_momentum: state.rotation_momentum,
        surrounding_risk: state.surrounding_risk,
        energy_in: solar + thermal,
        out_of_water_area: state.out_of_water_area,
        contour_area: body.contour_area,
    });

    if let Some(d) = dbg {
        d.buoyancy = buoyancy;
        d.resistance_effect = effect;
        d.solar_energy = solar;
        d.thermal_energy = thermal;
    }

    Ok(StepReport {
        outcome,
        depth,
        pressure,
        distance: distance_from_pixels(state.position.x),
        energy_in: solar + thermal,
        health: body.health.snapshot(),
    })
}
