//! Per-tick momentum integrators. All three step a stored momentum toward
//! a target by a fixed amount instead of solving a force equation.

use super::aggregate::calculate_total_force;
use super::types::BodyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistanceCategory {
    Passable,
    NonPassable,
}

/// Resistance felt by the body this tick. Passable resistance grows with
/// how hard the body is pushing; non-passable resistance is returned as is.
pub fn resistance_effect(state: &BodyState, thrust: f32, spray: f32, category: ResistanceCategory) -> f32 {
    match category {
        ResistanceCategory::Passable => {
            state.resistance_passable * calculate_total_force(&[thrust.abs(), spray.abs()])
        }
        ResistanceCategory::NonPassable => state.resistance_nonpassable,
    }
}

#[inline]
fn step_toward(current: f32, force: f32, resistance: f32, step_scale: f32, resolution: f32) -> f32 {
    let direction = 1.0_f32.copysign(force);
    let net_force = (force - direction * resistance) * resolution;
    let step = step_scale + step_scale * net_force.abs();
    let mut result = current;
    if result < net_force {
        result += step;
    } else if result > net_force {
        result -= step;
    }
    if result.abs() < step_scale && force == 0.0 {
        result = 0.0;
    }
    result
}

/// Pixels per frame along the heading.
pub fn calculate_velocity(current: f32, thrust: f32, resistance: f32, mass: f32, resolution: f32) -> f32 {
    if mass <= 0.0 {
        return current;
    }
    step_toward(current, thrust, resistance, 1.0 / mass, resolution)
}

/// Degrees per frame; half as responsive as velocity for the same mass.
pub fn calculate_rotation_momentum(current: f32, spray: f32, resistance: f32, mass: f32, resolution: f32) -> f32 {
    if mass <= 0.0 {
        return current;
    }
    step_toward(current, spray, resistance, 1.0 / (2.0 * mass), resolution)
}

/// Vertical drift in pixels per frame. `_resistance` and `_resolution` are
/// accepted for symmetry with the other integrators but have no effect.
pub fn calculate_buoyancy_momentum(current: f32, buoyancy: f32, _resistance: f32, _resolution: f32) -> f32 {
    let step = 0.1 + buoyancy.abs();
    let mut result = current;
    if result < buoyancy {
        result += step;
    } else if result > buoyancy {
        result -= step;
    }
    if result.abs() < 0.1 && buoyancy == 0.0 {
        result = 0.0;
    }
    result
}
