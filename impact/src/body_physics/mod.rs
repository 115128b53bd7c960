mod aggregate;
mod apply;
mod dynamics;
mod integrate;
mod types;

pub use aggregate::{calculate_total_force, calculate_total_risk, dominant_sum};
pub use apply::{apply_impact, check_off_map, ImpactContext};
pub use dynamics::{step_body, step_body_dbg};
pub use integrate::{
    calculate_buoyancy_momentum, calculate_rotation_momentum, calculate_velocity, resistance_effect,
    ResistanceCategory,
};
pub use types::{BodyState, Contact, ContactSource, ControlInputs, ImpactDebug, ImpactOutcome, StepReport};
