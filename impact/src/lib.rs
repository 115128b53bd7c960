//! Impact physics for the underwater simulator.
//!
//! The crate owns the world grid and its occupant index, pixel masks, the
//! per-tick impact pass of a moving body, and its health/energy model. It
//! does no I/O apart from `tracing` events; hosts drive it one frame at a
//! time and pass the frame clock in.

pub mod math;
pub use math::{Vec2f, Vec2i};

mod error;
pub use error::WorldError;

mod props;
pub use props::CellProps;

pub mod mask;
pub use mask::{Mask, ShapeId, ShapeLibrary};

pub mod grid;
pub use grid::{Cell, CellRange, EntityId, WorldGrid};

pub mod population;
pub use population::{LifeUnit, Population};

pub mod window;
pub use window::{collect_window, window_range, ImpactCell, WindowSize};

pub mod environment;
pub use environment::{Environment, EnvironmentSpec, SurfaceSpec, WaterBand};

pub mod health;
pub use health::{EnergyConsumption, HealingMode, HealthInputs, HealthSnapshot, UnitHealth};

mod sub_specs;
pub use sub_specs::subspecs;
pub use sub_specs::{BodySpec, HullSpec};

mod world;
pub use world::{World, WorldSpec};

pub mod body_physics;
pub use body_physics::{
    apply_impact, calculate_total_force, calculate_total_risk, step_body, step_body_dbg, BodyState, Contact,
    ControlInputs, ImpactContext, ImpactDebug, ImpactOutcome, StepReport,
};

mod body;
pub use body::MobileBody;

pub mod builtins;
