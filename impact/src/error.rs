use thiserror::Error;

use crate::EntityId;

/// Failures raised while building or mutating the world index.
///
/// Physics queries never produce these; out-of-range lookups clamp or
/// return empty results instead.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("grid dimensions must be positive (cols={cols}, rows={rows}, cell_size={cell_size})")]
    InvalidDimensions { cols: u32, rows: u32, cell_size: u32 },
    #[error("invalid {field}: {value} (expected {expected})")]
    InvalidProps { field: &'static str, value: f32, expected: &'static str },
    #[error("cell ({col}, {row}) is outside the {cols}x{rows} grid")]
    CellOutOfRange { col: u32, row: u32, cols: u32, rows: u32 },
    #[error("occupant {0} is already registered")]
    DuplicateOccupant(EntityId),
    #[error("occupant {0} is not registered")]
    UnknownOccupant(EntityId),
    #[error("coverage for occupant {0} does not match its registration")]
    CoverageMismatch(EntityId),
    #[error("unknown shape id {0}")]
    UnknownShape(u32),
    #[error("body mass must be positive, got {0}")]
    InvalidMass(f32),
}
