use serde::{Deserialize, Serialize};

use crate::WorldError;

/// Fixed-field physical properties shared by terrain cells and life units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellProps {
    pub passable: bool,
    /// Opposing force in `[0, 1]`.
    pub resistance: f32,
    /// Degrees Celsius; `0` means "no thermal contribution".
    pub temperature: f32,
    /// Hazard exposure in `[0, 1]`.
    pub risk: f32,
}

impl CellProps {
    /// The empty-water cell every unauthored grid coordinate falls back to.
    pub const CLEAR: CellProps = CellProps { passable: true, resistance: 0.0, temperature: 0.0, risk: 0.0 };

    pub const fn solid(resistance: f32) -> Self {
        Self { passable: false, resistance, temperature: 0.0, risk: 0.0 }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_risk(mut self, risk: f32) -> Self {
        self.risk = risk;
        self
    }

    /// Reject property records that would push aggregates outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), WorldError> {
        unit_interval("resistance", self.resistance)?;
        unit_interval("risk", self.risk)?;
        if !self.temperature.is_finite() {
            return Err(WorldError::InvalidProps {
                field: "temperature",
                value: self.temperature,
                expected: "a finite value",
            });
        }
        Ok(())
    }
}

impl Default for CellProps {
    fn default() -> Self { Self::CLEAR }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), WorldError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorldError::InvalidProps { field, value, expected: "a value in [0, 1]" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_is_passable_and_valid() {
        assert!(CellProps::CLEAR.passable);
        assert_eq!(CellProps::CLEAR.resistance, 0.0);
        assert!(CellProps::CLEAR.validate().is_ok());
    }

    #[test]
    fn out_of_range_resistance_rejected() {
        let err = CellProps::solid(1.5).validate().unwrap_err();
        assert!(matches!(err, WorldError::InvalidProps { field: "resistance", .. }));
        assert!(CellProps::CLEAR.with_risk(f32::NAN).validate().is_err());
    }
}
