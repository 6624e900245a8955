//! Energy units.
//!
//! Devices report daily consumption in watt-hours; the lifetime counter is
//! kept in kilowatt-hours.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated, non-negative amount of energy in watt-hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WattHours(f64);

impl WattHours {
    /// Validate a raw reported value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEnergy`] for NaN, infinite, or
    /// negative values; adding any of those to the lifetime counter would
    /// break its non-decreasing invariant.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidEnergy(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to kilowatt-hours, the unit of the lifetime counter.
    #[must_use]
    pub fn to_kilowatt_hours(self) -> f64 {
        self.0 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_zero_and_positive_values() {
        assert_eq!(WattHours::new(0.0).unwrap().value(), 0.0);
        assert_eq!(WattHours::new(850.0).unwrap().value(), 850.0);
    }

    #[test]
    fn should_convert_watt_hours_to_kilowatt_hours() {
        let wh = WattHours::new(850.0).unwrap();
        assert!((wh.to_kilowatt_hours() - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_negative_values() {
        assert!(matches!(
            WattHours::new(-1.0),
            Err(ValidationError::InvalidEnergy(_))
        ));
    }

    #[test]
    fn should_reject_nan_and_infinity() {
        assert!(WattHours::new(f64::NAN).is_err());
        assert!(WattHours::new(f64::INFINITY).is_err());
        assert!(WattHours::new(f64::NEG_INFINITY).is_err());
    }
}
