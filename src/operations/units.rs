use crate::error::{OperationError, Result};

/// CSS absolute length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Mm,
    Cm,
    In,
    Pt,
    Pc,
}

impl Unit {
    /// Returns the number of CSS pixels in one of this unit.
    #[must_use]
    pub fn px_factor(self) -> f64 {
        match self {
            Self::Px => 1.0,
            Self::Mm => 96.0 / 25.4,
            Self::Cm => 96.0 / 2.54,
            Self::In => 96.0,
            Self::Pt => 96.0 / 72.0,
            Self::Pc => 16.0,
        }
    }

    /// Parses a unit abbreviation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "px" => Some(Self::Px),
            "mm" => Some(Self::Mm),
            "cm" => Some(Self::Cm),
            "in" => Some(Self::In),
            "pt" => Some(Self::Pt),
            "pc" => Some(Self::Pc),
            _ => None,
        }
    }
}

/// Converts a scalar between units.
#[must_use]
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    value * from.px_factor() / to.px_factor()
}

/// Converts a display value into path-local user units: unit conversion
/// to pixels followed by division by the explicit document scale.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if `scale` is not positive.
pub fn to_user(value: f64, unit: Unit, scale: f64) -> Result<f64> {
    if scale <= 0.0 {
        return Err(OperationError::InvalidInput(format!(
            "document scale must be positive, got {scale}"
        ))
        .into());
    }
    Ok(convert(value, unit, Unit::Px) / scale)
}
