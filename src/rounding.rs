//! Rounding policies for operations that must discard digits.

use core::fmt;
use core::str::FromStr;

/// How to round a result whose exact value does not fit the requested
/// precision or scale.
///
/// Each variant describes what happens to the digit position that survives
/// when everything after it is discarded. `HalfEven` is the IEEE 754
/// default ("banker's rounding") and minimizes cumulative drift over many
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round away from zero: any discarded fraction increments the
    /// magnitude.
    Up,
    /// Round toward zero: discarded digits are dropped (truncation).
    Down,
    /// Round toward positive infinity.
    Ceiling,
    /// Round toward negative infinity.
    Floor,
    /// Round to nearest; ties round away from zero.
    HalfUp,
    /// Round to nearest; ties round toward zero.
    HalfDown,
    /// Round to nearest; ties round to the even neighbor.
    HalfEven,
    /// Assert that no rounding is needed; operations that would discard a
    /// nonzero fraction panic instead.
    Unnecessary,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        })
    }
}

/// An error returned when parsing a [`RoundingMode`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoundingModeError(());

impl fmt::Display for ParseRoundingModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown rounding mode")
    }
}

impl std::error::Error for ParseRoundingModeError {}

impl FromStr for RoundingMode {
    type Err = ParseRoundingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UP" => RoundingMode::Up,
            "DOWN" => RoundingMode::Down,
            "CEILING" => RoundingMode::Ceiling,
            "FLOOR" => RoundingMode::Floor,
            "HALF_UP" => RoundingMode::HalfUp,
            "HALF_DOWN" => RoundingMode::HalfDown,
            "HALF_EVEN" => RoundingMode::HalfEven,
            "UNNECESSARY" => RoundingMode::Unnecessary,
            _ => return Err(ParseRoundingModeError(())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let modes = [
            RoundingMode::Up,
            RoundingMode::Down,
            RoundingMode::Ceiling,
            RoundingMode::Floor,
            RoundingMode::HalfUp,
            RoundingMode::HalfDown,
            RoundingMode::HalfEven,
            RoundingMode::Unnecessary,
        ];
        for mode in modes {
            assert_eq!(mode.to_string().parse::<RoundingMode>().unwrap(), mode);
        }
        assert!("half_even".parse::<RoundingMode>().is_err());
        assert!("".parse::<RoundingMode>().is_err());
    }
}
