//! Precision and rounding settings for decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use crate::rounding::RoundingMode;

/// A precision limit and [`RoundingMode`] pair controlling decimal
/// operations.
///
/// Precision is the maximum number of significant digits in a result; zero
/// means unlimited (exact) arithmetic. The predefined contexts match the
/// IEEE 754 decimal interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: u32,
    rounding_mode: RoundingMode,
}

impl MathContext {
    /// Unlimited precision; rounding never happens, and operations that
    /// cannot produce an exact result panic.
    pub const UNLIMITED: MathContext = MathContext {
        precision: 0,
        rounding_mode: RoundingMode::HalfUp,
    };

    /// 7 significant digits, half-even rounding (IEEE 754 decimal32).
    pub const DECIMAL32: MathContext = MathContext {
        precision: 7,
        rounding_mode: RoundingMode::HalfEven,
    };

    /// 16 significant digits, half-even rounding (IEEE 754 decimal64).
    pub const DECIMAL64: MathContext = MathContext {
        precision: 16,
        rounding_mode: RoundingMode::HalfEven,
    };

    /// 34 significant digits, half-even rounding (IEEE 754 decimal128).
    pub const DECIMAL128: MathContext = MathContext {
        precision: 34,
        rounding_mode: RoundingMode::HalfEven,
    };

    /// Creates a context with the given precision and rounding mode.
    pub fn new(precision: u32, rounding_mode: RoundingMode) -> MathContext {
        MathContext {
            precision,
            rounding_mode,
        }
    }

    /// Creates a context with the given precision and half-up rounding.
    pub fn with_precision(precision: u32) -> MathContext {
        MathContext::new(precision, RoundingMode::HalfUp)
    }

    /// The maximum number of significant digits; zero means unlimited.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// The rounding mode applied when a result exceeds the precision.
    #[inline]
    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} roundingMode={}",
            self.precision, self.rounding_mode
        )
    }
}

/// An error returned when parsing a [`MathContext`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMathContextError(());

impl fmt::Display for ParseMathContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid math context")
    }
}

impl std::error::Error for ParseMathContextError {}

impl FromStr for MathContext {
    type Err = ParseMathContextError;

    /// Parses the [`Display`](fmt::Display) form,
    /// `precision=N roundingMode=M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = ParseMathContextError(());
        let rest = s.strip_prefix("precision=").ok_or(bad.clone())?;
        let (digits, rest) = rest.split_once(' ').ok_or(bad.clone())?;
        let precision = digits.parse::<u32>().map_err(|_| bad.clone())?;
        let mode = rest.strip_prefix("roundingMode=").ok_or(bad.clone())?;
        let rounding_mode = mode.parse::<RoundingMode>().map_err(|_| bad)?;
        Ok(MathContext::new(precision, rounding_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_contexts() {
        assert_eq!(MathContext::UNLIMITED.precision(), 0);
        assert_eq!(MathContext::DECIMAL32.precision(), 7);
        assert_eq!(MathContext::DECIMAL64.precision(), 16);
        assert_eq!(MathContext::DECIMAL128.precision(), 34);
        assert_eq!(
            MathContext::DECIMAL64.rounding_mode(),
            RoundingMode::HalfEven
        );
    }

    #[test]
    fn test_display_round_trip() {
        let mc = MathContext::new(9, RoundingMode::Floor);
        assert_eq!(mc.to_string(), "precision=9 roundingMode=FLOOR");
        assert_eq!(mc.to_string().parse::<MathContext>().unwrap(), mc);
        assert!("precision=9".parse::<MathContext>().is_err());
        assert!("precision=x roundingMode=UP".parse::<MathContext>().is_err());
    }
}
