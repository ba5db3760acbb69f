//! Arbitrary-precision signed integers and decimals.
//!
//! This crate provides two immutable value types:
//!
//! - [`BigInt`]: a signed integer of unbounded magnitude (bit length below
//!   2^31), with multi-algorithm multiplication (schoolbook, Karatsuba,
//!   Toom-Cook-3), Knuth and Burnikel-Ziegler division, Montgomery modular
//!   exponentiation, hybrid gcd, modular inverses and probabilistic
//!   primality testing.
//! - [`BigDecimal`]: a signed decimal number represented as an unscaled
//!   integer coefficient and a 32-bit scale (`value = coefficient ×
//!   10^-scale`), with exact-result-then-round arithmetic controlled by
//!   [`MathContext`] and [`RoundingMode`].
//!
//! Both types are plain immutable values: cloning is deep, all operations
//! return new values, and shared read access from multiple threads needs no
//! synchronization.
//!
//! # Example
//!
//! ```
//! use bigmath::{BigDecimal, BigInt, MathContext, RoundingMode};
//! use std::str::FromStr;
//!
//! let a = BigInt::from_str("123456789012345678901234567890").unwrap();
//! assert_eq!((&a * &BigInt::from(-1)).to_string(),
//!            "-123456789012345678901234567890");
//!
//! let x = BigDecimal::from_str("1.10").unwrap();
//! let y = BigDecimal::from_str("2.30").unwrap();
//! assert_eq!((&x + &y).to_string(), "3.40");
//!
//! let mc = MathContext::new(3, RoundingMode::Floor);
//! let q = BigDecimal::from(19).divide_with_context(&BigDecimal::from(100), &mc);
//! assert_eq!(q.to_string(), "0.19");
//! ```
//!
//! # Randomized operations
//!
//! Random and probable-prime generation take the RNG from the caller; see
//! [`RandBigInt`] and [`RandPrime`]. Only [`BigInt::is_probable_prime`] and
//! [`BigInt::next_probable_prime`], which need witnesses but have no RNG
//! parameter, fall back to [`rand::rng()`].

#![deny(missing_docs)]
#![allow(clippy::many_single_char_names)]

use core::fmt;

#[macro_use]
mod macros;

mod big_digit;
mod bigdecimal;
mod bigint;
mod bigrand;
mod bit_sieve;
mod context;
mod mutable;
mod prime;
mod rounding;
mod traits;

#[cfg(feature = "serde")]
mod serde_impls;

pub use crate::bigdecimal::BigDecimal;
pub use crate::bigint::{BigInt, Sign};
pub use crate::bigrand::{RandBigInt, RandPrime, RandomBits, UniformBigInt};
pub use crate::context::{MathContext, ParseMathContextError};
pub use crate::rounding::{ParseRoundingModeError, RoundingMode};
pub use crate::traits::{ExtendedGcd, ModInverse};

/// An error returned when parsing a [`BigInt`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBigIntError {
    kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseErrorKind {
    Empty,
    InvalidDigit,
}

impl ParseBigIntError {
    pub(crate) fn empty() -> Self {
        ParseBigIntError {
            kind: ParseErrorKind::Empty,
        }
    }

    pub(crate) fn invalid() -> Self {
        ParseBigIntError {
            kind: ParseErrorKind::InvalidDigit,
        }
    }
}

impl fmt::Display for ParseBigIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::Empty => f.write_str("cannot parse integer from empty string"),
            ParseErrorKind::InvalidDigit => f.write_str("invalid digit found in string"),
        }
    }
}

impl std::error::Error for ParseBigIntError {}

/// An error returned when parsing a [`BigDecimal`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseBigDecimalError {
    /// The input was empty or contained only a sign.
    Empty,
    /// A character outside the decimal grammar was found, or the grammar
    /// was violated (e.g. two decimal points, an empty exponent).
    Invalid,
    /// The exponent did not fit the supported scale range.
    ExponentOverflow,
}

impl fmt::Display for ParseBigDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseBigDecimalError::Empty => f.write_str("cannot parse decimal from empty string"),
            ParseBigDecimalError::Invalid => f.write_str("invalid decimal literal"),
            ParseBigDecimalError::ExponentOverflow => f.write_str("exponent out of range"),
        }
    }
}

impl std::error::Error for ParseBigDecimalError {}

impl From<ParseBigIntError> for ParseBigDecimalError {
    fn from(_: ParseBigIntError) -> Self {
        ParseBigDecimalError::Invalid
    }
}
