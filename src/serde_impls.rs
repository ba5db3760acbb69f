//! Serde support, enabled by the `serde` feature.
//!
//! The durable form carries only what cannot be recomputed: a `BigInt` is
//! `(signum, big-endian magnitude bytes)` and a `BigDecimal` is
//! `(unscaled value, scale)`. Derived attributes such as precision are
//! rebuilt on load, and a sign inconsistent with the magnitude is
//! rejected rather than trusted.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bigdecimal::BigDecimal;
use crate::bigint::{BigInt, Sign};

impl Serialize for BigInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (sign, bytes) = self.to_bytes_be();
        let signum: i8 = match sign {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        };
        (signum, bytes).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let (signum, bytes) = <(i8, Vec<u8>)>::deserialize(deserializer)?;
        let sign = match signum {
            -1 => Sign::Minus,
            0 => Sign::NoSign,
            1 => Sign::Plus,
            _ => return Err(D::Error::custom("signum out of range")),
        };
        let magnitude_is_zero = bytes.iter().all(|&b| b == 0);
        if (sign == Sign::NoSign) != magnitude_is_zero {
            return Err(D::Error::custom("sign inconsistent with magnitude"));
        }
        Ok(BigInt::from_bytes_be(sign, &bytes))
    }
}

impl Serialize for BigDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.unscaled_value(), self.scale()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let (unscaled, scale) = <(BigInt, i32)>::deserialize(deserializer)?;
        Ok(BigDecimal::new(unscaled, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn test_bigint_tokens() {
        assert_tokens(
            &BigInt::from(255),
            &[
                Token::Tuple { len: 2 },
                Token::I8(1),
                Token::Seq { len: Some(1) },
                Token::U8(255),
                Token::SeqEnd,
                Token::TupleEnd,
            ],
        );
        assert_tokens(
            &BigInt::from(-0x0102),
            &[
                Token::Tuple { len: 2 },
                Token::I8(-1),
                Token::Seq { len: Some(2) },
                Token::U8(1),
                Token::U8(2),
                Token::SeqEnd,
                Token::TupleEnd,
            ],
        );
    }

    #[test]
    fn test_bigint_zero_tokens() {
        assert_tokens(
            &BigInt::from(0),
            &[
                Token::Tuple { len: 2 },
                Token::I8(0),
                Token::Seq { len: Some(1) },
                Token::U8(0),
                Token::SeqEnd,
                Token::TupleEnd,
            ],
        );
    }

    #[test]
    fn test_bigint_rejects_inconsistent_sign() {
        assert_de_tokens_error::<BigInt>(
            &[
                Token::Tuple { len: 2 },
                Token::I8(0),
                Token::Seq { len: Some(1) },
                Token::U8(7),
                Token::SeqEnd,
                Token::TupleEnd,
            ],
            "sign inconsistent with magnitude",
        );
        assert_de_tokens_error::<BigInt>(
            &[
                Token::Tuple { len: 2 },
                Token::I8(2),
                Token::Seq { len: Some(1) },
                Token::U8(7),
                Token::SeqEnd,
                Token::TupleEnd,
            ],
            "signum out of range",
        );
    }

    #[test]
    fn test_bigdecimal_tokens() {
        let d: BigDecimal = "0.19".parse().unwrap();
        assert_tokens(
            &d,
            &[
                Token::Tuple { len: 2 },
                Token::Tuple { len: 2 },
                Token::I8(1),
                Token::Seq { len: Some(1) },
                Token::U8(19),
                Token::SeqEnd,
                Token::TupleEnd,
                Token::I32(2),
                Token::TupleEnd,
            ],
        );
    }
}
