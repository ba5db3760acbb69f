//! Word-level primitives shared by the integer and decimal code.
//!
//! A `BigDigit` is one 32-bit word of a magnitude; a `DoubleBigDigit` holds
//! the result of a 32×32 multiply or a two-word window during division.

/// One word of a big-integer magnitude.
pub(crate) type BigDigit = u32;

/// Two words, used for intermediate products and dividend windows.
pub(crate) type DoubleBigDigit = u64;

/// Bits in one `BigDigit`.
pub(crate) const BITS: u32 = 32;

pub(crate) const BASE: DoubleBigDigit = 1 << BITS;

#[inline]
pub(crate) fn big_digit(hi: BigDigit, lo: BigDigit) -> DoubleBigDigit {
    (DoubleBigDigit::from(hi) << BITS) | DoubleBigDigit::from(lo)
}

#[inline]
pub(crate) fn hi(n: DoubleBigDigit) -> BigDigit {
    (n >> BITS) as BigDigit
}

#[inline]
pub(crate) fn lo(n: DoubleBigDigit) -> BigDigit {
    n as BigDigit
}

/// Splits a double word into `(hi, lo)`.
#[inline]
pub(crate) fn from_double(n: DoubleBigDigit) -> (BigDigit, BigDigit) {
    (hi(n), lo(n))
}

/// `a + b + carry`, returning the low word and the carry out.
#[inline]
pub(crate) fn adc(a: BigDigit, b: BigDigit, carry: BigDigit) -> (BigDigit, BigDigit) {
    let t = DoubleBigDigit::from(a) + DoubleBigDigit::from(b) + DoubleBigDigit::from(carry);
    (lo(t), hi(t))
}

/// `a - b - borrow`, returning the low word and the borrow out (0 or 1).
#[inline]
pub(crate) fn sbb(a: BigDigit, b: BigDigit, borrow: BigDigit) -> (BigDigit, BigDigit) {
    let t = BASE + DoubleBigDigit::from(a) - DoubleBigDigit::from(b) - DoubleBigDigit::from(borrow);
    (lo(t), 1 - hi(t))
}

/// `a * b + c + carry`, returning the low word and the new carry.
#[inline]
pub(crate) fn mac_with_carry(a: BigDigit, b: BigDigit, c: BigDigit, carry: BigDigit) -> (BigDigit, BigDigit) {
    let t = DoubleBigDigit::from(a) * DoubleBigDigit::from(b)
        + DoubleBigDigit::from(c)
        + DoubleBigDigit::from(carry);
    (lo(t), hi(t))
}

/// Divides the two-word value `(hi, lo)` by `divisor`, returning
/// `(quotient, remainder)`. Requires `hi < divisor` so the quotient fits in
/// one word.
#[inline]
pub(crate) fn div_wide(hi: BigDigit, lo: BigDigit, divisor: BigDigit) -> (BigDigit, BigDigit) {
    debug_assert!(hi < divisor);
    let n = big_digit(hi, lo);
    let d = DoubleBigDigit::from(divisor);
    ((n / d) as BigDigit, (n % d) as BigDigit)
}

/// Bit length of a single word (position of the highest set bit plus one).
#[inline]
pub(crate) fn bit_len(w: BigDigit) -> u32 {
    BITS - w.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_carries() {
        assert_eq!(adc(u32::MAX, 1, 0), (0, 1));
        assert_eq!(adc(u32::MAX, u32::MAX, 1), (u32::MAX, 1));
        assert_eq!(adc(1, 2, 0), (3, 0));
    }

    #[test]
    fn sbb_borrows() {
        assert_eq!(sbb(0, 1, 0), (u32::MAX, 1));
        assert_eq!(sbb(5, 3, 1), (1, 0));
        assert_eq!(sbb(0, 0, 1), (u32::MAX, 1));
    }

    #[test]
    fn div_wide_round_trip() {
        let (q, r) = div_wide(3, 0x8000_0001, 7);
        assert_eq!(u64::from(q) * 7 + u64::from(r), big_digit(3, 0x8000_0001));
        assert!(r < 7);
    }

    #[test]
    fn bit_len_edges() {
        assert_eq!(bit_len(0), 0);
        assert_eq!(bit_len(1), 1);
        assert_eq!(bit_len(u32::MAX), 32);
    }
}
