//! Bit operations over the conceptual infinite two's-complement expansion.
//!
//! The representation stays sign-and-magnitude; the two's-complement word at
//! any index is computed on demand (negative values have implicit infinite
//! leading one-bits), so no infinite array is ever materialized.

use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use num_traits::Zero;

use crate::big_digit::{bit_len, BigDigit};
use crate::bigint::Sign::{Minus, Plus};
use crate::bigint::BigInt;

impl BigInt {
    /// Bit length of the minimal two's-complement representation,
    /// excluding the sign bit. Zero has bit length 0.
    pub fn bits(&self) -> u64 {
        let len = self.mag.len();
        if len == 0 {
            return 0;
        }
        let n = 32 * (len as u64 - 1) + u64::from(bit_len(self.mag[0]));
        if self.sign == Minus {
            // A negative power of two needs one bit fewer.
            let pow2 = self.mag[0].count_ones() == 1 && self.mag[1..].iter().all(|&w| w == 0);
            if pow2 {
                return n - 1;
            }
        }
        n
    }

    /// Number of bits that differ from the sign bit in the two's-complement
    /// representation.
    pub fn bit_count(&self) -> u64 {
        let mut bc: u64 = self.mag.iter().map(|w| u64::from(w.count_ones())).sum();
        if self.sign == Minus {
            // Count the trailing zeros of the magnitude.
            let mut tz = 0u64;
            let mut j = self.mag.len() - 1;
            while self.mag[j] == 0 {
                tz += 32;
                j -= 1;
            }
            tz += u64::from(self.mag[j].trailing_zeros());
            // The magnitude is nonzero, so bc >= 1; subtract after adding
            // to stay in range when tz is 0.
            bc += tz;
            bc -= 1;
        }
        bc
    }

    /// Index of the lowest set bit, or `None` for zero.
    pub fn trailing_zeros(&self) -> Option<u64> {
        if self.is_zero() {
            return None;
        }
        let len = self.mag.len();
        let mut j = len - 1;
        let mut tz = 0u64;
        while self.mag[j] == 0 {
            tz += 32;
            j -= 1;
        }
        Some(tz + u64::from(self.mag[j].trailing_zeros()))
    }

    /// Tests bit `n` of the two's-complement representation (bit 0 is the
    /// least significant).
    pub fn test_bit(&self, n: u64) -> bool {
        (self.signed_word_at(n >> 5) >> (n & 31)) & 1 != 0
    }

    /// Returns a value equal to `self` with bit `n` set.
    pub fn set_bit(&self, n: u64) -> BigInt {
        self.with_bit_op(n, |w, mask| w | mask)
    }

    /// Returns a value equal to `self` with bit `n` cleared.
    pub fn clear_bit(&self, n: u64) -> BigInt {
        self.with_bit_op(n, |w, mask| w & !mask)
    }

    /// Returns a value equal to `self` with bit `n` flipped.
    pub fn flip_bit(&self, n: u64) -> BigInt {
        self.with_bit_op(n, |w, mask| w ^ mask)
    }

    fn with_bit_op(&self, n: u64, op: impl Fn(u32, u32) -> u32) -> BigInt {
        let word = (n >> 5) as usize;
        let len = self.twos_complement_len().max(word + 2);
        let mut result = vec![0u32; len];
        for i in 0..len {
            result[len - i - 1] = self.signed_word_at(i as u64);
        }
        let idx = len - word - 1;
        result[idx] = op(result[idx], 1u32 << (n & 31));
        BigInt::from_signed_words_be(&result)
    }

    /// `self & !other`, in one pass.
    pub fn and_not(&self, other: &BigInt) -> BigInt {
        bitwise(self, other, |a, b| a & !b)
    }

    /// Shift left; a negative distance shifts right.
    pub fn shift_left(&self, n: i64) -> BigInt {
        if n >= 0 {
            self.shift_left_unsigned(n as u64)
        } else {
            self.shift_right(-n)
        }
    }

    /// Arithmetic shift right (rounding toward negative infinity); a
    /// negative distance shifts left.
    pub fn shift_right(&self, n: i64) -> BigInt {
        if n < 0 {
            return self.shift_left_unsigned(n.unsigned_abs());
        }
        let n = n as u64;
        if n == 0 || self.is_zero() {
            return self.clone();
        }
        let n_words = (n >> 5) as usize;
        let n_bits = (n & 31) as u32;
        let mag_len = self.mag.len();
        if n_words >= mag_len {
            return if self.sign == Minus {
                -BigInt::from(1)
            } else {
                Zero::zero()
            };
        }

        let mut new_mag = shift_right_mag(&self.mag, n_words, n_bits);

        if self.sign == Minus {
            // If any one-bits were shifted off, round toward -infinity.
            let mut ones_lost = self.mag[mag_len - n_words..].iter().any(|&w| w != 0);
            if !ones_lost && n_bits != 0 {
                ones_lost = self.mag[mag_len - n_words - 1] << (32 - n_bits) != 0;
            }
            if ones_lost {
                new_mag = increment_mag(new_mag);
            }
        }
        BigInt::from_magnitude(self.sign, new_mag)
    }

    /// Multiplies the magnitude by 2^n, preserving the sign. Equal to the
    /// arithmetic left shift for every value.
    pub(crate) fn shift_left_unsigned(&self, n: u64) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        let n_words = (n >> 5) as usize;
        let n_bits = (n & 31) as u32;
        let mag_len = self.mag.len();
        let mut new_mag: Vec<u32>;
        if n_bits == 0 {
            new_mag = Vec::with_capacity(mag_len + n_words);
            new_mag.extend_from_slice(&self.mag);
        } else {
            let n_bits2 = 32 - n_bits;
            let high_bits = self.mag[0] >> n_bits2;
            new_mag = Vec::with_capacity(mag_len + n_words + 1);
            if high_bits != 0 {
                new_mag.push(high_bits);
            }
            for j in 0..mag_len - 1 {
                new_mag.push((self.mag[j] << n_bits) | (self.mag[j + 1] >> n_bits2));
            }
            new_mag.push(self.mag[mag_len - 1] << n_bits);
        }
        new_mag.resize(new_mag.len() + n_words, 0);
        BigInt::from_magnitude(self.sign, new_mag)
    }

    /// Divides the magnitude by 2^n, preserving the sign. Only valid where
    /// the shift is known to be exact (no one-bits discarded) or the value
    /// is non-negative.
    pub(crate) fn shift_right_exact(&self, n: u64) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        let n_words = (n >> 5) as usize;
        let n_bits = (n & 31) as u32;
        if n_words >= self.mag.len() {
            return Zero::zero();
        }
        BigInt::from_magnitude(self.sign, shift_right_mag(&self.mag, n_words, n_bits))
    }

    /// Two's-complement word at index `n` (0 = least significant),
    /// sign-extended indefinitely.
    pub(crate) fn signed_word_at(&self, n: u64) -> u32 {
        let len = self.mag.len() as u64;
        if n >= len {
            return self.sign_word();
        }
        let mag_word = self.mag[(len - 1 - n) as usize];
        if self.sign != Minus {
            mag_word
        } else {
            let fnz = self.first_nonzero_word_index();
            if n <= fnz {
                mag_word.wrapping_neg()
            } else {
                !mag_word
            }
        }
    }

    #[inline]
    fn sign_word(&self) -> u32 {
        if self.sign == Minus {
            u32::MAX
        } else {
            0
        }
    }

    /// Index (from the least significant end) of the lowest nonzero
    /// magnitude word. Only meaningful for nonzero values.
    fn first_nonzero_word_index(&self) -> u64 {
        let len = self.mag.len();
        let mut i = len;
        while i > 0 && self.mag[i - 1] == 0 {
            i -= 1;
        }
        (len - i) as u64
    }

    /// Number of words in the minimal two's-complement representation.
    pub(crate) fn twos_complement_len(&self) -> usize {
        ((self.bits() >> 5) + 1) as usize
    }

    /// Interprets a big-endian word array as two's complement.
    pub(crate) fn from_signed_words_be(val: &[BigDigit]) -> BigInt {
        if val.is_empty() {
            return Zero::zero();
        }
        if val[0] >> 31 != 0 {
            BigInt::from_magnitude(Minus, make_positive_words(val))
        } else {
            BigInt::from_magnitude(Plus, val.to_vec())
        }
    }
}

/// Magnitude of the negation of a two's-complement word array known to be
/// negative.
pub(crate) fn make_positive_words(val: &[BigDigit]) -> Vec<BigDigit> {
    let mut keep = 0;
    while keep < val.len() && val[keep] == u32::MAX {
        keep += 1;
    }
    let mut j = keep;
    while j < val.len() && val[j] == 0 {
        j += 1;
    }
    let extra = usize::from(j == val.len());
    let mut result = vec![0u32; val.len() - keep + extra];
    for i in keep..val.len() {
        result[i - keep + extra] = !val[i];
    }
    // Two's complement: add one to the complement.
    for i in (0..result.len()).rev() {
        result[i] = result[i].wrapping_add(1);
        if result[i] != 0 {
            break;
        }
    }
    result
}

fn shift_right_mag(mag: &[u32], n_words: usize, n_bits: u32) -> Vec<u32> {
    let mag_len = mag.len();
    if n_bits == 0 {
        mag[..mag_len - n_words].to_vec()
    } else {
        let high_bits = mag[0] >> n_bits;
        let new_len = mag_len - n_words;
        let mut new_mag = Vec::with_capacity(new_len);
        if high_bits != 0 {
            new_mag.push(high_bits);
        }
        let n_bits2 = 32 - n_bits;
        for j in 0..new_len - 1 {
            new_mag.push((mag[j] << n_bits2) | (mag[j + 1] >> n_bits));
        }
        new_mag
    }
}

fn increment_mag(mut mag: Vec<u32>) -> Vec<u32> {
    let mut i = mag.len();
    loop {
        if i == 0 {
            mag.insert(0, 1);
            break;
        }
        i -= 1;
        mag[i] = mag[i].wrapping_add(1);
        if mag[i] != 0 {
            break;
        }
    }
    mag
}

fn bitwise(x: &BigInt, y: &BigInt, f: impl Fn(u32, u32) -> u32) -> BigInt {
    let len = x.twos_complement_len().max(y.twos_complement_len());
    let mut result = vec![0u32; len];
    for i in 0..len {
        result[len - i - 1] = f(x.signed_word_at(i as u64), y.signed_word_at(i as u64));
    }
    BigInt::from_signed_words_be(&result)
}

forward_all_binop_to_ref_ref!(impl BitAnd for BigInt, bitand);

impl BitAnd<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitand(self, other: &BigInt) -> BigInt {
        bitwise(self, other, |a, b| a & b)
    }
}

forward_all_binop_to_ref_ref!(impl BitOr for BigInt, bitor);

impl BitOr<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitor(self, other: &BigInt) -> BigInt {
        bitwise(self, other, |a, b| a | b)
    }
}

forward_all_binop_to_ref_ref!(impl BitXor for BigInt, bitxor);

impl BitXor<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitxor(self, other: &BigInt) -> BigInt {
        bitwise(self, other, |a, b| a ^ b)
    }
}

impl Not for &BigInt {
    type Output = BigInt;

    fn not(self) -> BigInt {
        let len = self.twos_complement_len();
        let mut result = vec![0u32; len];
        for i in 0..len {
            result[len - i - 1] = !self.signed_word_at(i as u64);
        }
        BigInt::from_signed_words_be(&result)
    }
}

impl Not for BigInt {
    type Output = BigInt;

    #[inline]
    fn not(self) -> BigInt {
        !&self
    }
}

macro_rules! impl_shifts_unsigned {
    ($($t:ty),*) => {
        $(
            impl Shl<$t> for &BigInt {
                type Output = BigInt;

                #[inline]
                fn shl(self, n: $t) -> BigInt {
                    self.shift_left_unsigned(n as u64)
                }
            }

            impl Shl<$t> for BigInt {
                type Output = BigInt;

                #[inline]
                fn shl(self, n: $t) -> BigInt {
                    (&self).shift_left_unsigned(n as u64)
                }
            }

            impl Shr<$t> for &BigInt {
                type Output = BigInt;

                #[inline]
                fn shr(self, n: $t) -> BigInt {
                    self.shift_right(n as i64)
                }
            }

            impl Shr<$t> for BigInt {
                type Output = BigInt;

                #[inline]
                fn shr(self, n: $t) -> BigInt {
                    (&self).shift_right(n as i64)
                }
            }
        )*
    };
}

impl_shifts_unsigned!(u8, u16, u32, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn bi(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn test_bits() {
        assert_eq!(BigInt::zero().bits(), 0);
        assert_eq!(bi("1").bits(), 1);
        assert_eq!(bi("-1").bits(), 0);
        assert_eq!(bi("255").bits(), 8);
        assert_eq!(bi("256").bits(), 9);
        assert_eq!(bi("-256").bits(), 8);
        assert_eq!(bi("-255").bits(), 8);
        assert_eq!(bi("4294967296").bits(), 33);
    }

    #[test]
    fn test_bit_count() {
        assert_eq!(bi("0").bit_count(), 0);
        assert_eq!(bi("7").bit_count(), 3);
        // -8 = ...111000: three bits differ from the infinite sign bits.
        assert_eq!(bi("-8").bit_count(), 3);
        assert_eq!(bi("-1").bit_count(), 0);
        // Odd negatives have no trailing magnitude zeros.
        assert_eq!(bi("-7").bit_count(), 2);
        // -(2^64 + 1) = ...10111...1: a single zero at bit 64.
        assert_eq!(bi("-18446744073709551617").bit_count(), 1);
    }

    #[test]
    fn test_trailing_zeros() {
        assert_eq!(BigInt::zero().trailing_zeros(), None);
        assert_eq!(bi("1").trailing_zeros(), Some(0));
        assert_eq!(bi("96").trailing_zeros(), Some(5));
        assert_eq!(bi("-96").trailing_zeros(), Some(5));
        assert_eq!(bi("4294967296").trailing_zeros(), Some(32));
    }

    #[test]
    fn test_shifts_round_trip() {
        let v = bi("123456789123456789");
        assert_eq!(&v << 67u32 >> 67u32, v);
        assert_eq!((&v << 3u32), &v * BigInt::from(8));
    }

    #[test]
    fn test_arithmetic_shift_right_negative() {
        // Floor semantics: -7 >> 1 == -4.
        assert_eq!(bi("-7") >> 1u32, bi("-4"));
        assert_eq!(bi("-8") >> 1u32, bi("-4"));
        assert_eq!(bi("-1") >> 5u32, bi("-1"));
        assert_eq!(bi("-4294967296").shift_right(33), bi("-1"));
    }

    #[test]
    fn test_negative_shift_distance() {
        assert_eq!(bi("5").shift_left(-2), bi("1"));
        assert_eq!(bi("5").shift_right(-2), bi("20"));
    }

    #[test]
    fn test_bitwise_ops() {
        assert_eq!(bi("12") & bi("10"), bi("8"));
        assert_eq!(bi("12") | bi("10"), bi("14"));
        assert_eq!(bi("12") ^ bi("10"), bi("6"));
        assert_eq!(!bi("12"), bi("-13"));
        assert_eq!(bi("12").and_not(&bi("10")), bi("4"));
    }

    #[test]
    fn test_bitwise_negative_operands() {
        // Infinite sign extension semantics.
        assert_eq!(bi("-1") & bi("12345"), bi("12345"));
        assert_eq!(bi("-2") | bi("1"), bi("-1"));
        assert_eq!(bi("-6") ^ bi("3"), bi("-7"));
        assert_eq!(!bi("-1"), bi("0"));
        assert_eq!(bi("-6") & bi("-4"), bi("-8"));
        assert_eq!(bi("-6") | bi("-4"), bi("-2"));
    }

    #[test]
    fn test_bit_twiddling() {
        let v = bi("0");
        let v = v.set_bit(100);
        assert!(v.test_bit(100));
        assert_eq!(v.bits(), 101);
        assert_eq!(v.clear_bit(100), bi("0"));
        assert_eq!(v.flip_bit(100), bi("0"));
        assert!(bi("-1").test_bit(1000));
        assert!(!bi("5").test_bit(1));
        // Setting a bit on a negative number follows two's complement.
        assert_eq!(bi("-8").set_bit(0), bi("-7"));
        assert_eq!(bi("-7").clear_bit(0), bi("-8"));
    }

    #[test]
    fn test_large_word_boundary_shifts() {
        let v = bi("340282366920938463463374607431768211455"); // 2^128 - 1
        assert_eq!((&v << 32usize) >> 32usize, v);
        assert_eq!(v.shift_right_exact(0), v);
    }
}
