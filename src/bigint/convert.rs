//! Conversions between `BigInt` and strings, bytes, and machine numbers.
//!
//! Radix strings are processed a chunk at a time: the largest power of the
//! radix fitting a machine word becomes a "super digit", so the expensive
//! big-integer work runs once per chunk instead of once per digit. Very
//! large values switch to a recursive divide-and-conquer conversion with a
//! cache of radix powers.

use core::fmt;
use core::str::FromStr;
use std::sync::{LazyLock, RwLock};

use num_traits::{FromPrimitive, One, Signed, Zero};

use crate::big_digit::bit_len;
use crate::bigint::Sign::{Minus, NoSign, Plus};
use crate::bigint::{multiplication, BigInt, Sign};
use crate::mutable::MutableBigInt;
use crate::ParseBigIntError;

/// Word count above which string conversion recurses instead of dividing
/// out one chunk at a time.
const SCHOENHAGE_BASE_CONVERSION_THRESHOLD: usize = 20;

const LOG_TWO: f64 = core::f64::consts::LN_2;

/// Digits of each radix (index `radix - 2`) that fit in a `u32`.
const DIGITS_PER_U32: [u8; 35] = [
    30, 19, 15, 13, 11, 11, 10, 9, 9, 8, 8, 8, 8, 7, 7, 7, 7, 7, 7, 7, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 5,
];

/// `radix^DIGITS_PER_U32[radix - 2]`, the super digit used while parsing.
const U32_RADIX: [u32; 35] = [
    0x4000_0000,
    0x4546_b3db,
    0x4000_0000,
    0x48c2_7395,
    0x159f_d800,
    0x75db_9c97,
    0x4000_0000,
    0x1717_9149,
    0x3b9a_ca00,
    0x0cc6_db61,
    0x19a1_0000,
    0x309f_1021,
    0x57f6_c100,
    0x0a2f_1b6f,
    0x1000_0000,
    0x1875_4571,
    0x247d_bc80,
    0x3547_667b,
    0x4c4b_4000,
    0x6b5a_6e1d,
    0x06c2_0a40,
    0x08d2_d931,
    0x0b64_0000,
    0x0e8d_4a51,
    0x1269_ae40,
    0x1717_9149,
    0x1cb9_1000,
    0x2374_4899,
    0x2b73_a840,
    0x34e6_3b41,
    0x4000_0000,
    0x4cfa_3cc1,
    0x5c13_d840,
    0x6d91_b519,
    0x039a_a400,
];

/// Digits of each radix that fit in a `u64`, for printing.
const DIGITS_PER_U64: [u8; 35] = [
    61, 39, 30, 26, 23, 22, 20, 19, 18, 17, 17, 16, 16, 15, 15, 15, 14, 14, 14, 14, 13, 13, 13,
    13, 13, 13, 12, 12, 12, 12, 12, 12, 12, 12, 11,
];

/// `radix^DIGITS_PER_U64[radix - 2]`.
const U64_RADIX: [u64; 35] = [
    2305843009213693952,
    4052555153018976267,
    1152921504606846976,
    1490116119384765625,
    789730223053602816,
    3909821048582988049,
    1152921504606846976,
    1350851717672992089,
    1000000000000000000,
    505447028499293771,
    2218611106740436992,
    665416609183179841,
    2177953337809371136,
    437893890380859375,
    1152921504606846976,
    2862423051509815793,
    374813367582081024,
    799006685782884121,
    1638400000000000000,
    3243919932521508681,
    282810057883082752,
    504036361936467383,
    876488338465357824,
    1490116119384765625,
    2481152873203736576,
    4052555153018976267,
    232218265089212416,
    353814783205469041,
    531441000000000000,
    787662783788549761,
    1152921504606846976,
    1667889514952984961,
    2386420683693101056,
    3379220508056640625,
    131621703842267136,
];

const DIGIT_CHARS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Cached powers `radix^(2^i)` for the recursive string conversion,
/// extended on demand under a write lock.
static POWER_CACHE: LazyLock<RwLock<Vec<Vec<BigInt>>>> = LazyLock::new(|| {
    RwLock::new(
        (0u32..37)
            .map(|r| {
                if r >= 2 {
                    vec![BigInt::from(r)]
                } else {
                    Vec::new()
                }
            })
            .collect(),
    )
});

fn radix_conversion_cache(radix: u32, exponent: usize) -> BigInt {
    {
        let cache = POWER_CACHE.read().expect("power cache poisoned");
        let line = &cache[radix as usize];
        if exponent < line.len() {
            return line[exponent].clone();
        }
    }
    let mut cache = POWER_CACHE.write().expect("power cache poisoned");
    let line = &mut cache[radix as usize];
    while line.len() <= exponent {
        let last = line.last().expect("cache line seeded");
        let next = multiplication::square(last);
        line.push(next);
    }
    line[exponent].clone()
}

impl BigInt {
    /// Parses a value from an ASCII string in the given radix, with an
    /// optional leading `+` or `-`.
    ///
    /// # Panics
    ///
    /// Panics if the radix is outside `2..=36`.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<BigInt, ParseBigIntError> {
        assert!((2..=36).contains(&radix), "radix must be within 2..=36");
        let (sign, digits) = match s.as_bytes().first() {
            Some(b'+') => (Plus, &s[1..]),
            Some(b'-') => (Minus, &s[1..]),
            _ => (Plus, s),
        };
        if digits.is_empty() {
            return Err(ParseBigIntError::empty());
        }

        let bytes = digits.as_bytes();
        let dpu = usize::from(DIGITS_PER_U32[(radix - 2) as usize]);
        let super_radix = U32_RADIX[(radix - 2) as usize];

        let first_len = match bytes.len() % dpu {
            0 => dpu.min(bytes.len()),
            m => m,
        };
        let mut mag = vec![parse_chunk(&bytes[..first_len], radix)?];
        let mut pos = first_len;
        while pos < bytes.len() {
            let chunk = parse_chunk(&bytes[pos..pos + dpu], radix)?;
            destructive_mul_add(&mut mag, super_radix, chunk);
            pos += dpu;
        }
        Ok(BigInt::from_magnitude(sign, mag))
    }

    /// Renders the value in the given radix using lowercase digits, with a
    /// leading `-` when negative.
    ///
    /// # Panics
    ///
    /// Panics if the radix is outside `2..=36`.
    pub fn to_str_radix(&self, radix: u32) -> String {
        assert!((2..=36).contains(&radix), "radix must be within 2..=36");
        if self.is_zero() {
            return "0".to_owned();
        }
        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        let abs = self.abs();
        if abs.len() <= SCHOENHAGE_BASE_CONVERSION_THRESHOLD {
            small_to_string(&abs, radix, &mut out, 0);
        } else {
            recursive_to_string(&abs, radix, &mut out, 0);
        }
        out
    }

    /// Builds a value from a sign and big-endian bytes of the magnitude.
    ///
    /// # Panics
    ///
    /// Panics if `sign` is `NoSign` but the bytes are nonzero.
    pub fn from_bytes_be(sign: Sign, bytes: &[u8]) -> BigInt {
        let mut mag = Vec::with_capacity((bytes.len() + 3) / 4);
        let lead = bytes.len() % 4;
        if lead > 0 {
            let mut w = 0u32;
            for &b in &bytes[..lead] {
                w = (w << 8) | u32::from(b);
            }
            mag.push(w);
        }
        for chunk in bytes[lead..].chunks_exact(4) {
            mag.push(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        BigInt::from_slice(sign, &mag)
    }

    /// The sign and big-endian bytes of the magnitude, without leading
    /// zeros. Zero yields `(NoSign, vec![0])`.
    pub fn to_bytes_be(&self) -> (Sign, Vec<u8>) {
        if self.is_zero() {
            return (NoSign, vec![0]);
        }
        let mut bytes = Vec::with_capacity(self.mag.len() * 4);
        let first = self.mag[0].to_be_bytes();
        let skip = (self.mag[0].leading_zeros() / 8) as usize;
        bytes.extend_from_slice(&first[skip..]);
        for &w in &self.mag[1..] {
            bytes.extend_from_slice(&w.to_be_bytes());
        }
        (self.sign, bytes)
    }

    /// Interprets big-endian bytes as a two's complement value. An empty
    /// slice is zero.
    pub fn from_signed_bytes_be(digits: &[u8]) -> BigInt {
        match digits.first() {
            None => Zero::zero(),
            Some(&b) if b & 0x80 == 0 => BigInt::from_bytes_be(Plus, digits),
            Some(_) => {
                let inverted: Vec<u8> = digits.iter().map(|&b| !b).collect();
                -(BigInt::from_bytes_be(Plus, &inverted) + BigInt::one())
            }
        }
    }

    /// The shortest big-endian two's complement encoding with a correct
    /// sign bit; zero is a single `0` byte.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        let byte_len = (self.bits() / 8 + 1) as usize;
        let mut bytes = vec![0u8; byte_len];
        for i in 0..byte_len {
            let word = self.signed_word_at((i / 4) as u64);
            bytes[byte_len - 1 - i] = (word >> ((i % 4) * 8)) as u8;
        }
        bytes
    }
}

fn parse_chunk(chunk: &[u8], radix: u32) -> Result<u32, ParseBigIntError> {
    let mut v = 0u32;
    for &b in chunk {
        let d = (b as char)
            .to_digit(radix)
            .ok_or_else(ParseBigIntError::invalid)?;
        v = v * radix + d;
    }
    Ok(v)
}

/// `mag = mag * y + z` in place, growing by at most one word.
fn destructive_mul_add(mag: &mut Vec<u32>, y: u32, z: u32) {
    let yl = u64::from(y);
    let mut carry = 0u64;
    for w in mag.iter_mut().rev() {
        let product = u64::from(*w) * yl + carry;
        *w = product as u32;
        carry = product >> 32;
    }
    let mut add = u64::from(z);
    for w in mag.iter_mut().rev() {
        if add == 0 {
            break;
        }
        let t = u64::from(*w) + add;
        *w = t as u32;
        add = t >> 32;
    }
    carry += add;
    if carry != 0 {
        mag.insert(0, carry as u32);
    }
}

fn pad_with_zeros(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('0');
    }
}

fn u64_to_radix(mut v: u64, radix: u32) -> String {
    if v == 0 {
        return "0".to_owned();
    }
    let r = u64::from(radix);
    let mut buf = Vec::new();
    while v != 0 {
        buf.push(DIGIT_CHARS[(v % r) as usize]);
        v /= r;
    }
    buf.reverse();
    String::from_utf8(buf).expect("ascii digits")
}

/// Converts a non-negative value by dividing out one `u64` super digit at
/// a time, left-padded with zeros to `digits` total when recursing.
fn small_to_string(u: &BigInt, radix: u32, out: &mut String, digits: usize) {
    if u.is_zero() {
        pad_with_zeros(out, digits);
        return;
    }
    let d = U64_RADIX[(radix - 2) as usize];
    let dpl = usize::from(DIGITS_PER_U64[(radix - 2) as usize]);

    let mut groups: Vec<u64> = Vec::new();
    let mut tmp = MutableBigInt::from_big(u);
    while !tmp.is_zero() {
        let (q, r) = tmp.divide_u64(d);
        groups.push(r);
        tmp = q;
    }

    let first = u64_to_radix(groups[groups.len() - 1], radix);
    pad_with_zeros(
        out,
        digits.saturating_sub(first.len() + (groups.len() - 1) * dpl),
    );
    out.push_str(&first);
    for &g in groups[..groups.len() - 1].iter().rev() {
        let s = u64_to_radix(g, radix);
        pad_with_zeros(out, dpl - s.len());
        out.push_str(&s);
    }
}

/// Schoenhage recursive base conversion: split around a cached power
/// `radix^(2^n)` near the square root and convert both halves.
fn recursive_to_string(u: &BigInt, radix: u32, out: &mut String, digits: usize) {
    if u.len() <= SCHOENHAGE_BASE_CONVERSION_THRESHOLD {
        small_to_string(u, radix, out, digits);
        return;
    }
    let b = u.bits();
    let n = ((b as f64 * LOG_TWO / (radix as f64).ln()).log2() - 1.0).round() as usize;
    let v = radix_conversion_cache(radix, n);
    let (q, r) = u.div_rem(&v);
    let expected_digits = 1usize << n;
    recursive_to_string(&q, radix, out, digits.saturating_sub(expected_digits));
    recursive_to_string(&r, radix, out, expected_digits);
}

impl FromStr for BigInt {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<BigInt, ParseBigIntError> {
        BigInt::from_str_radix(s, 10)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "", &self.abs().to_str_radix(10))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Binary for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0b", &self.abs().to_str_radix(2))
    }
}

impl fmt::Octal for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0o", &self.abs().to_str_radix(8))
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0x", &self.abs().to_str_radix(16))
    }
}

impl fmt::UpperHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.abs().to_str_radix(16);
        s.make_ascii_uppercase();
        f.pad_integral(!self.is_negative(), "0x", &s)
    }
}

impl FromPrimitive for BigInt {
    fn from_i64(n: i64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    fn from_u64(n: u64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    fn from_i128(n: i128) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    fn from_u128(n: u128) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    fn from_f64(n: f64) -> Option<BigInt> {
        if !n.is_finite() {
            return None;
        }
        let truncated = n.trunc();
        if truncated == 0.0 {
            return Some(Zero::zero());
        }
        // Decompose |truncated| as mantissa * 2^exponent exactly.
        let bits = truncated.abs().to_bits();
        let raw_exp = (bits >> 52) as i64;
        let (mantissa, exponent) = if raw_exp == 0 {
            (bits & ((1u64 << 52) - 1), -1074i64)
        } else {
            ((bits & ((1u64 << 52) - 1)) | (1u64 << 52), raw_exp - 1075)
        };
        let mut value = BigInt::from(mantissa);
        if exponent >= 0 {
            value = value.shift_left_unsigned(exponent as u64);
        } else {
            value = value.shift_right_exact((-exponent) as u64);
        }
        if truncated.is_sign_negative() {
            value = -value;
        }
        Some(value)
    }
}

impl BigInt {
    /// The low 32 bits of the two's-complement form, as a narrowing cast
    /// would produce them; the sign can flip. Use
    /// [`ToPrimitive`](num_traits::ToPrimitive) for checked conversion.
    pub fn to_i32_wrapping(&self) -> i32 {
        self.to_i64_wrapping() as i32
    }

    /// The low 64 bits of the two's-complement form; the sign can flip.
    pub fn to_i64_wrapping(&self) -> i64 {
        let low = low_u64(&self.mag);
        if self.is_negative() {
            low.wrapping_neg() as i64
        } else {
            low as i64
        }
    }
}

fn low_u64(mag: &[u32]) -> u64 {
    match mag.len() {
        0 => 0,
        1 => u64::from(mag[0]),
        n => (u64::from(mag[n - 2]) << 32) | u64::from(mag[n - 1]),
    }
}

fn low_u128(mag: &[u32]) -> u128 {
    let mut v = 0u128;
    for &w in &mag[mag.len().saturating_sub(4)..] {
        v = (v << 32) | u128::from(w);
    }
    v
}

pub(crate) fn to_u64_exact(x: &BigInt) -> Option<u64> {
    if x.is_negative() || x.mag.len() > 2 {
        return None;
    }
    Some(low_u64(&x.mag))
}

pub(crate) fn to_i64_exact(x: &BigInt) -> Option<i64> {
    if x.mag.len() > 2 {
        return None;
    }
    let mag = low_u64(&x.mag);
    if x.is_negative() {
        if mag > 1 << 63 {
            return None;
        }
        Some(mag.wrapping_neg() as i64)
    } else {
        if mag > i64::MAX as u64 {
            return None;
        }
        Some(mag as i64)
    }
}

pub(crate) fn to_u128_exact(x: &BigInt) -> Option<u128> {
    if x.is_negative() || x.mag.len() > 4 {
        return None;
    }
    Some(low_u128(&x.mag))
}

pub(crate) fn to_i128_exact(x: &BigInt) -> Option<i128> {
    if x.mag.len() > 4 {
        return None;
    }
    let mag = low_u128(&x.mag);
    if x.is_negative() {
        if mag > 1 << 127 {
            return None;
        }
        Some(mag.wrapping_neg() as i128)
    } else {
        if mag > i128::MAX as u128 {
            return None;
        }
        Some(mag as i128)
    }
}

/// Correctly rounded (half to even) conversion to `f64`; saturates to
/// infinity beyond the exponent range.
pub(crate) fn to_f64_nearest(x: &BigInt) -> f64 {
    if x.is_zero() {
        return 0.0;
    }
    let exponent = 32 * (x.mag.len() as i64 - 1) + i64::from(bit_len(x.mag[0])) - 1;
    if exponent < 63 {
        return to_i64_exact(x).expect("below 63 bits") as f64;
    }
    if exponent > 1023 {
        return if x.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let shift = exponent - 53;
    let shifted = x.abs().shift_right_exact(shift as u64);
    let twice_signif_floor = low_u64(&shifted.mag);
    let signif_floor = (twice_signif_floor >> 1) & ((1u64 << 52) - 1);

    // Round up iff the fractional part exceeds 1/2, or equals 1/2 and the
    // floor significand is odd.
    let sticky = x.trailing_zeros().expect("nonzero") < shift as u64;
    let increment = twice_signif_floor & 1 != 0 && (signif_floor & 1 != 0 || sticky);
    let signif_rounded = signif_floor + u64::from(increment);

    // A significand overflow carries into the exponent field, which is the
    // correct IEEE result.
    let mut bits = ((exponent + 1023) as u64) << 52;
    bits += signif_rounded;
    if x.is_negative() {
        bits |= 1u64 << 63;
    }
    f64::from_bits(bits)
}

/// Correctly rounded (half to even) conversion to `f32`.
pub(crate) fn to_f32_nearest(x: &BigInt) -> f32 {
    if x.is_zero() {
        return 0.0;
    }
    let exponent = 32 * (x.mag.len() as i64 - 1) + i64::from(bit_len(x.mag[0])) - 1;
    if exponent < 63 {
        return to_i64_exact(x).expect("below 63 bits") as f32;
    }
    if exponent > 127 {
        return if x.is_negative() {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
    }

    let shift = exponent - 24;
    let shifted = x.abs().shift_right_exact(shift as u64);
    let twice_signif_floor = low_u64(&shifted.mag) as u32;
    let signif_floor = (twice_signif_floor >> 1) & ((1u32 << 23) - 1);

    let sticky = x.trailing_zeros().expect("nonzero") < shift as u64;
    let increment = twice_signif_floor & 1 != 0 && (signif_floor & 1 != 0 || sticky);
    let signif_rounded = signif_floor + u32::from(increment);

    let mut bits = ((exponent + 127) as u32) << 23;
    bits += signif_rounded;
    if x.is_negative() {
        bits |= 1u32 << 31;
    }
    f32::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use crate::bigrand::RandBigInt;

    fn big(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(big("0"), BigInt::zero());
        assert_eq!(big("-0"), BigInt::zero());
        assert_eq!(big("00012"), BigInt::from(12));
        assert_eq!(big("+37"), BigInt::from(37));
        assert_eq!(
            big("123456789012345678901234567890").to_string(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(BigInt::from_str("").is_err());
        assert!(BigInt::from_str("-").is_err());
        assert!(BigInt::from_str("12x4").is_err());
        assert!(BigInt::from_str_radix("129", 8).is_err());
        assert!(BigInt::from_str("１２").is_err());
    }

    #[test]
    fn test_radix_round_trips() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for &radix in &[2u32, 3, 8, 10, 16, 21, 36] {
            for _ in 0..8 {
                let x = rng.gen_bigint(300);
                let s = x.to_str_radix(radix);
                assert_eq!(BigInt::from_str_radix(&s, radix).unwrap(), x, "radix {}", radix);
            }
        }
    }

    #[test]
    fn test_to_str_radix_known_values() {
        assert_eq!(BigInt::from(255).to_str_radix(16), "ff");
        assert_eq!(BigInt::from(-255).to_str_radix(16), "-ff");
        assert_eq!(BigInt::from(35).to_str_radix(36), "z");
        assert_eq!(BigInt::from(8).to_str_radix(2), "1000");
        assert_eq!(BigInt::zero().to_str_radix(7), "0");
    }

    #[test]
    fn test_recursive_to_string_threshold() {
        // 30 words is past the recursion threshold.
        let x = BigInt::from(7).pow(1200);
        let s = x.to_str_radix(10);
        assert_eq!(big(&s), x);
        // Interior zero blocks must keep their padding.
        let y = BigInt::from(10).pow(900);
        assert_eq!(y.to_str_radix(10).len(), 901);
        assert_eq!(big(&y.to_str_radix(10)), y);
    }

    #[test]
    fn test_formatting() {
        let x = BigInt::from(-3405691582i64);
        assert_eq!(format!("{}", x), "-3405691582");
        assert_eq!(format!("{:?}", x), "-3405691582");
        assert_eq!(format!("{:x}", x), "-cafebabe");
        assert_eq!(format!("{:X}", x), "-CAFEBABE");
        assert_eq!(format!("{:#x}", BigInt::from(255)), "0xff");
        assert_eq!(format!("{:b}", BigInt::from(5)), "101");
        assert_eq!(format!("{:o}", BigInt::from(8)), "10");
        assert_eq!(format!("{:010}", BigInt::from(-42)), "-000000042");
    }

    #[test]
    fn test_bytes_be_round_trip() {
        let x = big("1311768467463790320");
        let (sign, bytes) = x.to_bytes_be();
        assert_eq!(sign, Plus);
        assert_eq!(bytes, vec![0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]);
        assert_eq!(BigInt::from_bytes_be(sign, &bytes), x);

        assert_eq!(BigInt::zero().to_bytes_be(), (NoSign, vec![0]));
    }

    #[test]
    fn test_signed_bytes() {
        assert_eq!(BigInt::from(-1).to_signed_bytes_be(), vec![0xff]);
        assert_eq!(BigInt::from(-128).to_signed_bytes_be(), vec![0x80]);
        assert_eq!(BigInt::from(128).to_signed_bytes_be(), vec![0x00, 0x80]);
        assert_eq!(BigInt::from(-129).to_signed_bytes_be(), vec![0xff, 0x7f]);
        assert_eq!(BigInt::from_signed_bytes_be(&[0xff, 0x7f]), BigInt::from(-129));
        assert_eq!(BigInt::from_signed_bytes_be(&[]), BigInt::zero());

        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..20 {
            let x = rng.gen_bigint(190);
            assert_eq!(BigInt::from_signed_bytes_be(&x.to_signed_bytes_be()), x);
        }
    }

    #[test]
    fn test_to_primitive_exact() {
        assert_eq!(BigInt::from(i64::MAX).to_i64(), Some(i64::MAX));
        assert_eq!(BigInt::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!((BigInt::from(i64::MAX) + BigInt::one()).to_i64(), None);
        assert_eq!((BigInt::from(i64::MIN) - BigInt::one()).to_i64(), None);
        assert_eq!(BigInt::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(BigInt::from(-1).to_u64(), None);
        assert_eq!(BigInt::from(i128::MIN).to_i128(), Some(i128::MIN));
        assert_eq!(BigInt::from(u128::MAX).to_u128(), Some(u128::MAX));
        assert_eq!((BigInt::from(u128::MAX) + BigInt::one()).to_u128(), None);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(BigInt::from(3).to_f64(), Some(3.0));
        assert_eq!(BigInt::from(-3).to_f64(), Some(-3.0));
        // 2^90 is exactly representable.
        assert_eq!(BigInt::from(2).pow(90).to_f64(), Some(2f64.powi(90)));
        // Round-half-to-even at the 53-bit boundary.
        let x = BigInt::from((1u64 << 53) + 1);
        assert_eq!(x.to_f64(), Some(9007199254740992.0));
        let y = BigInt::from((1u64 << 53) + 3);
        assert_eq!(y.to_f64(), Some(9007199254740996.0));
        // Beyond the range saturates.
        assert_eq!(BigInt::from(2).pow(1100).to_f64(), Some(f64::INFINITY));
        assert_eq!((-BigInt::from(2).pow(1100)).to_f64(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_to_f32() {
        assert_eq!(BigInt::from(1 << 24).to_f32(), Some(16777216.0));
        let x = BigInt::from((1u64 << 24) + 1) * BigInt::from(1u64 << 30);
        // Halfway cases round to even.
        assert_eq!(x.to_f32(), Some(((1u64 << 24) as f32) * 2f32.powi(30)));
        assert_eq!(BigInt::from(2).pow(200).to_f32(), Some(f32::INFINITY));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(BigInt::from_f64(3.9), Some(BigInt::from(3)));
        assert_eq!(BigInt::from_f64(-3.9), Some(BigInt::from(-3)));
        assert_eq!(BigInt::from_f64(0.25), Some(BigInt::zero()));
        assert_eq!(BigInt::from_f64(2f64.powi(80)), Some(BigInt::from(2).pow(80)));
        assert_eq!(BigInt::from_f64(f64::NAN), None);
        assert_eq!(BigInt::from_f64(f64::INFINITY), None);
    }
}
