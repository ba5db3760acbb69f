//! The immutable arbitrary-precision signed integer.

use core::cmp::Ordering::{self, Equal, Greater, Less};
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Neg, Rem, Sub};

use num_integer::Integer;
use num_traits::{Num, One, Pow, Signed, ToPrimitive, Zero};

use crate::big_digit::BigDigit;
use crate::mutable::{self, MutableBigInt};
use crate::ParseBigIntError;

use self::Sign::{Minus, NoSign, Plus};

pub(crate) mod bits;
pub(crate) mod convert;
pub(crate) mod modular;
pub(crate) mod multiplication;

/// A `Sign` is a [`BigInt`]'s composing element.
#[derive(PartialEq, PartialOrd, Eq, Ord, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// The value is negative.
    Minus,
    /// The value is zero.
    NoSign,
    /// The value is positive.
    Plus,
}

impl Neg for Sign {
    type Output = Sign;

    #[inline]
    fn neg(self) -> Sign {
        match self {
            Minus => Plus,
            NoSign => NoSign,
            Plus => Minus,
        }
    }
}

impl Mul<Sign> for Sign {
    type Output = Sign;

    #[inline]
    fn mul(self, other: Sign) -> Sign {
        match (self, other) {
            (NoSign, _) | (_, NoSign) => NoSign,
            (Plus, Plus) | (Minus, Minus) => Plus,
            (Plus, Minus) | (Minus, Plus) => Minus,
        }
    }
}

/// An arbitrary-precision signed integer.
///
/// Represented as a sign and a big-endian magnitude (most significant word
/// first) with no leading zero word; zero has an empty magnitude. The
/// supported bit length is bounded below 2^31 and operations that would
/// exceed the bound panic rather than wrap.
#[derive(Clone, Eq, PartialEq)]
pub struct BigInt {
    pub(crate) sign: Sign,
    pub(crate) mag: Vec<BigDigit>,
}

/// Magnitudes longer than this would put the bit length at or above 2^31.
const MAX_MAG_LENGTH: usize = 1 << 26;

impl BigInt {
    /// Builds a value from a sign and a big-endian magnitude, stripping any
    /// leading zero words and normalizing the sign of zero.
    pub(crate) fn from_magnitude(sign: Sign, mut mag: Vec<BigDigit>) -> BigInt {
        let nz = mag.iter().position(|&w| w != 0).unwrap_or(mag.len());
        if nz > 0 {
            mag.drain(..nz);
        }
        if mag.is_empty() {
            return BigInt {
                sign: NoSign,
                mag,
            };
        }
        assert!(sign != NoSign, "nonzero magnitude with zero sign");
        let n = BigInt { sign, mag };
        n.check_range();
        n
    }

    /// Magnitude already known to be normalized and nonzero.
    #[inline]
    pub(crate) fn trusted(sign: Sign, mag: Vec<BigDigit>) -> BigInt {
        debug_assert!(mag.first().map_or(sign == NoSign, |&w| w != 0));
        BigInt { sign, mag }
    }

    fn check_range(&self) {
        if self.mag.len() > MAX_MAG_LENGTH
            || (self.mag.len() == MAX_MAG_LENGTH && self.mag[0] >> 31 != 0)
        {
            panic!("BigInt would overflow the supported range");
        }
    }

    /// Constructs a value from a sign and big-endian `u32` digits.
    ///
    /// Leading zeros are permitted and stripped. Panics if `sign` is
    /// `NoSign` but the digits are nonzero.
    pub fn from_slice(sign: Sign, digits: &[u32]) -> BigInt {
        let mag: Vec<u32> = digits.to_vec();
        if sign == NoSign {
            assert!(
                mag.iter().all(|&w| w == 0),
                "nonzero magnitude with zero sign"
            );
            return Zero::zero();
        }
        BigInt::from_magnitude(sign, mag)
    }

    /// The sign of this value.
    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Sign as an integer: `-1`, `0` or `1`.
    #[inline]
    pub fn signum(&self) -> i32 {
        match self.sign {
            Minus => -1,
            NoSign => 0,
            Plus => 1,
        }
    }

    /// The sign and the big-endian `u32` digits of the magnitude.
    pub fn to_u32_digits(&self) -> (Sign, Vec<u32>) {
        (self.sign, self.mag.clone())
    }

    /// Number of significant words in the magnitude.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.mag.len()
    }

    /// Simultaneous truncated quotient and remainder.
    ///
    /// The quotient is truncated toward zero and the remainder carries the
    /// sign of `self` (or is zero), so that
    /// `self == divisor * quotient + remainder`.
    ///
    /// # Panics
    ///
    /// Panics when `divisor` is zero.
    pub fn div_rem(&self, divisor: &BigInt) -> (BigInt, BigInt) {
        if divisor.is_zero() {
            panic!("division by zero");
        }
        if self.is_zero() {
            return (Zero::zero(), Zero::zero());
        }
        if cmp_mag(&self.mag, &divisor.mag) == Less {
            return (Zero::zero(), self.clone());
        }
        let (q, r) = mutable::divide_magnitudes(&self.mag, &divisor.mag);
        let qsign = self.sign * divisor.sign;
        (
            BigInt::from_magnitude(qsign, q),
            BigInt::from_magnitude(self.sign, r),
        )
    }

    /// Checked addition. Arbitrary precision never overflows, so this
    /// always succeeds; it exists for generic callers.
    #[inline]
    pub fn checked_add(&self, other: &BigInt) -> Option<BigInt> {
        Some(self + other)
    }

    /// Checked subtraction; always succeeds.
    #[inline]
    pub fn checked_sub(&self, other: &BigInt) -> Option<BigInt> {
        Some(self - other)
    }

    /// Checked multiplication; always succeeds.
    #[inline]
    pub fn checked_mul(&self, other: &BigInt) -> Option<BigInt> {
        Some(self * other)
    }

    /// Checked division: `None` when `divisor` is zero.
    pub fn checked_div(&self, divisor: &BigInt) -> Option<BigInt> {
        if divisor.is_zero() {
            return None;
        }
        Some(self.div_rem(divisor).0)
    }

    /// Checked remainder: `None` when `divisor` is zero.
    pub fn checked_rem(&self, divisor: &BigInt) -> Option<BigInt> {
        if divisor.is_zero() {
            return None;
        }
        Some(self.div_rem(divisor).1)
    }

    /// `self` raised to `exponent`, by repeated squaring.
    ///
    /// Powers of two are factored out of the base first and reapplied with a
    /// single shift at the end. `pow(0)` is one, including for zero.
    pub fn pow(&self, exponent: u32) -> BigInt {
        if exponent == 0 {
            return One::one();
        }
        if exponent == 1 || self.is_zero() {
            return self.clone();
        }
        let result_sign = if self.sign == Minus && exponent & 1 == 1 {
            Minus
        } else {
            Plus
        };

        // Factor out powers of two so the squaring loop works on the
        // smallest possible odd part.
        let powers_of_two = self.trailing_zeros().unwrap_or(0);
        let bits_to_shift = powers_of_two
            .checked_mul(u64::from(exponent))
            .filter(|&b| b < 1 << 31)
            .expect("BigInt would overflow the supported range");

        let odd_part = if powers_of_two > 0 {
            self.abs().shift_right_exact(powers_of_two)
        } else {
            self.abs()
        };

        let mut answer: BigInt = One::one();
        if !odd_part.is_one() {
            let mut part = odd_part;
            let mut work = exponent;
            loop {
                if work & 1 == 1 {
                    answer = &answer * &part;
                }
                work >>= 1;
                if work == 0 {
                    break;
                }
                part = multiplication::square(&part);
            }
        }
        if bits_to_shift > 0 {
            answer = answer.shift_left_unsigned(bits_to_shift);
        }
        if result_sign == Minus {
            -answer
        } else {
            answer
        }
    }

    /// Greatest common divisor of `self` and `other`, always non-negative.
    ///
    /// Euclidean reduction is used while the operands differ greatly in
    /// length, switching to binary (Stein) gcd once they converge.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        if self.is_zero() {
            return other.abs();
        }
        if other.is_zero() {
            return self.abs();
        }
        let a = MutableBigInt::from_big(self);
        let b = MutableBigInt::from_big(other);
        a.hybrid_gcd(b).to_big_int(Plus)
    }

    /// Minimum of `self` and `other`.
    pub fn min(self, other: BigInt) -> BigInt {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Maximum of `self` and `other`.
    pub fn max(self, other: BigInt) -> BigInt {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Magnitude comparison, ignoring signs.
    pub(crate) fn cmp_magnitude(&self, other: &BigInt) -> Ordering {
        cmp_mag(&self.mag, &other.mag)
    }
}

/// Compares two normalized big-endian magnitudes.
pub(crate) fn cmp_mag(x: &[BigDigit], y: &[BigDigit]) -> Ordering {
    match x.len().cmp(&y.len()) {
        Equal => x.cmp(y),
        other => other,
    }
}

/// Sum of two big-endian magnitudes.
pub(crate) fn add_mag(x: &[BigDigit], y: &[BigDigit]) -> Vec<BigDigit> {
    let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };
    let mut result = x.to_vec();
    let mut carry = 0u64;
    let mut xi = x.len();
    for yi in (0..y.len()).rev() {
        xi -= 1;
        let sum = u64::from(result[xi]) + u64::from(y[yi]) + carry;
        result[xi] = sum as u32;
        carry = sum >> 32;
    }
    while carry != 0 && xi > 0 {
        xi -= 1;
        let sum = u64::from(result[xi]) + carry;
        result[xi] = sum as u32;
        carry = sum >> 32;
    }
    if carry != 0 {
        result.insert(0, 1);
    }
    result
}

/// Difference `big - little` of big-endian magnitudes; requires
/// `big >= little`.
pub(crate) fn sub_mag(big: &[BigDigit], little: &[BigDigit]) -> Vec<BigDigit> {
    debug_assert!(cmp_mag(big, little) != Less);
    let mut result = big.to_vec();
    let mut borrow = 0i64;
    let mut bi = big.len();
    for li in (0..little.len()).rev() {
        bi -= 1;
        let diff = i64::from(result[bi]) - i64::from(little[li]) + borrow;
        result[bi] = diff as u32;
        borrow = diff >> 32;
    }
    while borrow != 0 && bi > 0 {
        bi -= 1;
        let diff = i64::from(result[bi]) + borrow;
        result[bi] = diff as u32;
        borrow = diff >> 32;
    }
    debug_assert_eq!(borrow, 0);
    result
}

// --- comparisons ---

impl PartialOrd for BigInt {
    #[inline]
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &BigInt) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Equal => match self.sign {
                NoSign => Equal,
                Plus => cmp_mag(&self.mag, &other.mag),
                Minus => cmp_mag(&other.mag, &self.mag),
            },
            other => other,
        }
    }
}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sign.hash(state);
        self.mag.hash(state);
    }
}

impl Default for BigInt {
    #[inline]
    fn default() -> BigInt {
        Zero::zero()
    }
}

// --- arithmetic operators ---

forward_all_binop_to_ref_ref!(impl Add for BigInt, add);

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;

    fn add(self, other: &BigInt) -> BigInt {
        match (self.sign, other.sign) {
            (NoSign, _) => other.clone(),
            (_, NoSign) => self.clone(),
            (x, y) if x == y => BigInt::from_magnitude(x, add_mag(&self.mag, &other.mag)),
            _ => match cmp_mag(&self.mag, &other.mag) {
                Equal => Zero::zero(),
                Greater => {
                    BigInt::from_magnitude(self.sign, sub_mag(&self.mag, &other.mag))
                }
                Less => BigInt::from_magnitude(other.sign, sub_mag(&other.mag, &self.mag)),
            },
        }
    }
}

forward_all_binop_to_ref_ref!(impl Sub for BigInt, sub);

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;

    fn sub(self, other: &BigInt) -> BigInt {
        match (self.sign, other.sign) {
            (_, NoSign) => self.clone(),
            (NoSign, _) => -other.clone(),
            (x, y) if x != y => BigInt::from_magnitude(x, add_mag(&self.mag, &other.mag)),
            _ => match cmp_mag(&self.mag, &other.mag) {
                Equal => Zero::zero(),
                Greater => {
                    BigInt::from_magnitude(self.sign, sub_mag(&self.mag, &other.mag))
                }
                Less => {
                    BigInt::from_magnitude(-other.sign, sub_mag(&other.mag, &self.mag))
                }
            },
        }
    }
}

forward_all_binop_to_ref_ref!(impl Mul for BigInt, mul);

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn mul(self, other: &BigInt) -> BigInt {
        multiplication::multiply(self, other)
    }
}

forward_all_binop_to_ref_ref!(impl Div for BigInt, div);

impl Div<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn div(self, other: &BigInt) -> BigInt {
        self.div_rem(other).0
    }
}

forward_all_binop_to_ref_ref!(impl Rem for BigInt, rem);

impl Rem<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn rem(self, other: &BigInt) -> BigInt {
        self.div_rem(other).1
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(mut self) -> BigInt {
        self.sign = -self.sign;
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(self) -> BigInt {
        -self.clone()
    }
}

impl Pow<u32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn pow(self, exp: u32) -> BigInt {
        BigInt::pow(self, exp)
    }
}

impl Pow<u32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn pow(self, exp: u32) -> BigInt {
        BigInt::pow(&self, exp)
    }
}

// --- num-traits / num-integer ---

impl Zero for BigInt {
    #[inline]
    fn zero() -> BigInt {
        BigInt {
            sign: NoSign,
            mag: Vec::new(),
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.sign == NoSign
    }
}

impl One for BigInt {
    #[inline]
    fn one() -> BigInt {
        BigInt {
            sign: Plus,
            mag: vec![1],
        }
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.sign == Plus && self.mag == [1]
    }
}

impl Num for BigInt {
    type FromStrRadixErr = ParseBigIntError;

    fn from_str_radix(s: &str, radix: u32) -> Result<BigInt, ParseBigIntError> {
        BigInt::from_str_radix(s, radix)
    }
}

impl Signed for BigInt {
    #[inline]
    fn abs(&self) -> BigInt {
        match self.sign {
            Minus => -self.clone(),
            _ => self.clone(),
        }
    }

    fn abs_sub(&self, other: &BigInt) -> BigInt {
        if self <= other {
            Zero::zero()
        } else {
            self - other
        }
    }

    fn signum(&self) -> BigInt {
        match self.sign {
            Plus => One::one(),
            NoSign => Zero::zero(),
            Minus => -BigInt::one(),
        }
    }

    #[inline]
    fn is_positive(&self) -> bool {
        self.sign == Plus
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.sign == Minus
    }
}

impl Integer for BigInt {
    #[inline]
    fn div_rem(&self, other: &BigInt) -> (BigInt, BigInt) {
        BigInt::div_rem(self, other)
    }

    fn div_floor(&self, other: &BigInt) -> BigInt {
        let (q, r) = BigInt::div_rem(self, other);
        if r.is_zero() || r.sign == other.sign {
            q
        } else {
            q - BigInt::one()
        }
    }

    fn mod_floor(&self, other: &BigInt) -> BigInt {
        let r = self % other;
        if r.is_zero() || r.sign == other.sign {
            r
        } else {
            r + other
        }
    }

    fn div_mod_floor(&self, other: &BigInt) -> (BigInt, BigInt) {
        let (q, r) = BigInt::div_rem(self, other);
        if r.is_zero() || r.sign == other.sign {
            (q, r)
        } else {
            (q - BigInt::one(), r + other)
        }
    }

    #[inline]
    fn gcd(&self, other: &BigInt) -> BigInt {
        BigInt::gcd(self, other)
    }

    fn lcm(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return Zero::zero();
        }
        (self / self.gcd(other) * other).abs()
    }

    #[inline]
    fn is_multiple_of(&self, other: &BigInt) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        (self % other).is_zero()
    }

    #[inline]
    fn is_even(&self) -> bool {
        self.mag.last().map_or(true, |&w| w & 1 == 0)
    }

    #[inline]
    fn is_odd(&self) -> bool {
        !self.is_even()
    }
}

// --- conversions from primitives ---

impl From<u64> for BigInt {
    fn from(n: u64) -> BigInt {
        if n == 0 {
            return Zero::zero();
        }
        let hi = (n >> 32) as u32;
        let mag = if hi == 0 {
            vec![n as u32]
        } else {
            vec![hi, n as u32]
        };
        BigInt::trusted(Plus, mag)
    }
}

impl From<i64> for BigInt {
    fn from(n: i64) -> BigInt {
        if n >= 0 {
            BigInt::from(n as u64)
        } else {
            -BigInt::from(n.unsigned_abs())
        }
    }
}

impl From<u128> for BigInt {
    fn from(n: u128) -> BigInt {
        if n == 0 {
            return Zero::zero();
        }
        let mut mag = vec![
            (n >> 96) as u32,
            (n >> 64) as u32,
            (n >> 32) as u32,
            n as u32,
        ];
        let nz = mag.iter().position(|&w| w != 0).unwrap_or(0);
        mag.drain(..nz);
        BigInt::trusted(Plus, mag)
    }
}

impl From<i128> for BigInt {
    fn from(n: i128) -> BigInt {
        if n >= 0 {
            BigInt::from(n as u128)
        } else {
            -BigInt::from(n.unsigned_abs())
        }
    }
}

macro_rules! impl_from_small {
    ($($t:ty => $via:ty),*) => {
        $(
            impl From<$t> for BigInt {
                #[inline]
                fn from(n: $t) -> BigInt {
                    BigInt::from(n as $via)
                }
            }
        )*
    };
}

impl_from_small!(u8 => u64, u16 => u64, u32 => u64, usize => u64);
impl_from_small!(i8 => i64, i16 => i64, i32 => i64, isize => i64);

impl ToPrimitive for BigInt {
    fn to_i64(&self) -> Option<i64> {
        convert::to_i64_exact(self)
    }

    fn to_u64(&self) -> Option<u64> {
        convert::to_u64_exact(self)
    }

    fn to_i128(&self) -> Option<i128> {
        convert::to_i128_exact(self)
    }

    fn to_u128(&self) -> Option<u128> {
        convert::to_u128_exact(self)
    }

    fn to_f32(&self) -> Option<f32> {
        Some(convert::to_f32_nearest(self))
    }

    fn to_f64(&self) -> Option<f64> {
        Some(convert::to_f64_nearest(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::str::FromStr;

    use crate::bigrand::RandBigInt;

    #[test]
    fn test_sign_arithmetic() {
        assert_eq!(-Plus, Minus);
        assert_eq!(-NoSign, NoSign);
        assert_eq!(Plus * Minus, Minus);
        assert_eq!(Minus * Minus, Plus);
        assert_eq!(NoSign * Plus, NoSign);
    }

    #[test]
    fn test_add_sub_signs() {
        let a = BigInt::from(17);
        let b = BigInt::from(-42);
        assert_eq!(&a + &b, BigInt::from(-25));
        assert_eq!(&b + &a, BigInt::from(-25));
        assert_eq!(&a - &b, BigInt::from(59));
        assert_eq!(&b - &a, BigInt::from(-59));
        assert_eq!(&a - &a, BigInt::zero());
    }

    #[test]
    fn test_add_carry_chain() {
        let a = BigInt::from(u64::MAX) + BigInt::from(u64::MAX);
        assert_eq!(a, BigInt::from(u128::from(u64::MAX) * 2));
    }

    #[test]
    fn test_commutativity_and_associativity() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..50 {
            let a = rng.gen_bigint(300);
            let b = rng.gen_bigint(200);
            let c = rng.gen_bigint(250);
            assert_eq!(&a + &b, &b + &a);
            assert_eq!(&a * &b, &b * &a);
            assert_eq!((&a + &b) + &c, &a + (&b + &c));
            assert_eq!((&a * &b) * &c, &a * (&b * &c));
        }
    }

    #[test]
    fn test_division_identity() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..50 {
            let a = rng.gen_bigint(400);
            let b = rng.gen_bigint(150);
            if b.is_zero() {
                continue;
            }
            let (q, r) = a.div_rem(&b);
            assert_eq!(&b * &q + &r, a);
            assert!(r.is_zero() || r.sign() == a.sign());
            assert!(r.cmp_magnitude(&b) == Less);
        }
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_division_by_zero() {
        let _ = BigInt::from(1) / BigInt::zero();
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(BigInt::from(10).checked_div(&BigInt::zero()), None);
        assert_eq!(
            BigInt::from(10).checked_div(&BigInt::from(3)),
            Some(BigInt::from(3))
        );
    }

    #[test]
    fn test_pow() {
        assert_eq!(BigInt::from(2).pow(10), BigInt::from(1024));
        assert_eq!(BigInt::from(0).pow(0), BigInt::one());
        assert_eq!(BigInt::from(0).pow(5), BigInt::zero());
        assert_eq!(BigInt::from(-3).pow(3), BigInt::from(-27));
        assert_eq!(BigInt::from(-3).pow(4), BigInt::from(81));
        // Base with factored-out powers of two.
        assert_eq!(BigInt::from(12).pow(7), BigInt::from(35831808i64));
        assert_eq!(
            BigInt::from(10).pow(30),
            BigInt::from_str("1000000000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_gcd_small() {
        assert_eq!(BigInt::from(240).gcd(&BigInt::from(46)), BigInt::from(2));
        assert_eq!(BigInt::from(-240).gcd(&BigInt::from(46)), BigInt::from(2));
        assert_eq!(BigInt::from(0).gcd(&BigInt::from(-7)), BigInt::from(7));
        assert_eq!(BigInt::from(13).gcd(&BigInt::from(13)), BigInt::from(13));
    }

    #[test]
    fn test_gcd_known_large() {
        // gcd(a, b) for values with a known common factor.
        let f = BigInt::from_str("123456789123456789123456789").unwrap();
        let a = &f * BigInt::from(2u64 * 3 * 5);
        let b = &f * BigInt::from(7u64 * 11);
        assert_eq!(a.gcd(&b), f);
    }

    #[test]
    fn test_gcd_matches_euclid() {
        fn euclid(mut a: BigInt, mut b: BigInt) -> BigInt {
            while !b.is_zero() {
                let r = &a % &b;
                a = b;
                b = r;
            }
            a.abs()
        }
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for i in 1usize..30 {
            let a = rng.gen_bigint((i * 20) as u64).abs();
            let b = rng.gen_bigint((i * 13) as u64).abs();
            assert_eq!(a.gcd(&b), euclid(a.clone(), b.clone()));
        }
    }

    #[test]
    fn test_integer_floor_ops() {
        let a = BigInt::from(-7);
        let b = BigInt::from(3);
        assert_eq!(a.div_floor(&b), BigInt::from(-3));
        assert_eq!(a.mod_floor(&b), BigInt::from(2));
        assert_eq!(BigInt::from(7).div_floor(&BigInt::from(-3)), BigInt::from(-3));
        assert_eq!(BigInt::from(7).mod_floor(&BigInt::from(-3)), BigInt::from(-2));
    }

    #[test]
    fn test_lcm() {
        assert_eq!(BigInt::from(4).lcm(&BigInt::from(6)), BigInt::from(12));
        assert_eq!(BigInt::from(-4).lcm(&BigInt::from(6)), BigInt::from(12));
        assert_eq!(BigInt::zero().lcm(&BigInt::from(6)), BigInt::zero());
    }

    #[test]
    fn test_ordering() {
        let mut values: Vec<BigInt> = [-5i64, 3, 0, -1, 100, 7]
            .iter()
            .map(|&v| BigInt::from(v))
            .collect();
        values.sort();
        let sorted: Vec<i64> = values.iter().map(|v| v.to_i64().unwrap()).collect();
        assert_eq!(sorted, vec![-5, -1, 0, 3, 7, 100]);
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(BigInt::from(i64::MIN).to_string(), "-9223372036854775808");
        assert_eq!(
            BigInt::from(u128::MAX).to_string(),
            "340282366920938463463374607431768211455"
        );
        assert_eq!(BigInt::from_i8(-3).unwrap(), BigInt::from(-3));
    }
}
