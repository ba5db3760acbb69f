//! Arbitrary-precision signed decimal arithmetic.
//!
//! A [`BigDecimal`] is an unscaled integer coefficient paired with a 32-bit
//! scale; the represented value is `coefficient * 10^-scale`. Arithmetic
//! follows an exact-result-then-round model: each operation defines a
//! logically exact result, which is then rounded to a [`MathContext`]'s
//! precision when one is supplied.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::sync::OnceLock;

use num_traits::{FromPrimitive, Num, One, Signed, ToPrimitive, Zero};

use crate::bigint::{convert, BigInt};
use crate::context::MathContext;
use crate::rounding::RoundingMode;

mod format;

/// `10^i` for `i` in `0..=18`, the powers of ten that fit an `i64`.
pub(crate) const LONG_TEN_POWERS_TABLE: [i64; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// Largest `pow` exponent accepted, matching the decimal arithmetic
/// standard's operand limit.
const MAX_POW_EXPONENT: u32 = 999_999_999;

/// The unscaled coefficient. Values that fit a machine word are stored
/// inline to keep small-number arithmetic off the heap.
///
/// Invariant: `Big` is used only when the value is outside the `i64`
/// range, so every abstract value has exactly one representation and the
/// derived equality is value equality.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum Coeff {
    Compact(i64),
    Big(BigInt),
}

impl Coeff {
    fn from_big(n: BigInt) -> Coeff {
        match convert::to_i64_exact(&n) {
            Some(v) => Coeff::Compact(v),
            None => Coeff::Big(n),
        }
    }

    pub(crate) fn to_big_int(&self) -> BigInt {
        match self {
            Coeff::Compact(v) => BigInt::from(*v),
            Coeff::Big(b) => b.clone(),
        }
    }

    pub(crate) fn signum(&self) -> i32 {
        match self {
            Coeff::Compact(v) => match v.cmp(&0) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            },
            Coeff::Big(b) => b.signum(),
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Coeff::Compact(0))
    }

    fn neg(&self) -> Coeff {
        match self {
            Coeff::Compact(v) => match v.checked_neg() {
                Some(n) => Coeff::Compact(n),
                None => Coeff::Big(-BigInt::from(*v)),
            },
            Coeff::Big(b) => Coeff::from_big(-b.clone()),
        }
    }

    fn digit_length(&self) -> u64 {
        match self {
            Coeff::Compact(v) => long_digit_length(v.unsigned_abs()),
            Coeff::Big(b) => big_digit_length(b),
        }
    }
}

/// An immutable arbitrary-precision signed decimal number.
///
/// Equality (and [`Hash`]) is scale-sensitive: `2.0` and `2.00` are
/// distinct values. Numeric comparison ignores scale; use
/// [`compare`](BigDecimal::compare) or `PartialOrd` when ordering by
/// value. `Ord` is deliberately not implemented, since its contract with
/// `Eq` would be violated by that asymmetry.
#[derive(Clone)]
pub struct BigDecimal {
    coeff: Coeff,
    scale: i32,
    /// Decimal digit count of the coefficient, computed on first use.
    /// Racing initializations compute the same value.
    precision: OnceLock<u64>,
}

/// Decimal digit count of a nonzero-or-zero `u64` magnitude; zero counts
/// as one digit.
fn long_digit_length(x: u64) -> u64 {
    if x == 0 {
        return 1;
    }
    // Estimate from the bit length, then correct by one table lookup.
    // Callers pass `i64::unsigned_abs` values, so x <= 2^63 and the
    // off-table case (19 estimated digits) is already exact.
    let r = (((64 - x.leading_zeros()) + 1) * 1233) >> 12;
    if r as usize >= LONG_TEN_POWERS_TABLE.len() || x < LONG_TEN_POWERS_TABLE[r as usize] as u64 {
        r as u64
    } else {
        (r + 1) as u64
    }
}

fn big_digit_length(b: &BigInt) -> u64 {
    if b.is_zero() {
        return 1;
    }
    let r = (((b.bits() + 1) as u128 * 646_456_993) >> 31) as u64;
    if b.abs() < ten_pow_big(r) {
        r
    } else {
        r + 1
    }
}

pub(crate) fn ten_pow_big(n: u64) -> BigInt {
    if n < LONG_TEN_POWERS_TABLE.len() as u64 {
        BigInt::from(LONG_TEN_POWERS_TABLE[n as usize])
    } else {
        BigInt::from(10u32).pow(u32::try_from(n).expect("power of ten out of range"))
    }
}

/// Clamps a preferred scale into the representable range. Only used for
/// zero results, where the clamped scale loses no information.
fn saturate_scale(s: i64) -> i32 {
    s.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Checked narrowing for a result scale when the coefficient is known to
/// be nonzero.
fn check_scale_nonzero(val: i64) -> i32 {
    match i32::try_from(val) {
        Ok(v) => v,
        Err(_) if val > 0 => panic!("Underflow"),
        Err(_) => panic!("Overflow"),
    }
}

fn zero_with_scale(scale: i32) -> BigDecimal {
    BigDecimal::from_coeff(Coeff::Compact(0), scale)
}

impl BigDecimal {
    /// The value 0, with scale 0.
    pub const ZERO: BigDecimal = BigDecimal {
        coeff: Coeff::Compact(0),
        scale: 0,
        precision: OnceLock::new(),
    };

    /// The value 1, with scale 0.
    pub const ONE: BigDecimal = BigDecimal {
        coeff: Coeff::Compact(1),
        scale: 0,
        precision: OnceLock::new(),
    };

    /// The value 10, with scale 0.
    pub const TEN: BigDecimal = BigDecimal {
        coeff: Coeff::Compact(10),
        scale: 0,
        precision: OnceLock::new(),
    };

    /// Creates a decimal with the given unscaled coefficient and scale,
    /// representing `unscaled * 10^-scale`.
    pub fn new(unscaled: BigInt, scale: i32) -> BigDecimal {
        BigDecimal::from_coeff(Coeff::from_big(unscaled), scale)
    }

    /// Creates a decimal from a machine-word coefficient and a scale.
    pub fn from_i64_scaled(unscaled: i64, scale: i32) -> BigDecimal {
        BigDecimal::from_coeff(Coeff::Compact(unscaled), scale)
    }

    pub(crate) fn from_coeff(coeff: Coeff, scale: i32) -> BigDecimal {
        BigDecimal {
            coeff,
            scale,
            precision: OnceLock::new(),
        }
    }

    /// The recommended `f64` conversion: parses the shortest decimal
    /// string that round-trips to the given value.
    ///
    /// # Panics
    ///
    /// Panics if the value is infinite or NaN.
    pub fn from_f64(value: f64) -> BigDecimal {
        assert!(value.is_finite(), "infinite or NaN");
        format!("{}", value)
            .parse()
            .expect("shortest float form is a valid decimal")
    }

    /// The exact binary expansion of an `f64`: the result is the precise
    /// value of the IEEE 754 double, which for most literals is not the
    /// number that was written down (`0.1` becomes a 55-digit decimal).
    ///
    /// # Panics
    ///
    /// Panics if the value is infinite or NaN.
    pub fn from_f64_exact(value: f64) -> BigDecimal {
        assert!(value.is_finite(), "infinite or NaN");
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & 0xf_ffff_ffff_ffff;
        let (mut mantissa, mut exponent) = if biased == 0 {
            (fraction, -1074i64)
        } else {
            (fraction | 0x10_0000_0000_0000, biased - 1075)
        };
        if mantissa == 0 {
            return BigDecimal::ZERO;
        }
        exponent += mantissa.trailing_zeros() as i64;
        mantissa >>= mantissa.trailing_zeros();

        // m * 2^e with e < 0 is (m * 5^-e) * 10^e.
        let mut coeff = BigInt::from(mantissa);
        let scale = if exponent >= 0 {
            coeff = coeff.shift_left(exponent);
            0
        } else {
            coeff = coeff * BigInt::from(5u32).pow((-exponent) as u32);
            (-exponent) as i32
        };
        if negative {
            coeff = -coeff;
        }
        BigDecimal::new(coeff, scale)
    }

    /// Parses a decimal string and rounds the result per the context.
    pub fn parse_with_context(
        s: &str,
        mc: &MathContext,
    ) -> Result<BigDecimal, crate::ParseBigDecimalError> {
        Ok(do_round(s.parse()?, mc))
    }

    /// The unscaled coefficient, `self * 10^scale` as an integer.
    pub fn unscaled_value(&self) -> BigInt {
        self.coeff.to_big_int()
    }

    /// The scale: the power of ten dividing the coefficient. Negative
    /// scales multiply instead.
    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// The number of decimal digits in the coefficient; zero has
    /// precision 1.
    pub fn precision(&self) -> u64 {
        *self.precision.get_or_init(|| self.coeff.digit_length())
    }

    /// The sign of the value as -1, 0 or 1.
    #[inline]
    pub fn signum(&self) -> i32 {
        self.coeff.signum()
    }

    /// The absolute value, at the same scale.
    pub fn abs(&self) -> BigDecimal {
        if self.signum() < 0 {
            -self
        } else {
            self.clone()
        }
    }

    /// One unit in the last place: `10^-scale`.
    pub fn ulp(&self) -> BigDecimal {
        BigDecimal::from_coeff(Coeff::Compact(1), self.scale)
    }

    /// The numerically smaller of the two values.
    pub fn min(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare(other) != Ordering::Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// The numerically larger of the two values.
    pub fn max(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare(other) == Ordering::Less {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// The integer part of the value, truncated toward zero.
    pub fn to_big_int(&self) -> BigInt {
        self.set_scale_with_rounding(0, RoundingMode::Down)
            .coeff
            .to_big_int()
    }

    /// The value as an integer.
    ///
    /// # Panics
    ///
    /// Panics if the value has a nonzero fractional part.
    pub fn to_big_int_exact(&self) -> BigInt {
        self.set_scale(0).coeff.to_big_int()
    }

    /// Numeric-value comparison, ignoring scale: `2.0` and `2.00` compare
    /// equal here even though `==` distinguishes them.
    pub fn compare(&self, other: &BigDecimal) -> Ordering {
        let xsign = self.signum();
        let ysign = other.signum();
        if xsign != ysign {
            return xsign.cmp(&ysign);
        }
        if xsign == 0 {
            return Ordering::Equal;
        }
        // Differing adjusted exponents decide without inflating anything.
        let xae = self.precision() as i64 - self.scale as i64;
        let yae = other.precision() as i64 - other.scale as i64;
        if xae != yae {
            let by_exponent = xae.cmp(&yae);
            return if xsign > 0 {
                by_exponent
            } else {
                by_exponent.reverse()
            };
        }
        // Equal adjusted exponents bound the scale difference by the
        // digit counts, so alignment stays cheap.
        let sdiff = self.scale as i64 - other.scale as i64;
        let x = self.coeff.to_big_int();
        let y = other.coeff.to_big_int();
        match sdiff.cmp(&0) {
            Ordering::Equal => x.cmp(&y),
            Ordering::Less => (x * ten_pow_big((-sdiff) as u64)).cmp(&y),
            Ordering::Greater => x.cmp(&(y * ten_pow_big(sdiff as u64))),
        }
    }

    fn check_scale(&self, val: i64) -> i32 {
        match i32::try_from(val) {
            Ok(v) => v,
            Err(_) => {
                if self.is_zero() {
                    saturate_scale(val)
                } else if val > 0 {
                    panic!("Underflow")
                } else {
                    panic!("Overflow")
                }
            }
        }
    }

    /// Inflates the coefficient by `10^raise`, keeping the compact form
    /// when the product still fits.
    fn inflated_coeff(&self, raise: u64) -> Coeff {
        if raise == 0 {
            return self.coeff.clone();
        }
        if let Coeff::Compact(v) = self.coeff {
            if raise < LONG_TEN_POWERS_TABLE.len() as u64 {
                if let Some(product) = v.checked_mul(LONG_TEN_POWERS_TABLE[raise as usize]) {
                    return Coeff::Compact(product);
                }
            }
        }
        Coeff::from_big(self.coeff.to_big_int() * ten_pow_big(raise))
    }

    fn add_ref(&self, rhs: &BigDecimal) -> BigDecimal {
        let result_scale = self.scale.max(rhs.scale);
        // A zero operand contributes only its scale.
        if self.is_zero() {
            return rhs.set_scale_with_rounding(result_scale, RoundingMode::Unnecessary);
        }
        if rhs.is_zero() {
            return self.set_scale_with_rounding(result_scale, RoundingMode::Unnecessary);
        }
        let xraise = (result_scale as i64 - self.scale as i64) as u64;
        let yraise = (result_scale as i64 - rhs.scale as i64) as u64;
        let x = self.inflated_coeff(xraise);
        let y = rhs.inflated_coeff(yraise);
        let sum = match (&x, &y) {
            (Coeff::Compact(a), Coeff::Compact(b)) => match a.checked_add(*b) {
                Some(s) => Coeff::Compact(s),
                None => Coeff::from_big(x.to_big_int() + y.to_big_int()),
            },
            _ => Coeff::from_big(x.to_big_int() + y.to_big_int()),
        };
        BigDecimal::from_coeff(sum, result_scale)
    }

    /// Addition rounded to the context's precision.
    pub fn add_with_context(&self, rhs: &BigDecimal, mc: &MathContext) -> BigDecimal {
        do_round(self.add_ref(rhs), mc)
    }

    /// Subtraction rounded to the context's precision.
    pub fn sub_with_context(&self, rhs: &BigDecimal, mc: &MathContext) -> BigDecimal {
        do_round(self.add_ref(&-rhs), mc)
    }

    fn mul_ref(&self, rhs: &BigDecimal) -> BigDecimal {
        let scale = self.check_scale(self.scale as i64 + rhs.scale as i64);
        let product = match (&self.coeff, &rhs.coeff) {
            (Coeff::Compact(a), Coeff::Compact(b)) => match a.checked_mul(*b) {
                Some(p) => Coeff::Compact(p),
                None => Coeff::from_big(self.coeff.to_big_int() * rhs.coeff.to_big_int()),
            },
            _ => Coeff::from_big(self.coeff.to_big_int() * rhs.coeff.to_big_int()),
        };
        BigDecimal::from_coeff(product, scale)
    }

    /// Multiplication rounded to the context's precision.
    pub fn mul_with_context(&self, rhs: &BigDecimal, mc: &MathContext) -> BigDecimal {
        do_round(self.mul_ref(rhs), mc)
    }

    fn divide_exact(&self, divisor: &BigDecimal) -> BigDecimal {
        if divisor.is_zero() {
            if self.is_zero() {
                panic!("division undefined");
            }
            panic!("division by zero");
        }
        let preferred = self.scale as i64 - divisor.scale as i64;
        if self.is_zero() {
            return zero_with_scale(saturate_scale(preferred));
        }

        // The quotient terminates iff, after cancelling common factors,
        // the divisor is a product of twos and fives.
        let x = self.coeff.to_big_int();
        let y = divisor.coeff.to_big_int();
        let g = x.gcd(&y);
        let xr = &x / &g;
        let yr = &y / &g;
        let ysign = yr.signum();
        let mut yabs = yr.abs();
        let twos = yabs.trailing_zeros().expect("divisor is nonzero");
        yabs = yabs.shift_right_exact(twos);
        let mut fives = 0u64;
        let five = BigInt::from(5u32);
        loop {
            let (q, r) = yabs.div_rem(&five);
            if !r.is_zero() {
                break;
            }
            yabs = q;
            fives += 1;
        }
        if !yabs.is_one() {
            panic!("Non-terminating decimal expansion; no exact representable decimal result");
        }

        // x / (2^a 5^b) = x * 2^(m-a) 5^(m-b) / 10^m with m = max(a, b).
        let m = twos.max(fives);
        let mut q = xr.shift_left((m - twos) as i64);
        if m > fives {
            q = q * BigInt::from(5u32).pow((m - fives) as u32);
        }
        if ysign < 0 {
            q = -q;
        }
        let scale = check_scale_nonzero(preferred + m as i64);
        BigDecimal::from_coeff(Coeff::from_big(q), scale)
    }

    /// Division rounded to the context's precision. The result carries
    /// the preferred scale (dividend scale minus divisor scale) when the
    /// rounded quotient is exact at that scale.
    pub fn divide_with_context(&self, divisor: &BigDecimal, mc: &MathContext) -> BigDecimal {
        if mc.precision() == 0 {
            return self.divide_exact(divisor);
        }
        if divisor.is_zero() {
            if self.is_zero() {
                panic!("division undefined");
            }
            panic!("division by zero");
        }
        let preferred = self.scale as i64 - divisor.scale as i64;
        if self.is_zero() {
            return zero_with_scale(saturate_scale(preferred));
        }

        let xscale = self.precision() as i64;
        let mut yscale = divisor.precision() as i64;
        let mcp = mc.precision() as i64;

        // When the normalized dividend magnitude exceeds the divisor's,
        // the quotient gains a leading digit; compensate up front so the
        // result holds exactly mcp digits before rounding.
        if compare_magnitude_normalized(self, xscale, divisor, yscale) == Ordering::Greater {
            yscale -= 1;
        }
        let scl = check_scale_nonzero(preferred + yscale - xscale + mcp);
        let x = self.coeff.to_big_int();
        let y = divisor.coeff.to_big_int();
        let quotient = if mcp + yscale - xscale > 0 {
            let raise = (mcp + yscale - xscale) as u64;
            divide_and_round(
                &(x * ten_pow_big(raise)),
                &y,
                scl,
                mc.rounding_mode(),
                check_scale_nonzero(preferred),
            )
        } else {
            let new_scale = check_scale_nonzero(xscale - mcp);
            let raise = (new_scale as i64 - yscale) as u64;
            divide_and_round(
                &x,
                &(y * ten_pow_big(raise)),
                scl,
                mc.rounding_mode(),
                check_scale_nonzero(preferred),
            )
        };
        do_round(quotient, mc)
    }

    /// Division to an explicit result scale, rounding per the mode.
    pub fn divide_with_scale(
        &self,
        divisor: &BigDecimal,
        scale: i32,
        mode: RoundingMode,
    ) -> BigDecimal {
        if divisor.is_zero() {
            if self.is_zero() {
                panic!("division undefined");
            }
            panic!("division by zero");
        }
        let x = self.coeff.to_big_int();
        let y = divisor.coeff.to_big_int();
        // Align the dividend so the integer quotient lands at `scale`.
        let target = scale as i64 + divisor.scale as i64;
        if target >= self.scale as i64 {
            let raise = (target - self.scale as i64) as u64;
            divide_and_round(&(x * ten_pow_big(raise)), &y, scale, mode, scale)
        } else {
            let raise = (self.scale as i64 - target) as u64;
            divide_and_round(&x, &(y * ten_pow_big(raise)), scale, mode, scale)
        }
    }

    /// Division at the dividend's scale, rounding per the mode.
    pub fn divide_with_rounding(&self, divisor: &BigDecimal, mode: RoundingMode) -> BigDecimal {
        self.divide_with_scale(divisor, self.scale, mode)
    }

    /// The integer part of `self / divisor`, truncated toward zero.
    pub fn divide_to_integral_value(&self, divisor: &BigDecimal) -> BigDecimal {
        if divisor.is_zero() {
            if self.is_zero() {
                panic!("division undefined");
            }
            panic!("division by zero");
        }
        let preferred = saturate_scale(self.scale as i64 - divisor.scale as i64);
        if self.abs().compare(&divisor.abs()) == Ordering::Less {
            return zero_with_scale(preferred);
        }
        if self.is_zero() {
            return zero_with_scale(preferred);
        }
        // Enough working digits that the integer part is exact.
        let max_digits = (self.precision()
            + (10 * divisor.precision()).div_ceil(3)
            + (self.scale as i64 - divisor.scale as i64).unsigned_abs()
            + 2)
        .min(u32::MAX as u64) as u32;
        let mut quotient =
            self.divide_with_context(divisor, &MathContext::new(max_digits, RoundingMode::Down));
        if quotient.scale() > 0 {
            quotient = quotient.set_scale_with_rounding(0, RoundingMode::Down);
            quotient = strip_zeros_to_match_scale(
                quotient.coeff.to_big_int(),
                quotient.scale as i64,
                preferred as i64,
            );
        }
        if quotient.scale() < preferred {
            quotient = quotient.set_scale_with_rounding(preferred, RoundingMode::Unnecessary);
        }
        quotient
    }

    /// Context form of [`divide_to_integral_value`]; fails when the exact
    /// integer quotient needs more than the context's digits.
    ///
    /// [`divide_to_integral_value`]: BigDecimal::divide_to_integral_value
    pub fn divide_to_integral_value_with_context(
        &self,
        divisor: &BigDecimal,
        mc: &MathContext,
    ) -> BigDecimal {
        if mc.precision() == 0 || self.abs().compare(&divisor.abs()) == Ordering::Less {
            return self.divide_to_integral_value(divisor);
        }
        let preferred = saturate_scale(self.scale as i64 - divisor.scale as i64);

        let mut result = self
            .divide_with_context(divisor, &MathContext::new(mc.precision(), RoundingMode::Down));
        if result.scale() < 0 {
            // Digits were lost before the decimal point; the truncated
            // quotient is not the exact integer part.
            let product = result.mul_ref(divisor);
            if (self - &product).abs().compare(&divisor.abs()) != Ordering::Less {
                panic!("Division impossible");
            }
        } else if result.scale() > 0 {
            result = result.set_scale_with_rounding(0, RoundingMode::Down);
        }
        if preferred > result.scale() {
            let precision_diff = mc.precision() as i64 - result.precision() as i64;
            if precision_diff > 0 {
                let pad = precision_diff.min(preferred as i64 - result.scale() as i64);
                return result.set_scale(result.scale() + pad as i32);
            }
        }
        strip_zeros_to_match_scale(result.coeff.to_big_int(), result.scale as i64, preferred as i64)
    }

    /// The remainder `self - divide_to_integral_value(divisor) * divisor`;
    /// its sign follows the dividend.
    pub fn remainder(&self, divisor: &BigDecimal) -> BigDecimal {
        self.divide_and_remainder(divisor).1
    }

    /// The truncated quotient and the remainder, computed together.
    pub fn divide_and_remainder(&self, divisor: &BigDecimal) -> (BigDecimal, BigDecimal) {
        let q = self.divide_to_integral_value(divisor);
        let r = self - q.mul_ref(divisor);
        (q, r)
    }

    /// `self^n`, exact. The result scale is `n` times this scale.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds 999999999.
    pub fn pow(&self, n: u32) -> BigDecimal {
        assert!(n <= MAX_POW_EXPONENT, "Invalid operation");
        let scale = self.check_scale(self.scale as i64 * n as i64);
        BigDecimal::from_coeff(Coeff::from_big(self.coeff.to_big_int().pow(n)), scale)
    }

    /// `self^n` under a context, by the ANSI X3.274 semantics: repeated
    /// squaring at an inflated working precision. The result may differ
    /// from the exactly rounded power by more than one ulp.
    ///
    /// # Panics
    ///
    /// Panics if `|n|` exceeds 999999999, if the exponent's digit count
    /// exceeds the context precision, or (for negative `n`) if the
    /// context has no precision limit.
    pub fn pow_with_context(&self, n: i32, mc: &MathContext) -> BigDecimal {
        if mc.precision() == 0 {
            assert!(n >= 0, "Invalid operation");
            return self.pow(n as u32);
        }
        assert!(n.unsigned_abs() <= MAX_POW_EXPONENT, "Invalid operation");
        if n == 0 {
            return BigDecimal::ONE;
        }
        let elength = long_digit_length(n.unsigned_abs() as u64) as u32;
        assert!(elength <= mc.precision(), "Invalid operation");
        let workmc = MathContext::new(mc.precision() + elength + 1, mc.rounding_mode());

        let mut acc = BigDecimal::ONE;
        let mut seenbit = false;
        let mut mag = n.unsigned_abs();
        for i in 1..=31 {
            mag = mag.wrapping_add(mag);
            if mag & 0x8000_0000 != 0 {
                seenbit = true;
                acc = acc.mul_with_context(self, &workmc);
            }
            if i == 31 {
                break;
            }
            if seenbit {
                acc = acc.mul_with_context(&acc.clone(), &workmc);
            }
        }
        if n < 0 {
            acc = BigDecimal::ONE.divide_with_context(&acc, &workmc);
        }
        do_round(acc, mc)
    }

    /// The value rounded to the context's precision.
    pub fn round(&self, mc: &MathContext) -> BigDecimal {
        if mc.precision() == 0 {
            self.clone()
        } else {
            do_round(self.clone(), mc)
        }
    }

    /// Re-expresses the value at a new scale.
    ///
    /// # Panics
    ///
    /// Panics if lowering the scale would discard nonzero digits.
    pub fn set_scale(&self, new_scale: i32) -> BigDecimal {
        self.set_scale_with_rounding(new_scale, RoundingMode::Unnecessary)
    }

    /// Re-expresses the value at a new scale, rounding per the mode when
    /// the scale decreases.
    pub fn set_scale_with_rounding(&self, new_scale: i32, mode: RoundingMode) -> BigDecimal {
        if new_scale == self.scale {
            return self.clone();
        }
        if self.is_zero() {
            return zero_with_scale(new_scale);
        }
        if new_scale > self.scale {
            let raise = new_scale as i64 - self.scale as i64;
            BigDecimal::from_coeff(self.inflated_coeff(raise as u64), new_scale)
        } else {
            let drop = self.scale as i64 - new_scale as i64;
            divide_and_round(
                &self.coeff.to_big_int(),
                &ten_pow_big(drop as u64),
                new_scale,
                mode,
                new_scale,
            )
        }
    }

    /// Removes all trailing zero digits from the coefficient, lowering
    /// the scale accordingly. Zero normalizes to scale 0.
    pub fn strip_trailing_zeros(&self) -> BigDecimal {
        if self.is_zero() {
            return BigDecimal::ZERO;
        }
        strip_zeros_to_match_scale(self.coeff.to_big_int(), self.scale as i64, i64::MIN)
    }

    /// The value divided by `10^n`, adjusting scale only. The result
    /// scale is at least zero.
    pub fn move_point_left(&self, n: i32) -> BigDecimal {
        if n == 0 {
            return self.clone();
        }
        let new_scale = self.check_scale(self.scale as i64 + n as i64);
        let num = BigDecimal::from_coeff(self.coeff.clone(), new_scale);
        if num.scale < 0 {
            num.set_scale_with_rounding(0, RoundingMode::Unnecessary)
        } else {
            num
        }
    }

    /// The value multiplied by `10^n`, adjusting scale only. The result
    /// scale is at least zero.
    pub fn move_point_right(&self, n: i32) -> BigDecimal {
        if n == 0 {
            return self.clone();
        }
        let new_scale = self.check_scale(self.scale as i64 - n as i64);
        let num = BigDecimal::from_coeff(self.coeff.clone(), new_scale);
        if num.scale < 0 {
            num.set_scale_with_rounding(0, RoundingMode::Unnecessary)
        } else {
            num
        }
    }

    /// The value multiplied by `10^n`, as pure scale arithmetic: unlike
    /// [`move_point_right`](BigDecimal::move_point_right) the scale may
    /// go negative.
    pub fn scale_by_power_of_ten(&self, n: i32) -> BigDecimal {
        BigDecimal::from_coeff(
            self.coeff.clone(),
            self.check_scale(self.scale as i64 - n as i64),
        )
    }
}

/// Normalized magnitude comparison: both coefficients scaled to a common
/// digit count before comparing, so `19` (two digits) against `100`
/// (three digits) compares as 1.9 against 1.00.
fn compare_magnitude_normalized(
    x: &BigDecimal,
    xprec: i64,
    y: &BigDecimal,
    yprec: i64,
) -> Ordering {
    let xs = x.coeff.to_big_int().abs();
    let ys = y.coeff.to_big_int().abs();
    let sdiff = xprec - yprec;
    if sdiff < 0 {
        (xs * ten_pow_big((-sdiff) as u64)).cmp(&ys)
    } else {
        xs.cmp(&(ys * ten_pow_big(sdiff as u64)))
    }
}

/// Divides and rounds per the mode, then, when the division was exact,
/// strips trailing zeros down toward the preferred scale.
fn divide_and_round(
    ldividend: &BigInt,
    ldivisor: &BigInt,
    scale: i32,
    mode: RoundingMode,
    preferred_scale: i32,
) -> BigDecimal {
    let (q, r) = ldividend.div_rem(ldivisor);
    if !r.is_zero() {
        let qsign = if ldividend.signum() == ldivisor.signum() {
            1
        } else {
            -1
        };
        let q = if need_increment(ldivisor, mode, qsign, &q, &r) {
            if qsign > 0 {
                q + BigInt::one()
            } else {
                q - BigInt::one()
            }
        } else {
            q
        };
        BigDecimal::from_coeff(Coeff::from_big(q), scale)
    } else if preferred_scale != scale {
        strip_zeros_to_match_scale(q, scale as i64, preferred_scale as i64)
    } else {
        BigDecimal::from_coeff(Coeff::from_big(q), scale)
    }
}

/// Whether a truncated quotient must be bumped away from zero, given a
/// nonzero remainder.
fn need_increment(
    ldivisor: &BigInt,
    mode: RoundingMode,
    qsign: i32,
    q: &BigInt,
    r: &BigInt,
) -> bool {
    debug_assert!(!r.is_zero());
    match mode {
        RoundingMode::Unnecessary => panic!("Rounding necessary"),
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => qsign > 0,
        RoundingMode::Floor => qsign < 0,
        RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
            match r.abs().shift_left(1).cmp(&ldivisor.abs()) {
                Ordering::Less => false,
                Ordering::Greater => true,
                Ordering::Equal => match mode {
                    RoundingMode::HalfUp => true,
                    RoundingMode::HalfDown => false,
                    _ => q.test_bit(0),
                },
            }
        }
    }
}

/// Removes trailing zero digits while the scale stays above the preferred
/// scale.
fn strip_zeros_to_match_scale(
    mut int_val: BigInt,
    mut scale: i64,
    preferred_scale: i64,
) -> BigDecimal {
    let ten = BigInt::from(10u32);
    while int_val.abs() >= ten && scale > preferred_scale {
        if int_val.test_bit(0) {
            break;
        }
        let (q, r) = int_val.div_rem(&ten);
        if !r.is_zero() {
            break;
        }
        int_val = q;
        scale -= 1;
    }
    BigDecimal::from_coeff(Coeff::from_big(int_val), check_scale_nonzero(scale))
}

/// Rounds to the context's precision by repeatedly dropping the excess
/// trailing digits; rounding can carry into a new leading digit, hence
/// the loop.
fn do_round(d: BigDecimal, mc: &MathContext) -> BigDecimal {
    let mcp = mc.precision() as u64;
    if mcp == 0 || d.precision() <= mcp {
        return d;
    }
    let mode = mc.rounding_mode();
    let mut int_val = d.coeff.to_big_int();
    let mut scale = d.scale as i64;
    loop {
        let prec = big_digit_length(&int_val);
        if prec <= mcp {
            break;
        }
        let drop = prec - mcp;
        scale = check_scale_nonzero(scale - drop as i64) as i64;
        let divisor = ten_pow_big(drop);
        let (q, r) = int_val.div_rem(&divisor);
        int_val = if r.is_zero() {
            q
        } else {
            let qsign = int_val.signum();
            if need_increment(&divisor, mode, qsign, &q, &r) {
                if qsign > 0 {
                    q + BigInt::one()
                } else {
                    q - BigInt::one()
                }
            } else {
                q
            }
        };
    }
    BigDecimal::from_coeff(Coeff::from_big(int_val), scale as i32)
}

impl PartialEq for BigDecimal {
    /// Scale-sensitive equality: `2.0 != 2.00` even though they compare
    /// numerically equal.
    fn eq(&self, other: &BigDecimal) -> bool {
        self.scale == other.scale && self.coeff == other.coeff
    }
}

impl Eq for BigDecimal {}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coeff.hash(state);
        self.scale.hash(state);
    }
}

impl PartialOrd for BigDecimal {
    /// Numeric-value ordering; always defined. `Ord` is withheld because
    /// this ordering disagrees with `Eq` on equal values at different
    /// scales.
    fn partial_cmp(&self, other: &BigDecimal) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Add<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    fn add(self, other: &BigDecimal) -> BigDecimal {
        self.add_ref(other)
    }
}
forward_all_binop_to_ref_ref!(impl Add for BigDecimal, add);

impl Sub<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    fn sub(self, other: &BigDecimal) -> BigDecimal {
        self.add_ref(&-other)
    }
}
forward_all_binop_to_ref_ref!(impl Sub for BigDecimal, sub);

impl Mul<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    fn mul(self, other: &BigDecimal) -> BigDecimal {
        self.mul_ref(other)
    }
}
forward_all_binop_to_ref_ref!(impl Mul for BigDecimal, mul);

impl Div<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    /// Exact division.
    ///
    /// # Panics
    ///
    /// Panics on division by zero and when the exact quotient has a
    /// non-terminating decimal expansion; use
    /// [`divide_with_context`](BigDecimal::divide_with_context) for the
    /// rounded form.
    fn div(self, other: &BigDecimal) -> BigDecimal {
        self.divide_exact(other)
    }
}
forward_all_binop_to_ref_ref!(impl Div for BigDecimal, div);

impl Rem<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    fn rem(self, other: &BigDecimal) -> BigDecimal {
        self.remainder(other)
    }
}
forward_all_binop_to_ref_ref!(impl Rem for BigDecimal, rem);

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        BigDecimal::from_coeff(self.coeff.neg(), self.scale)
    }
}

impl Neg for BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        -&self
    }
}

impl Zero for BigDecimal {
    #[inline]
    fn zero() -> BigDecimal {
        BigDecimal::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }
}

impl One for BigDecimal {
    #[inline]
    fn one() -> BigDecimal {
        BigDecimal::ONE
    }
}

impl Default for BigDecimal {
    #[inline]
    fn default() -> BigDecimal {
        BigDecimal::ZERO
    }
}

impl From<BigInt> for BigDecimal {
    fn from(n: BigInt) -> BigDecimal {
        BigDecimal::new(n, 0)
    }
}

impl From<i64> for BigDecimal {
    fn from(n: i64) -> BigDecimal {
        BigDecimal::from_coeff(Coeff::Compact(n), 0)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigDecimal {
                #[inline]
                fn from(n: $t) -> BigDecimal {
                    BigDecimal::from(n as i64)
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i8, i16, i32);

impl From<u64> for BigDecimal {
    fn from(n: u64) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl From<i128> for BigDecimal {
    fn from(n: i128) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl From<u128> for BigDecimal {
    fn from(n: u128) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl ToPrimitive for BigDecimal {
    fn to_i64(&self) -> Option<i64> {
        self.to_big_int().to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_big_int().to_u64()
    }

    fn to_i128(&self) -> Option<i128> {
        self.to_big_int().to_i128()
    }

    fn to_u128(&self) -> Option<u128> {
        self.to_big_int().to_u128()
    }

    fn to_f32(&self) -> Option<f32> {
        self.to_string().parse().ok()
    }

    // The float parser rounds correctly to nearest, so routing through
    // the canonical string is exact.
    fn to_f64(&self) -> Option<f64> {
        self.to_string().parse().ok()
    }
}

impl FromPrimitive for BigDecimal {
    #[inline]
    fn from_i64(n: i64) -> Option<BigDecimal> {
        Some(BigDecimal::from(n))
    }

    #[inline]
    fn from_u64(n: u64) -> Option<BigDecimal> {
        Some(BigDecimal::from(n))
    }

    #[inline]
    fn from_i128(n: i128) -> Option<BigDecimal> {
        Some(BigDecimal::from(n))
    }

    #[inline]
    fn from_u128(n: u128) -> Option<BigDecimal> {
        Some(BigDecimal::from(n))
    }

    fn from_f64(n: f64) -> Option<BigDecimal> {
        if n.is_finite() {
            Some(BigDecimal::from_f64(n))
        } else {
            None
        }
    }
}

impl Num for BigDecimal {
    type FromStrRadixErr = crate::ParseBigDecimalError;

    /// Parses a decimal string; only radix 10 is supported.
    ///
    /// # Panics
    ///
    /// Panics when `radix` is not 10.
    fn from_str_radix(s: &str, radix: u32) -> Result<BigDecimal, crate::ParseBigDecimalError> {
        assert_eq!(radix, 10, "the only valid radix for a decimal is 10");
        s.parse()
    }
}

impl Signed for BigDecimal {
    fn abs(&self) -> BigDecimal {
        BigDecimal::abs(self)
    }

    fn abs_sub(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare(other) == Ordering::Greater {
            self - other
        } else {
            BigDecimal::ZERO
        }
    }

    fn signum(&self) -> BigDecimal {
        BigDecimal::from(i64::from(self.coeff.signum()))
    }

    fn is_positive(&self) -> bool {
        self.coeff.signum() > 0
    }

    fn is_negative(&self) -> bool {
        self.coeff.signum() < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_construction() {
        let d = BigDecimal::new(BigInt::from(123), -1);
        assert_eq!(d.unscaled_value(), BigInt::from(123));
        assert_eq!(d.scale(), -1);
        assert_eq!(BigDecimal::from(42u8), dec("42"));
        assert_eq!(BigDecimal::from_i64_scaled(1234, 2), dec("12.34"));
        assert_eq!(BigDecimal::from(BigInt::from(7)), dec("7"));
    }

    #[test]
    fn test_precision() {
        assert_eq!(BigDecimal::ZERO.precision(), 1);
        assert_eq!(dec("0.00").precision(), 1);
        assert_eq!(dec("123").precision(), 3);
        assert_eq!(dec("-1.23456").precision(), 6);
        assert_eq!(dec("1000000000000000000000000").precision(), 25);
        assert_eq!(dec("999999999999999999999999").precision(), 24);
    }

    #[test]
    fn test_digit_length_boundaries() {
        for (i, &p) in LONG_TEN_POWERS_TABLE.iter().enumerate() {
            assert_eq!(long_digit_length(p as u64), i as u64 + 1);
            if i > 0 {
                assert_eq!(long_digit_length(p as u64 - 1), i as u64);
            }
        }
        // The largest reachable input is |i64::MIN| = 2^63, 19 digits.
        assert_eq!(long_digit_length(1u64 << 63), 19);
    }

    #[test]
    fn test_precision_compact_extremes() {
        assert_eq!(BigDecimal::from(i64::MIN).precision(), 19);
        assert_eq!(BigDecimal::from(i64::MAX).precision(), 19);
        // A wrong digit count here would flip the adjusted-exponent
        // shortcut against a 19-digit big coefficient.
        assert_eq!(
            BigDecimal::from(i64::MIN).compare(&dec("-9999999999999999999")),
            Ordering::Greater
        );
        assert_eq!(
            BigDecimal::from(i64::MIN).compare(&dec("-9223372036854775807")),
            Ordering::Less
        );
    }

    #[test]
    fn test_add_preferred_scale() {
        assert_eq!(dec("1.10") + dec("2.30"), dec("3.40"));
        assert_eq!((dec("1.10") + dec("2.30")).scale(), 2);
        assert_eq!(dec("1.1") + dec("2.30"), dec("3.40"));
        assert_eq!(dec("0.0") + dec("5"), dec("5.0"));
        assert_eq!(dec("-1.5") + dec("1.5"), dec("0.0"));
    }

    #[test]
    fn test_sub() {
        assert_eq!(dec("3.40") - dec("1.1"), dec("2.30"));
        assert_eq!(dec("1") - dec("2"), dec("-1"));
        assert_eq!((dec("2.00") - dec("2.0")).scale(), 2);
    }

    #[test]
    fn test_mul_preferred_scale() {
        let p = dec("1.1") * dec("2.30");
        assert_eq!(p, dec("2.530"));
        assert_eq!(p.scale(), 3);
        assert_eq!(dec("-3") * dec("0.5"), dec("-1.5"));
        // Compact overflow falls back to the big path.
        let big = dec("9223372036854775807") * dec("9223372036854775807");
        assert_eq!(big.to_string(), "85070591730234615847396907784232501249");
    }

    #[test]
    fn test_divide_exact() {
        assert_eq!((BigDecimal::ONE / dec("4")).to_string(), "0.25");
        assert_eq!((dec("19") / dec("100")).to_string(), "0.19");
        assert_eq!((dec("10") / dec("4")).to_string(), "2.5");
        assert_eq!((dec("8.0") / dec("4")).to_string(), "2.0");
        assert_eq!((dec("1.00") / dec("0.5")).to_string(), "2.0");
        assert_eq!((dec("-7") / dec("2")).to_string(), "-3.5");
        assert_eq!((dec("0") / dec("3")).to_string(), "0");
    }

    #[test]
    #[should_panic(expected = "Non-terminating")]
    fn test_divide_exact_non_terminating() {
        let _ = BigDecimal::ONE / dec("3");
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_divide_by_zero() {
        let _ = dec("1") / dec("0");
    }

    #[test]
    #[should_panic(expected = "division undefined")]
    fn test_zero_divide_by_zero() {
        let _ = dec("0") / dec("0.0");
    }

    #[test]
    fn test_divide_with_context_floor_scenarios() {
        let mc = MathContext::new(3, RoundingMode::Floor);
        let q = dec("19").divide_with_context(&dec("100"), &mc);
        assert_eq!(q.unscaled_value(), BigInt::from(19));
        assert_eq!(q.scale(), 2);

        let q = dec("21").divide_with_context(&dec("110"), &mc);
        assert_eq!(q.unscaled_value(), BigInt::from(190));
        assert_eq!(q.scale(), 3);
    }

    #[test]
    fn test_divide_with_context() {
        let mc = MathContext::new(4, RoundingMode::HalfEven);
        assert_eq!(
            BigDecimal::ONE.divide_with_context(&dec("3"), &mc).to_string(),
            "0.3333"
        );
        assert_eq!(
            dec("2").divide_with_context(&dec("3"), &mc).to_string(),
            "0.6667"
        );
        assert_eq!(
            dec("1000").divide_with_context(&dec("3"), &mc).to_string(),
            "333.3"
        );
        // Exact quotients keep the preferred scale.
        assert_eq!(
            dec("8").divide_with_context(&dec("2"), &mc).to_string(),
            "4"
        );
    }

    #[test]
    fn test_divide_with_scale() {
        let q = dec("1").divide_with_scale(&dec("3"), 4, RoundingMode::HalfUp);
        assert_eq!(q.to_string(), "0.3333");
        let q = dec("2").divide_with_scale(&dec("3"), 4, RoundingMode::HalfUp);
        assert_eq!(q.to_string(), "0.6667");
        let q = dec("100").divide_with_scale(&dec("7"), 0, RoundingMode::Ceiling);
        assert_eq!(q.to_string(), "15");
    }

    #[test]
    #[should_panic(expected = "Rounding necessary")]
    fn test_divide_with_scale_unnecessary() {
        let _ = dec("1").divide_with_scale(&dec("3"), 4, RoundingMode::Unnecessary);
    }

    #[test]
    fn test_divide_to_integral_value() {
        assert_eq!(
            dec("7.5").divide_to_integral_value(&dec("2")).to_string(),
            "3.0"
        );
        assert_eq!(
            dec("-7.5").divide_to_integral_value(&dec("2")).to_string(),
            "-3.0"
        );
        assert_eq!(
            dec("1").divide_to_integral_value(&dec("3")).to_string(),
            "0"
        );
        // Preferred scale is dividend scale minus divisor scale.
        let q = dec("100.0").divide_to_integral_value(&dec("3"));
        assert_eq!(q.scale(), 1);
        assert_eq!(q.to_string(), "33.0");
    }

    #[test]
    fn test_remainder_sign_follows_dividend() {
        assert_eq!(dec("7.5").remainder(&dec("2")).to_string(), "1.5");
        assert_eq!(dec("-7.5").remainder(&dec("2")).to_string(), "-1.5");
        assert_eq!(dec("7.5").remainder(&dec("-2")).to_string(), "1.5");
        assert_eq!((dec("10") % dec("3")).to_string(), "1");
        let (q, r) = dec("17").divide_and_remainder(&dec("5"));
        assert_eq!(q.to_string(), "3");
        assert_eq!(r.to_string(), "2");
    }

    #[test]
    fn test_pow() {
        assert_eq!(dec("2").pow(10).to_string(), "1024");
        assert_eq!(dec("0.5").pow(3).to_string(), "0.125");
        assert_eq!((dec("1.5").pow(2)).scale(), 2);
        assert_eq!(dec("7").pow(0), BigDecimal::ONE);
    }

    #[test]
    fn test_pow_with_context() {
        let mc = MathContext::new(5, RoundingMode::HalfEven);
        assert_eq!(dec("2").pow_with_context(10, &mc).to_string(), "1024");
        assert_eq!(dec("3").pow_with_context(20, &mc).to_string(), "3.4868E+9");
        // Negative exponents invert at working precision.
        assert_eq!(dec("2").pow_with_context(-2, &mc).to_string(), "0.25");
        assert_eq!(dec("4").pow_with_context(0, &mc), BigDecimal::ONE);
    }

    #[test]
    #[should_panic(expected = "Invalid operation")]
    fn test_pow_negative_without_precision() {
        let _ = dec("2").pow_with_context(-1, &MathContext::UNLIMITED);
    }

    #[test]
    fn test_round() {
        let mc = MathContext::new(3, RoundingMode::HalfUp);
        assert_eq!(dec("123456").round(&mc).to_string(), "1.23E+5");
        assert_eq!(dec("3.14159").round(&mc).to_string(), "3.14");
        assert_eq!(dec("9.999").round(&mc).to_string(), "10.0");
        assert_eq!(dec("1.5").round(&MathContext::UNLIMITED), dec("1.5"));
    }

    #[test]
    fn test_set_scale() {
        assert_eq!(dec("2").set_scale(2).to_string(), "2.00");
        assert_eq!(
            dec("2.567")
                .set_scale_with_rounding(2, RoundingMode::HalfUp)
                .to_string(),
            "2.57"
        );
        assert_eq!(
            dec("2.567")
                .set_scale_with_rounding(0, RoundingMode::Down)
                .to_string(),
            "2"
        );
        assert_eq!(
            dec("-2.5")
                .set_scale_with_rounding(0, RoundingMode::Floor)
                .to_string(),
            "-3"
        );
        // Idempotence when no information is lost.
        let x = dec("1.23");
        assert_eq!(x.set_scale(5).set_scale(x.scale()), x);
    }

    #[test]
    #[should_panic(expected = "Rounding necessary")]
    fn test_set_scale_unnecessary() {
        let _ = dec("2.5").set_scale(0);
    }

    #[test]
    fn test_strip_trailing_zeros() {
        assert_eq!(dec("1.500").strip_trailing_zeros().to_string(), "1.5");
        assert_eq!(dec("600.0").strip_trailing_zeros().to_string(), "6E+2");
        assert_eq!(dec("0.000").strip_trailing_zeros(), BigDecimal::ZERO);
        assert_eq!(dec("1.23").strip_trailing_zeros(), dec("1.23"));
    }

    #[test]
    fn test_move_point() {
        assert_eq!(dec("123.45").move_point_left(2).to_string(), "1.2345");
        assert_eq!(dec("123.45").move_point_right(2).to_string(), "12345");
        assert_eq!(dec("1.5").move_point_right(3).to_string(), "1500");
        assert_eq!(dec("1.5").move_point_left(-3).to_string(), "1500");
        // Scale never goes negative through the move-point forms.
        assert_eq!(dec("1.5").move_point_right(5).scale(), 0);
        assert_eq!(dec("1.5").scale_by_power_of_ten(5).scale(), -4);
        assert_eq!(dec("1.5").scale_by_power_of_ten(5).to_string(), "1.5E+5");
    }

    #[test]
    fn test_equals_compare_asymmetry() {
        let a = dec("2.0");
        let b = dec("2.00");
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert!(a != b);
        assert!(a.partial_cmp(&b) == Some(Ordering::Equal));
    }

    #[test]
    fn test_compare() {
        assert_eq!(dec("1.1").compare(&dec("1.2")), Ordering::Less);
        assert_eq!(dec("-1.1").compare(&dec("-1.2")), Ordering::Greater);
        assert_eq!(dec("100").compare(&dec("99.999")), Ordering::Greater);
        assert_eq!(dec("-5").compare(&dec("3")), Ordering::Less);
        assert_eq!(dec("0.00").compare(&dec("0")), Ordering::Equal);
        // Widely separated magnitudes decide on adjusted exponent alone.
        assert_eq!(dec("1E+100").compare(&dec("2E-100")), Ordering::Greater);
        assert_eq!(dec("-1E+100").compare(&dec("-2E-100")), Ordering::Less);
    }

    #[test]
    fn test_min_max_ulp_abs() {
        let a = dec("1.5");
        let b = dec("2.5");
        assert_eq!(a.min(&b), a);
        assert_eq!(a.max(&b), b);
        assert_eq!(dec("1.23").ulp().to_string(), "0.01");
        assert_eq!(dec("-4.2").abs(), dec("4.2"));
        assert_eq!(dec("-4.2").signum(), -1);
    }

    #[test]
    fn test_to_big_int() {
        assert_eq!(dec("3.75").to_big_int(), BigInt::from(3));
        assert_eq!(dec("-3.75").to_big_int(), BigInt::from(-3));
        assert_eq!(dec("4.00").to_big_int_exact(), BigInt::from(4));
        assert_eq!(dec("5E+3").to_big_int(), BigInt::from(5000));
    }

    #[test]
    #[should_panic(expected = "Rounding necessary")]
    fn test_to_big_int_exact_fractional() {
        let _ = dec("3.75").to_big_int_exact();
    }

    #[test]
    fn test_to_primitive() {
        assert_eq!(dec("42.9").to_i64(), Some(42));
        assert_eq!(dec("-42.9").to_i64(), Some(-42));
        assert_eq!(dec("0.5").to_f64(), Some(0.5));
        assert_eq!(dec("1E+400").to_f64(), Some(f64::INFINITY));
        assert_eq!(dec("-1").to_u64(), None);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(BigDecimal::from_f64(0.1).to_string(), "0.1");
        assert_eq!(BigDecimal::from_f64(-2.5).to_string(), "-2.5");
        // The exact expansion of 0.1 is the nearest double, not 1/10.
        let exact = BigDecimal::from_f64_exact(0.1);
        assert_eq!(
            exact.to_string(),
            "0.1000000000000000055511151231257827021181583404541015625"
        );
        assert_eq!(BigDecimal::from_f64_exact(0.5).to_string(), "0.5");
        assert_eq!(BigDecimal::from_f64_exact(-8.0).to_string(), "-8");
        assert_eq!(BigDecimal::from_f64_exact(0.0), BigDecimal::ZERO);
    }

    #[test]
    #[should_panic(expected = "infinite or NaN")]
    fn test_from_f64_nan() {
        let _ = BigDecimal::from_f64(f64::NAN);
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(d: &BigDecimal) -> u64 {
            let mut h = DefaultHasher::new();
            d.hash(&mut h);
            h.finish()
        }

        assert_eq!(hash_of(&dec("1.5")), hash_of(&dec("1.5")));
        // Scale-sensitive: numerically equal values at different scales
        // may hash apart, matching `==`.
        assert_ne!(dec("2.0"), dec("2.00"));
    }

    #[test]
    fn test_num_trait_parse() {
        let d: BigDecimal = Num::from_str_radix("-12.34", 10).unwrap();
        assert_eq!(d, dec("-12.34"));
        assert!(<BigDecimal as Num>::from_str_radix("bad", 10).is_err());
    }

    #[test]
    #[should_panic(expected = "radix")]
    fn test_num_trait_rejects_radix() {
        let _ = <BigDecimal as Num>::from_str_radix("10", 16);
    }

    #[test]
    fn test_signed_trait() {
        assert_eq!(Signed::signum(&dec("-4.2")), dec("-1"));
        assert_eq!(Signed::signum(&BigDecimal::ZERO), dec("0"));
        assert_eq!(Signed::abs(&dec("-4.2")), dec("4.2"));
        assert_eq!(dec("3.5").abs_sub(&dec("1.5")), dec("2.0"));
        assert_eq!(dec("1.5").abs_sub(&dec("3.5")), BigDecimal::ZERO);
        assert!(Signed::is_negative(&dec("-1")));
        assert!(Signed::is_positive(&dec("0.001")));
    }

    #[test]
    fn test_from_primitive() {
        assert_eq!(BigDecimal::from_i64(-7), Some(dec("-7")));
        assert_eq!(BigDecimal::from_u64(7), Some(dec("7")));
        assert_eq!(BigDecimal::from_u128(1u128 << 100).unwrap().precision(), 31);
        assert_eq!(
            <BigDecimal as FromPrimitive>::from_f64(2.5),
            Some(dec("2.5"))
        );
        assert_eq!(<BigDecimal as FromPrimitive>::from_f64(f64::NAN), None);
        assert_eq!(<BigDecimal as FromPrimitive>::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_neg() {
        assert_eq!(-dec("1.5"), dec("-1.5"));
        assert_eq!(-BigDecimal::ZERO, BigDecimal::ZERO);
        // i64::MIN's negation does not fit compact.
        let d = BigDecimal::from(i64::MIN);
        assert_eq!((-&d).to_string(), "9223372036854775808");
        assert_eq!(-(-&d), d);
    }
}
