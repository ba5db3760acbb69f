//! Canonical string layout and parsing for [`BigDecimal`].
//!
//! Every distinct (coefficient, scale) pair maps to a unique canonical
//! string, and parsing that string recovers the exact pair.

use core::fmt;
use core::str::FromStr;

use num_traits::Signed;

use super::{BigDecimal, Coeff};
use crate::bigint::BigInt;
use crate::ParseBigDecimalError;

impl BigDecimal {
    /// The canonical form with the exponent, when one is needed, adjusted
    /// to a multiple of three.
    pub fn to_engineering_string(&self) -> String {
        self.layout_chars(false)
    }

    /// The value without exponent notation, expanding the scale into
    /// leading or trailing zeros as needed.
    pub fn to_plain_string(&self) -> String {
        if self.scale == 0 {
            return self.coeff.to_big_int().to_string();
        }
        if self.scale < 0 {
            if self.signum() == 0 {
                return "0".to_string();
            }
            let mut buf = self.coeff.to_big_int().to_string();
            for _ in 0..(-(self.scale as i64)) {
                buf.push('0');
            }
            return buf;
        }
        plain_string(self.signum(), &self.abs_digits(), self.scale)
    }

    fn abs_digits(&self) -> String {
        match &self.coeff {
            Coeff::Compact(v) => v.unsigned_abs().to_string(),
            Coeff::Big(b) => b.abs().to_string(),
        }
    }

    /// Canonical layout: plain notation when the scale is
    /// non-negative and the adjusted exponent is at least -6, scientific
    /// (or engineering) notation otherwise.
    fn layout_chars(&self, sci: bool) -> String {
        if self.scale == 0 {
            return self.coeff.to_big_int().to_string();
        }
        let coeff = self.abs_digits();
        let mut adjusted = -(self.scale as i64) + (coeff.len() as i64 - 1);
        if self.scale >= 0 && adjusted >= -6 {
            return plain_string(self.signum(), &coeff, self.scale);
        }

        let mut buf = String::with_capacity(coeff.len() + 16);
        if self.signum() < 0 {
            buf.push('-');
        }
        if sci {
            if coeff.len() > 1 {
                buf.push_str(&coeff[..1]);
                buf.push('.');
                buf.push_str(&coeff[1..]);
            } else {
                buf.push_str(&coeff);
            }
        } else {
            let mut sig = (adjusted % 3) as i32;
            if sig < 0 {
                sig += 3;
            }
            adjusted -= sig as i64;
            let sig = sig as usize + 1;
            if self.signum() == 0 {
                match sig {
                    1 => buf.push('0'),
                    2 => {
                        buf.push_str("0.00");
                        adjusted += 3;
                    }
                    _ => {
                        buf.push_str("0.0");
                        adjusted += 3;
                    }
                }
            } else if sig >= coeff.len() {
                buf.push_str(&coeff);
                for _ in 0..(sig - coeff.len()) {
                    buf.push('0');
                }
            } else {
                buf.push_str(&coeff[..sig]);
                buf.push('.');
                buf.push_str(&coeff[sig..]);
            }
        }
        if adjusted != 0 {
            buf.push('E');
            if adjusted > 0 {
                buf.push('+');
            }
            buf.push_str(&adjusted.to_string());
        }
        buf
    }
}

/// Plain decimal rendering of an absolute digit string at a non-negative
/// scale.
fn plain_string(signum: i32, coeff: &str, scale: i32) -> String {
    debug_assert!(scale >= 0);
    let mut buf = String::with_capacity(coeff.len() + scale as usize + 3);
    if signum < 0 {
        buf.push('-');
    }
    let pad = scale as i64 - coeff.len() as i64;
    if pad >= 0 {
        buf.push_str("0.");
        for _ in 0..pad {
            buf.push('0');
        }
        buf.push_str(coeff);
    } else {
        let point = (-pad) as usize;
        buf.push_str(&coeff[..point]);
        buf.push('.');
        buf.push_str(&coeff[point..]);
    }
    buf
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.layout_chars(true))
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for BigDecimal {
    type Err = ParseBigDecimalError;

    /// Parses `[+-]? digits [. digits?] ([eE] [+-]? digits)?` with at
    /// least one coefficient digit; the scale is the fraction digit count
    /// minus the exponent.
    fn from_str(s: &str) -> Result<BigDecimal, ParseBigDecimalError> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(ParseBigDecimalError::Empty);
        }
        let mut idx = 0;
        let negative = match bytes[0] {
            b'+' => {
                idx = 1;
                false
            }
            b'-' => {
                idx = 1;
                true
            }
            _ => false,
        };
        if idx == bytes.len() {
            return Err(ParseBigDecimalError::Empty);
        }

        let mut digits = String::with_capacity(bytes.len());
        let mut frac_digits = 0i64;
        let mut seen_dot = false;
        let mut exponent = 0i64;
        let mut i = idx;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => {
                    digits.push(bytes[i] as char);
                    if seen_dot {
                        frac_digits += 1;
                    }
                    i += 1;
                }
                b'.' => {
                    if seen_dot {
                        return Err(ParseBigDecimalError::Invalid);
                    }
                    seen_dot = true;
                    i += 1;
                }
                b'e' | b'E' => {
                    exponent = parse_exponent(&s[i + 1..])?;
                    i = bytes.len();
                }
                _ => return Err(ParseBigDecimalError::Invalid),
            }
        }
        if digits.is_empty() {
            return Err(ParseBigDecimalError::Invalid);
        }

        let coeff = if digits.len() <= 18 {
            let mut v = 0i64;
            for b in digits.bytes() {
                v = v * 10 + (b - b'0') as i64;
            }
            Coeff::Compact(if negative { -v } else { v })
        } else {
            let mut n = BigInt::from_str(&digits).map_err(|_| ParseBigDecimalError::Invalid)?;
            if negative {
                n = -n;
            }
            Coeff::from_big(n)
        };
        let scale = i32::try_from(frac_digits - exponent)
            .map_err(|_| ParseBigDecimalError::ExponentOverflow)?;
        Ok(BigDecimal::from_coeff(coeff, scale))
    }
}

fn parse_exponent(text: &str) -> Result<i64, ParseBigDecimalError> {
    match text.parse::<i64>() {
        Ok(e) => Ok(e),
        Err(_) => {
            let bytes = text.as_bytes();
            let digits = match bytes.first() {
                Some(b'+') | Some(b'-') => &bytes[1..],
                _ => bytes,
            };
            if !digits.is_empty() && digits.iter().all(|b| b.is_ascii_digit()) {
                Err(ParseBigDecimalError::ExponentOverflow)
            } else {
                Err(ParseBigDecimalError::Invalid)
            }
        }
    }
}
