//! Multiplication and squaring, dispatched by operand size.
//!
//! Schoolbook multiplication is used for small operands, Karatsuba for
//! medium ones and Toom-Cook-3 for large ones. Squaring has its own entry
//! points with higher thresholds since it can skip redundant cross terms.
//! The thresholds are tuning constants, not part of any contract.

use num_traits::{Signed, Zero};

use crate::big_digit::BigDigit;
use crate::bigint::Sign::{Minus, Plus};
use crate::bigint::{BigInt, Sign};

/// Word counts at or above which Karatsuba multiplication is used.
const KARATSUBA_THRESHOLD: usize = 80;
/// Word counts at or above which Toom-Cook-3 multiplication is used.
const TOOM_COOK_THRESHOLD: usize = 240;
/// Squaring switches to Karatsuba at this word count.
const KARATSUBA_SQUARE_THRESHOLD: usize = 128;
/// Squaring switches to Toom-Cook-3 at this word count.
const TOOM_COOK_SQUARE_THRESHOLD: usize = 216;
/// `x * x` with both operands being the same object squares instead.
const MULTIPLY_SQUARE_THRESHOLD: usize = 20;

pub(crate) fn multiply(x: &BigInt, y: &BigInt) -> BigInt {
    if x.is_zero() || y.is_zero() {
        return Zero::zero();
    }
    let xlen = x.len();
    if core::ptr::eq(x, y) && xlen > MULTIPLY_SQUARE_THRESHOLD {
        return square(x);
    }
    let ylen = y.len();

    if xlen < KARATSUBA_THRESHOLD || ylen < KARATSUBA_THRESHOLD {
        let result_sign = if x.sign == y.sign { Plus } else { Minus };
        if ylen == 1 {
            return multiply_by_word(&x.mag, y.mag[0], result_sign);
        }
        if xlen == 1 {
            return multiply_by_word(&y.mag, x.mag[0], result_sign);
        }
        let z = multiply_to_len(&x.mag, &y.mag);
        BigInt::from_magnitude(result_sign, z)
    } else if xlen < TOOM_COOK_THRESHOLD && ylen < TOOM_COOK_THRESHOLD {
        multiply_karatsuba(x, y)
    } else {
        multiply_toom_cook3(x, y)
    }
}

fn multiply_by_word(x: &[BigDigit], y: BigDigit, sign: Sign) -> BigInt {
    if y == 1 {
        return BigInt::from_magnitude(sign, x.to_vec());
    }
    let xlen = x.len();
    let mut mag = vec![0u32; xlen + 1];
    let yl = u64::from(y);
    let mut carry = 0u64;
    for i in (0..xlen).rev() {
        let product = u64::from(x[i]) * yl + carry;
        mag[i + 1] = product as u32;
        carry = product >> 32;
    }
    mag[0] = carry as u32;
    BigInt::from_magnitude(sign, mag)
}

/// Schoolbook O(n²) product of two big-endian magnitudes.
pub(crate) fn multiply_to_len(x: &[BigDigit], y: &[BigDigit]) -> Vec<BigDigit> {
    let xlen = x.len();
    let ylen = y.len();
    let xstart = xlen - 1;
    let ystart = ylen - 1;
    let mut z = vec![0u32; xlen + ylen];

    let mut carry = 0u64;
    let xw = u64::from(x[xstart]);
    let mut k = ystart + 1 + xstart;
    for j in (0..=ystart).rev() {
        let product = u64::from(y[j]) * xw + carry;
        z[k] = product as u32;
        carry = product >> 32;
        k = k.wrapping_sub(1);
    }
    z[xstart] = carry as u32;

    for i in (0..xstart).rev() {
        let xw = u64::from(x[i]);
        let mut carry = 0u64;
        let mut k = ystart + 1 + i;
        for j in (0..=ystart).rev() {
            let product = u64::from(y[j]) * xw + u64::from(z[k]) + carry;
            z[k] = product as u32;
            carry = product >> 32;
            k = k.wrapping_sub(1);
        }
        z[i] = carry as u32;
    }
    z
}

/// Low `n` words of `x`'s magnitude as a non-negative value.
fn get_lower(x: &BigInt, n: usize) -> BigInt {
    let len = x.len();
    if len <= n {
        return x.abs();
    }
    BigInt::from_magnitude(Plus, x.mag[len - n..].to_vec())
}

/// Magnitude of `x` above the low `n` words, as a non-negative value.
fn get_upper(x: &BigInt, n: usize) -> BigInt {
    let len = x.len();
    if len <= n {
        return Zero::zero();
    }
    BigInt::from_magnitude(Plus, x.mag[..len - n].to_vec())
}

fn multiply_karatsuba(x: &BigInt, y: &BigInt) -> BigInt {
    let xlen = x.len();
    let ylen = y.len();
    let half = (xlen.max(ylen) + 1) / 2;

    let xl = get_lower(x, half);
    let xh = get_upper(x, half);
    let yl = get_lower(y, half);
    let yh = get_upper(y, half);

    let p1 = &xh * &yh;
    let p2 = &xl * &yl;
    let p3 = (xh + xl) * (yh + yl);

    let shift = 32 * half as u64;
    let result = ((&p1).shift_left_unsigned(shift) + (p3 - &p1 - &p2))
        .shift_left_unsigned(shift)
        + p2;

    if x.sign != y.sign {
        -result
    } else {
        result
    }
}

/// One of the three Toom slices of `x`'s magnitude, as a non-negative value.
/// Slice 0 is the most significant (`upper_size` words), slices 1 and 2 take
/// `lower_size` words each, measured against the padded `full_size`.
fn get_toom_slice(x: &BigInt, lower_size: usize, upper_size: usize, slice: usize, full_size: usize) -> BigInt {
    let len = x.len() as isize;
    let offset = full_size as isize - len;
    let (mut start, end): (isize, isize) = if slice == 0 {
        (-offset, upper_size as isize - 1 - offset)
    } else {
        let s = upper_size as isize + (slice as isize - 1) * lower_size as isize - offset;
        (s, s + lower_size as isize - 1)
    };
    if start < 0 {
        start = 0;
    }
    if end < 0 {
        return Zero::zero();
    }
    let slice_size = end - start + 1;
    if slice_size <= 0 {
        return Zero::zero();
    }
    if start == 0 && slice_size >= len {
        return x.abs();
    }
    let start = start as usize;
    let end = end as usize;
    BigInt::from_magnitude(Plus, x.mag[start..=end].to_vec())
}

fn multiply_toom_cook3(a: &BigInt, b: &BigInt) -> BigInt {
    let alen = a.len();
    let blen = b.len();
    let largest = alen.max(blen);

    // k is the word size of the lower two slices, r of the high slice.
    let k = (largest + 2) / 3;
    let r = largest - 2 * k;

    let a2 = get_toom_slice(a, k, r, 0, largest);
    let a1 = get_toom_slice(a, k, r, 1, largest);
    let a0 = get_toom_slice(a, k, r, 2, largest);
    let b2 = get_toom_slice(b, k, r, 0, largest);
    let b1 = get_toom_slice(b, k, r, 1, largest);
    let b0 = get_toom_slice(b, k, r, 2, largest);

    let v0 = &a0 * &b0;
    let mut da1 = &a2 + &a0;
    let mut db1 = &b2 + &b0;
    let vm1 = (&da1 - &a1) * (&db1 - &b1);
    da1 = da1 + &a1;
    db1 = db1 + &b1;
    let v1 = &da1 * &db1;
    let v2 = ((&da1 + &a2).shift_left_unsigned(1) - &a0)
        * ((&db1 + &b2).shift_left_unsigned(1) - &b0);
    let vinf = &a2 * &b2;

    // Two divisions by 2 and one by 3; all are exact.
    let mut t2 = exact_divide_by_3(&(&v2 - &vm1));
    let mut tm1 = (&v1 - &vm1).shift_right_exact(1);
    let mut t1 = &v1 - &v0;
    t2 = (t2 - &t1).shift_right_exact(1);
    t1 = t1 - &tm1 - &vinf;
    t2 = t2 - (&vinf).shift_left_unsigned(1);
    tm1 = tm1 - &t2;

    let ss = 32 * k as u64;
    let result = (((vinf.shift_left_unsigned(ss) + t2).shift_left_unsigned(ss) + t1)
        .shift_left_unsigned(ss)
        + tm1)
        .shift_left_unsigned(ss)
        + v0;

    if a.sign != b.sign {
        -result
    } else {
        result
    }
}

/// Divides by 3 assuming the division is exact, working word by word with
/// the modular inverse of 3 (0xAAAAAAAB mod 2^32).
fn exact_divide_by_3(x: &BigInt) -> BigInt {
    let len = x.len();
    let mut result = vec![0u32; len];
    let mut borrow = 0u64;
    for i in (0..len).rev() {
        let xw = u64::from(x.mag[i]);
        let w = xw.wrapping_sub(borrow);
        borrow = if borrow > xw { 1 } else { 0 };
        let q = w.wrapping_mul(0xAAAA_AAAB) & 0xFFFF_FFFF;
        result[i] = q as u32;
        if q >= 0x5555_5556 {
            borrow += 1;
            if q >= 0xAAAA_AAAB {
                borrow += 1;
            }
        }
    }
    BigInt::from_magnitude(x.sign, result)
}

// --- squaring ---

pub(crate) fn square(x: &BigInt) -> BigInt {
    if x.is_zero() {
        return Zero::zero();
    }
    let len = x.len();
    if len < KARATSUBA_SQUARE_THRESHOLD {
        BigInt::from_magnitude(Plus, square_to_len(&x.mag))
    } else if len < TOOM_COOK_SQUARE_THRESHOLD {
        square_karatsuba(x)
    } else {
        square_toom_cook3(x)
    }
}

/// Schoolbook squaring: squares on the diagonal, doubled off-diagonal sums.
/// The intermediate is kept right-shifted by one bit and shifted back at the
/// end so the doubling is a single pass.
fn square_to_len(x: &[BigDigit]) -> Vec<BigDigit> {
    let len = x.len();
    let zlen = 2 * len;
    let mut z = vec![0u32; zlen];

    // Store the squares, right shifted one bit.
    let mut last_product_low_word: u32 = 0;
    let mut i = 0;
    for &xw in x.iter() {
        let piece = u64::from(xw);
        let product = piece * piece;
        z[i] = (last_product_low_word << 31) | ((product >> 33) as u32);
        z[i + 1] = (product >> 1) as u32;
        i += 2;
        last_product_low_word = product as u32;
    }

    // Add in off-diagonal sums.
    let mut offset = 1;
    for i in (1..=len).rev() {
        let t = x[i - 1];
        let t = mul_add(&mut z, &x[..i - 1], offset, t);
        add_one(&mut z, offset - 1, i, t);
        offset += 2;
    }

    // Shift back up and set low bit.
    primitive_left_shift(&mut z, 1);
    z[zlen - 1] |= x[len - 1] & 1;
    z
}

/// `out[..] += in * k`, aligned `offset` words up from the low end of `out`.
/// Returns the carry out of the highest touched word.
pub(crate) fn mul_add(out: &mut [u32], input: &[u32], offset: usize, k: u32) -> u32 {
    let k = u64::from(k);
    let mut carry = 0u64;
    let mut pos = out.len() - offset - 1;
    for &w in input.iter().rev() {
        let product = u64::from(w) * k + u64::from(out[pos]) + carry;
        out[pos] = product as u32;
        carry = product >> 32;
        pos = pos.wrapping_sub(1);
    }
    carry as u32
}

/// Adds `carry` into `a` at `offset` words (plus `mlen`) up from the low
/// end, propagating at most `mlen` words. Returns the carry out.
pub(crate) fn add_one(a: &mut [u32], offset: usize, mlen: usize, carry: u32) -> u32 {
    let mut idx = a.len() - 1 - mlen - offset;
    let t = u64::from(a[idx]) + u64::from(carry);
    a[idx] = t as u32;
    if t >> 32 == 0 {
        return 0;
    }
    let mut remaining = mlen;
    loop {
        if remaining == 0 {
            return 1;
        }
        remaining -= 1;
        if idx == 0 {
            return 1;
        }
        idx -= 1;
        a[idx] = a[idx].wrapping_add(1);
        if a[idx] != 0 {
            return 0;
        }
    }
}

/// Shifts `a` left by `n` bits in place, `0 < n < 32`, discarding overflow.
pub(crate) fn primitive_left_shift(a: &mut [u32], n: u32) {
    if a.is_empty() || n == 0 {
        return;
    }
    let n2 = 32 - n;
    let len = a.len();
    let mut c = a[0];
    for i in 0..len - 1 {
        let b = c;
        c = a[i + 1];
        a[i] = (b << n) | (c >> n2);
    }
    a[len - 1] <<= n;
}

fn square_karatsuba(x: &BigInt) -> BigInt {
    let half = (x.len() + 1) / 2;
    let xl = get_lower(x, half);
    let xh = get_upper(x, half);
    let xhs = square(&xh);
    let xls = square(&xl);
    let shift = 32 * half as u64;
    ((&xhs).shift_left_unsigned(shift) + (square(&(xl + xh)) - (xhs + &xls)))
        .shift_left_unsigned(shift)
        + xls
}

fn square_toom_cook3(x: &BigInt) -> BigInt {
    let len = x.len();
    let k = (len + 2) / 3;
    let r = len - 2 * k;

    let a2 = get_toom_slice(x, k, r, 0, len);
    let a1 = get_toom_slice(x, k, r, 1, len);
    let a0 = get_toom_slice(x, k, r, 2, len);

    let v0 = square(&a0);
    let mut da1 = &a2 + &a0;
    let vm1 = square(&(&da1 - &a1));
    da1 = da1 + &a1;
    let v1 = square(&da1);
    let vinf = square(&a2);
    let v2 = square(&((&da1 + &a2).shift_left_unsigned(1) - &a0));

    let mut t2 = exact_divide_by_3(&(&v2 - &vm1));
    let mut tm1 = (&v1 - &vm1).shift_right_exact(1);
    let mut t1 = &v1 - &v0;
    t2 = (t2 - &t1).shift_right_exact(1);
    t1 = t1 - &tm1 - &vinf;
    t2 = t2 - (&vinf).shift_left_unsigned(1);
    tm1 = tm1 - &t2;

    let ss = 32 * k as u64;
    (((vinf.shift_left_unsigned(ss) + t2).shift_left_unsigned(ss) + t1).shift_left_unsigned(ss)
        + tm1)
        .shift_left_unsigned(ss)
        + v0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use crate::bigrand::RandBigInt;

    fn schoolbook(x: &BigInt, y: &BigInt) -> BigInt {
        if x.is_zero() || y.is_zero() {
            return Zero::zero();
        }
        let sign = if x.sign == y.sign { Plus } else { Minus };
        BigInt::from_magnitude(sign, multiply_to_len(&x.mag, &y.mag))
    }

    #[test]
    fn test_schoolbook_small() {
        let a = BigInt::from(0xFFFF_FFFFu64);
        let b = BigInt::from(0xFFFF_FFFFu64);
        assert_eq!(&a * &b, BigInt::from(0xFFFF_FFFEu64 << 32 | 1));
    }

    #[test]
    fn test_karatsuba_matches_schoolbook() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..10 {
            // 100 words each: Karatsuba range.
            let a = rng.gen_bigint(3200);
            let b = rng.gen_bigint(3200);
            assert_eq!(&a * &b, schoolbook(&a, &b));
        }
    }

    #[test]
    fn test_toom_cook_matches_schoolbook() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..4 {
            // 300 words each: Toom-Cook-3 range.
            let a = rng.gen_bigint(9600);
            let b = rng.gen_bigint(9600);
            assert_eq!(&a * &b, schoolbook(&a, &b));
        }
    }

    #[test]
    fn test_unbalanced_operands() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        let a = rng.gen_bigint(12800);
        let b = rng.gen_bigint(96);
        assert_eq!(&a * &b, schoolbook(&a, &b));
    }

    #[test]
    fn test_square_matches_multiply() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for &bits in &[31u64, 64, 1000, 4200, 7000] {
            let a = rng.gen_bigint(bits);
            assert_eq!(square(&a), schoolbook(&a, &a));
        }
    }

    #[test]
    fn test_exact_divide_by_3() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..20 {
            let a = rng.gen_bigint(500);
            let m = &a * &BigInt::from(3);
            assert_eq!(exact_divide_by_3(&m), a);
        }
    }
}
