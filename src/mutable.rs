//! Mutable big-integer scratch buffers backing division, gcd and modular
//! inverse.
//!
//! A [`MutableBigInt`] is a growable word vector with a logical
//! `[offset, offset + len)` window of significant big-endian words. It is
//! created per operation, mutated freely, and converted back to an immutable
//! [`BigInt`] at the end; it never escapes the crate.

use core::cmp::Ordering::{self, Equal, Greater, Less};

use num_integer::Integer;
use num_traits::{One, Zero};

use crate::big_digit::bit_len;
use crate::bigint::Sign::{self, Plus};
use crate::bigint::{add_mag, cmp_mag, multiplication, sub_mag, BigInt};
use crate::traits::extended_gcd;

/// Word count of the divisor at which Burnikel-Ziegler division kicks in,
/// provided the dividend exceeds the divisor by [`BURNIKEL_ZIEGLER_OFFSET`].
const BURNIKEL_ZIEGLER_THRESHOLD: usize = 80;
const BURNIKEL_ZIEGLER_OFFSET: usize = 40;

/// Dividend word count at which cancelling common powers of two before
/// Knuth division pays off, and the word count of zeros required.
const KNUTH_POW2_THRESH_LEN: usize = 6;
const KNUTH_POW2_THRESH_ZEROS: usize = 3;

#[derive(Clone, Debug)]
pub(crate) struct MutableBigInt {
    /// Backing storage; may hold words outside the active window.
    value: Vec<u32>,
    /// Index of the first significant word.
    offset: usize,
    /// Count of significant words in use.
    len: usize,
}

/// Divides one normalized big-endian magnitude by another, dispatching
/// between Knuth and Burnikel-Ziegler division. Returns `(quotient,
/// remainder)` magnitudes.
pub(crate) fn divide_magnitudes(dividend: &[u32], divisor: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let a = MutableBigInt::from_slice(dividend);
    let b = MutableBigInt::from_slice(divisor);
    let (q, r) = a.div_rem(&b);
    (q.to_vec(), r.to_vec())
}

impl MutableBigInt {
    pub(crate) fn new() -> MutableBigInt {
        MutableBigInt {
            value: Vec::new(),
            offset: 0,
            len: 0,
        }
    }

    pub(crate) fn from_word(w: u32) -> MutableBigInt {
        if w == 0 {
            return MutableBigInt::new();
        }
        MutableBigInt {
            value: vec![w],
            offset: 0,
            len: 1,
        }
    }

    pub(crate) fn from_u64(w: u64) -> MutableBigInt {
        let mut m = MutableBigInt {
            value: vec![(w >> 32) as u32, w as u32],
            offset: 0,
            len: 2,
        };
        m.normalize();
        m
    }

    pub(crate) fn from_vec(v: Vec<u32>) -> MutableBigInt {
        let len = v.len();
        let mut m = MutableBigInt {
            value: v,
            offset: 0,
            len,
        };
        m.normalize();
        m
    }

    pub(crate) fn from_slice(s: &[u32]) -> MutableBigInt {
        MutableBigInt::from_vec(s.to_vec())
    }

    pub(crate) fn from_big(b: &BigInt) -> MutableBigInt {
        MutableBigInt::from_slice(&b.mag)
    }

    #[inline]
    pub(crate) fn window(&self) -> &[u32] {
        &self.value[self.offset..self.offset + self.len]
    }

    pub(crate) fn to_vec(&self) -> Vec<u32> {
        self.window().to_vec()
    }

    pub(crate) fn to_big_int(&self, sign: Sign) -> BigInt {
        if self.is_zero() {
            return Zero::zero();
        }
        BigInt::from_magnitude(sign, self.to_vec())
    }

    fn set_vec(&mut self, v: Vec<u32>) {
        self.len = v.len();
        self.value = v;
        self.offset = 0;
        self.normalize();
    }

    pub(crate) fn reset(&mut self) {
        self.offset = 0;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_one(&self) -> bool {
        self.len == 1 && self.value[self.offset] == 1
    }

    #[inline]
    pub(crate) fn is_even(&self) -> bool {
        self.len == 0 || self.value[self.offset + self.len - 1] & 1 == 0
    }

    #[inline]
    pub(crate) fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Least significant word of the window (zero when empty).
    fn low_word(&self) -> u32 {
        if self.len == 0 {
            0
        } else {
            self.value[self.offset + self.len - 1]
        }
    }

    pub(crate) fn normalize(&mut self) {
        if self.len == 0 {
            self.offset = 0;
            return;
        }
        let mut index = self.offset;
        if self.value[index] != 0 {
            return;
        }
        let bound = self.offset + self.len;
        while index < bound && self.value[index] == 0 {
            index += 1;
        }
        let zeros = index - self.offset;
        self.len -= zeros;
        self.offset = if self.len == 0 { 0 } else { self.offset + zeros };
    }

    pub(crate) fn bit_length(&self) -> u64 {
        if self.len == 0 {
            0
        } else {
            32 * self.len as u64 - u64::from(self.value[self.offset].leading_zeros())
        }
    }

    /// Index of the lowest set bit, or `None` when zero.
    pub(crate) fn lowest_set_bit(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let mut j = self.len - 1;
        while j > 0 && self.value[self.offset + j] == 0 {
            j -= 1;
        }
        let b = self.value[self.offset + j];
        if b == 0 {
            return None;
        }
        Some(((self.len - 1 - j) << 5) + b.trailing_zeros() as usize)
    }

    pub(crate) fn compare(&self, b: &MutableBigInt) -> Ordering {
        cmp_mag(self.window(), b.window())
    }

    /// Compares `self` against `b * 2^(32*words)`, ignoring any low words of
    /// `self` below the shift (sufficient for the quotient estimation that
    /// uses it).
    fn compare_shifted(&self, b: &MutableBigInt, words: usize) -> Ordering {
        let alen = self.len as i64 - words as i64;
        match alen.cmp(&(b.len as i64)) {
            Equal => {}
            other => return other,
        }
        let alen = alen as usize;
        self.value[self.offset..self.offset + alen].cmp(b.window())
    }

    // --- in-place arithmetic ---

    pub(crate) fn add(&mut self, b: &MutableBigInt) {
        if b.is_zero() {
            return;
        }
        if self.is_zero() {
            self.set_vec(b.to_vec());
            return;
        }
        let sum = add_mag(self.window(), b.window());
        self.set_vec(sum);
    }

    /// `self -= b`; requires `self >= b`.
    pub(crate) fn sub_smaller(&mut self, b: &MutableBigInt) {
        if b.is_zero() {
            return;
        }
        let diff = sub_mag(self.window(), b.window());
        self.set_vec(diff);
    }

    /// `self = |self - b|`, returning the sign of `self - b`.
    pub(crate) fn subtract_abs(&mut self, b: &MutableBigInt) -> i32 {
        match self.compare(b) {
            Equal => {
                self.reset();
                0
            }
            Greater => {
                let diff = sub_mag(self.window(), b.window());
                self.set_vec(diff);
                1
            }
            Less => {
                let diff = sub_mag(b.window(), self.window());
                self.set_vec(diff);
                -1
            }
        }
    }

    pub(crate) fn multiply(&self, b: &MutableBigInt) -> MutableBigInt {
        if self.is_zero() || b.is_zero() {
            return MutableBigInt::new();
        }
        MutableBigInt::from_vec(multiplication::multiply_to_len(self.window(), b.window()))
    }

    /// `out = self * w`.
    pub(crate) fn mul_word(&self, w: u32) -> MutableBigInt {
        if w == 0 || self.is_zero() {
            return MutableBigInt::new();
        }
        let src = self.window();
        let mut v = vec![0u32; self.len + 1];
        let k = u64::from(w);
        let mut carry = 0u64;
        for i in (0..self.len).rev() {
            let product = u64::from(src[i]) * k + carry;
            v[i + 1] = product as u32;
            carry = product >> 32;
        }
        v[0] = carry as u32;
        MutableBigInt::from_vec(v)
    }

    /// Shifts the window left by `n` bits, growing as needed.
    pub(crate) fn left_shift(&mut self, n: usize) {
        if self.len == 0 || n == 0 {
            return;
        }
        let n_words = n >> 5;
        let n_bits = (n & 31) as u32;
        let window = self.window();
        let mut new: Vec<u32>;
        if n_bits == 0 {
            new = window.to_vec();
        } else {
            let n_bits2 = 32 - n_bits;
            let hi = window[0] >> n_bits2;
            new = Vec::with_capacity(window.len() + n_words + 1);
            if hi != 0 {
                new.push(hi);
            }
            for j in 0..window.len() - 1 {
                new.push((window[j] << n_bits) | (window[j + 1] >> n_bits2));
            }
            new.push(window[window.len() - 1] << n_bits);
        }
        new.resize(new.len() + n_words, 0);
        self.set_vec(new);
    }

    /// Shifts the window right by `n` bits; shifts of the full length or
    /// more leave zero.
    pub(crate) fn right_shift(&mut self, n: usize) {
        if self.len == 0 || n == 0 {
            return;
        }
        if n as u64 >= self.bit_length() {
            self.reset();
            return;
        }
        let n_words = n >> 5;
        let n_bits = (n & 31) as u32;
        self.len -= n_words;
        if n_bits == 0 {
            return;
        }
        let bits_in_high = bit_len(self.value[self.offset]);
        if n_bits >= bits_in_high {
            self.primitive_left_shift(32 - n_bits);
            self.len -= 1;
        } else {
            self.primitive_right_shift(n_bits);
        }
    }

    /// Left shift within the window by `0 < n < 32` bits, discarding
    /// overflow out of the top word.
    fn primitive_left_shift(&mut self, n: u32) {
        let n2 = 32 - n;
        let (start, end) = (self.offset, self.offset + self.len - 1);
        let mut c = self.value[start];
        for i in start..end {
            let b = c;
            c = self.value[i + 1];
            self.value[i] = (b << n) | (c >> n2);
        }
        self.value[end] <<= n;
    }

    /// Right shift within the window by `0 < n < 32` bits.
    fn primitive_right_shift(&mut self, n: u32) {
        let n2 = 32 - n;
        let (start, end) = (self.offset, self.offset + self.len - 1);
        let mut c = self.value[end];
        let mut i = end;
        while i > start {
            let b = c;
            c = self.value[i - 1];
            self.value[i] = (c << n2) | (b >> n);
            i -= 1;
        }
        self.value[start] >>= n;
    }

    /// Discards all but the low `n` words.
    fn keep_lower(&mut self, n: usize) {
        if self.len > n {
            self.offset += self.len - n;
            self.len = n;
        }
        self.normalize();
    }

    /// A value of `n` words of all ones (`2^(32n) - 1`).
    fn ones(n: usize) -> MutableBigInt {
        MutableBigInt {
            value: vec![u32::MAX; n],
            offset: 0,
            len: n,
        }
    }

    /// Block `index` (0 = least significant) of the window split into
    /// `num_blocks` blocks of `block_len` words.
    fn get_block(&self, index: usize, num_blocks: usize, block_len: usize) -> MutableBigInt {
        let block_start = index * block_len;
        if block_start >= self.len {
            return MutableBigInt::new();
        }
        let block_end = if index == num_blocks - 1 {
            self.len
        } else {
            (index + 1) * block_len
        };
        if block_end > self.len {
            return MutableBigInt::new();
        }
        let lo = self.offset + self.len - block_end;
        let hi = self.offset + self.len - block_start;
        MutableBigInt::from_slice(&self.value[lo..hi])
    }

    /// `self += b * 2^(32*n)`.
    pub(crate) fn add_shifted(&mut self, b: &MutableBigInt, n: usize) {
        if b.is_zero() {
            return;
        }
        let mut shifted = b.to_vec();
        shifted.resize(shifted.len() + n, 0);
        let sum = add_mag(self.window(), &shifted);
        self.set_vec(sum);
    }

    /// `self += ` the low `n` words of `b`.
    fn add_lower(&mut self, b: &MutableBigInt, n: usize) {
        if b.len <= n {
            self.add(b);
        } else {
            let w = b.window();
            let lower = MutableBigInt::from_slice(&w[b.len - n..]);
            self.add(&lower);
        }
    }

    // --- division ---

    /// Quotient and remainder, dispatching on operand size.
    pub(crate) fn div_rem(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        if b.len < BURNIKEL_ZIEGLER_THRESHOLD
            || self.len.saturating_sub(b.len) < BURNIKEL_ZIEGLER_OFFSET
        {
            self.divide_knuth(b)
        } else {
            self.divide_burnikel_ziegler(b)
        }
    }

    pub(crate) fn divide_knuth(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        assert!(!b.is_zero(), "division by zero");
        if self.is_zero() {
            return (MutableBigInt::new(), MutableBigInt::new());
        }
        match self.compare(b) {
            Less => return (MutableBigInt::new(), self.clone()),
            Equal => return (MutableBigInt::from_word(1), MutableBigInt::new()),
            Greater => {}
        }
        if b.len == 1 {
            let (q, r) = self.divide_one_word(b.low_word());
            return (q, MutableBigInt::from_word(r));
        }

        // Cancel common powers of two if it saves a substantial fraction of
        // the work.
        if self.len >= KNUTH_POW2_THRESH_LEN {
            let tz = self
                .lowest_set_bit()
                .unwrap()
                .min(b.lowest_set_bit().unwrap());
            if tz >= KNUTH_POW2_THRESH_ZEROS * 32 {
                let mut a2 = self.clone();
                let mut b2 = b.clone();
                a2.right_shift(tz);
                b2.right_shift(tz);
                let (q, mut r) = a2.divide_knuth(&b2);
                r.left_shift(tz);
                return (q, r);
            }
        }
        self.divide_magnitude(b)
    }

    /// Knuth Algorithm D: normalize, estimate each quotient digit from the
    /// top dividend words, multiply-subtract, and correct the rare
    /// overestimate by adding the divisor back.
    fn divide_magnitude(&self, div: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        debug_assert!(div.len >= 2);
        let dlen = div.len;
        let shift = div.value[div.offset].leading_zeros();

        // Shifted divisor.
        let dw = div.window();
        let mut d = vec![0u32; dlen];
        if shift == 0 {
            d.copy_from_slice(dw);
        } else {
            for i in 0..dlen {
                let lo = if i + 1 < dlen {
                    dw[i + 1] >> (32 - shift)
                } else {
                    0
                };
                d[i] = (dw[i] << shift) | lo;
            }
        }

        // Shifted dividend with one extra leading word.
        let ulen = self.len + 1;
        let sw = self.window();
        let mut u = vec![0u32; ulen];
        if shift == 0 {
            u[1..].copy_from_slice(sw);
        } else {
            u[0] = sw[0] >> (32 - shift);
            for i in 0..self.len {
                let lo = if i + 1 < self.len {
                    sw[i + 1] >> (32 - shift)
                } else {
                    0
                };
                u[i + 1] = (sw[i] << shift) | lo;
            }
        }

        let n = dlen;
        let qlen = ulen - n;
        let mut q = vec![0u32; qlen];
        let dh = u64::from(d[0]);
        let dl = u64::from(d[1]);

        for j in 0..qlen {
            let u0 = u64::from(u[j]);
            let u1 = u64::from(u[j + 1]);
            let u2 = u64::from(u[j + 2]);
            let dividend2 = (u0 << 32) | u1;

            let (mut qhat, mut rhat) = if u0 >= dh {
                (0xFFFF_FFFFu64, dividend2.wrapping_sub(0xFFFF_FFFF * dh))
            } else {
                (dividend2 / dh, dividend2 % dh)
            };
            while rhat <= 0xFFFF_FFFF && qhat * dl > (rhat << 32 | u2) {
                qhat -= 1;
                rhat += dh;
            }

            if qhat != 0 {
                // Multiply and subtract.
                let mut borrow = 0u64;
                for i in (0..n).rev() {
                    let p = qhat * u64::from(d[i]) + borrow;
                    let sub = u64::from(u[j + 1 + i]).wrapping_sub(p & 0xFFFF_FFFF);
                    u[j + 1 + i] = sub as u32;
                    borrow = (p >> 32) + ((sub >> 32) & 1);
                }
                let top = u64::from(u[j]).wrapping_sub(borrow);
                u[j] = top as u32;

                // Add back if the estimate was one too large.
                if top >> 32 != 0 {
                    qhat -= 1;
                    let mut carry = 0u64;
                    for i in (0..n).rev() {
                        let sum = u64::from(u[j + 1 + i]) + u64::from(d[i]) + carry;
                        u[j + 1 + i] = sum as u32;
                        carry = sum >> 32;
                    }
                    u[j] = u[j].wrapping_add(carry as u32);
                }
            }
            q[j] = qhat as u32;
        }

        let mut rem = MutableBigInt::from_slice(&u[qlen..]);
        rem.right_shift(shift as usize);
        (MutableBigInt::from_vec(q), rem)
    }

    /// Divides by a single word, returning the quotient and word remainder.
    pub(crate) fn divide_one_word(&self, divisor: u32) -> (MutableBigInt, u32) {
        debug_assert!(divisor != 0);
        let d = u64::from(divisor);
        let src = self.window();
        let mut q = vec![0u32; self.len];
        let mut rem = 0u64;
        for i in 0..self.len {
            let cur = (rem << 32) | u64::from(src[i]);
            q[i] = (cur / d) as u32;
            rem = cur % d;
        }
        (MutableBigInt::from_vec(q), rem as u32)
    }

    /// Divides by a double word (used for radix chunking during string
    /// conversion), returning the quotient and remainder.
    pub(crate) fn divide_u64(&self, divisor: u64) -> (MutableBigInt, u64) {
        debug_assert!(divisor != 0);
        if divisor <= u64::from(u32::MAX) {
            let (q, r) = self.divide_one_word(divisor as u32);
            return (q, u64::from(r));
        }
        let d = u128::from(divisor);
        let src = self.window();
        let mut q = vec![0u32; self.len];
        let mut rem = 0u128;
        for i in 0..self.len {
            let cur = (rem << 32) | u128::from(src[i]);
            q[i] = (cur / d) as u32;
            rem = cur % d;
        }
        (MutableBigInt::from_vec(q), rem as u64)
    }

    // --- Burnikel-Ziegler division ---

    /// Burnikel-Ziegler divide-and-conquer division: pad the divisor to a
    /// whole number of blocks, split the dividend into blocks, and do
    /// schoolbook division on blocks with `divide_2n1n` as the digit step.
    fn divide_burnikel_ziegler(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let r = self.len;
        let s = b.len;
        if r < s {
            return (MutableBigInt::new(), self.clone());
        }

        // m = min{2^k | 2^k * threshold > s}
        let m = 1usize << (32 - ((s / BURNIKEL_ZIEGLER_THRESHOLD) as u32).leading_zeros());
        let j = (s + m - 1) / m;
        let n = j * m;
        let n32 = 32 * n as u64;
        let sigma = n32.saturating_sub(b.bit_length()) as usize;

        let mut b_shifted = b.clone();
        b_shifted.left_shift(sigma);
        let mut a_shifted = self.clone();
        a_shifted.left_shift(sigma);

        // Number of blocks needed for the dividend plus one extra bit.
        let mut t = ((a_shifted.bit_length() + n32) / n32) as usize;
        if t < 2 {
            t = 2;
        }

        let a1 = a_shifted.get_block(t - 1, t, n);
        let mut z = a_shifted.get_block(t - 2, t, n);
        z.add_shifted(&a1, n);

        let mut quotient = MutableBigInt::new();
        for i in (1..=t - 2).rev() {
            let (qi, ri) = z.divide_2n1n(&b_shifted);
            z = a_shifted.get_block(i - 1, t, n);
            z.add_shifted(&ri, n);
            quotient.add_shifted(&qi, i * n);
        }
        let (q_last, mut r_last) = z.divide_2n1n(&b_shifted);
        quotient.add(&q_last);
        r_last.right_shift(sigma);
        (quotient, r_last)
    }

    /// Divides a (up to) 2n-word dividend by an n-word divisor, n even.
    fn divide_2n1n(self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let n = b.len;
        if n % 2 != 0 || n < BURNIKEL_ZIEGLER_THRESHOLD {
            return self.divide_knuth(b);
        }

        // View the dividend as [a1, a2, a3, a4] of n/2 words each.
        let mut a_upper = self.clone();
        a_upper.right_shift(32 * (n / 2));
        let mut a_lower = self;
        a_lower.keep_lower(n / 2);

        let (q1, r1) = a_upper.divide_3n2n(b);
        a_lower.add_shifted(&r1, n / 2);
        let (mut q, r2) = a_lower.divide_3n2n(b);
        q.add_shifted(&q1, n / 2);
        (q, r2)
    }

    /// Divides a (up to) 3n-word dividend by a 2n-word divisor, where
    /// `n = b.len / 2`.
    fn divide_3n2n(self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let n = b.len / 2;

        // a12 = the high two blocks; b = [b1, b2].
        let mut a12 = self.clone();
        a12.right_shift(32 * n);
        let mut b1 = b.clone();
        b1.right_shift(32 * n);
        let mut b2 = b.clone();
        b2.keep_lower(n);

        let (mut q, mut r, d);
        if self.compare_shifted(b, n) == Less {
            // q = a12 / b1, r = a12 % b1, d = q * b2
            let (qq, rr) = a12.divide_2n1n(&b1);
            d = qq.multiply(&b2);
            q = qq;
            r = rr;
        } else {
            // q = 2^(32n) - 1, r = a12 - b1*2^(32n) + b1, d = (b2 << 32n) - b2
            q = MutableBigInt::ones(n);
            a12.add(&b1);
            let mut b1s = b1;
            b1s.left_shift(32 * n);
            a12.sub_smaller(&b1s);
            r = a12;
            let mut ds = b2.clone();
            ds.left_shift(32 * n);
            ds.sub_smaller(&b2);
            d = ds;
        }

        // r = r*2^(32n) + a3 - d; delay the subtraction so r stays
        // non-negative through the correction loop.
        r.left_shift(32 * n);
        r.add_lower(&self, n);
        let one = MutableBigInt::from_word(1);
        while r.compare(&d) == Less {
            r.add(b);
            q.sub_smaller(&one);
        }
        r.sub_smaller(&d);
        (q, r)
    }

    // --- gcd ---

    /// Hybrid gcd: Euclidean steps while the operands differ in length,
    /// binary gcd once they are within a word of each other.
    pub(crate) fn hybrid_gcd(self, other: MutableBigInt) -> MutableBigInt {
        let mut a = self;
        let mut b = other;
        loop {
            if b.is_zero() {
                return a;
            }
            if (a.len as i64 - b.len as i64).abs() < 2 {
                return binary_gcd(a, b);
            }
            let (_, r) = a.div_rem(&b);
            a = b;
            b = r;
        }
    }

    // --- modular inverse ---

    /// `self^-1 mod p`, for any positive modulus; `None` when not coprime.
    pub(crate) fn mutable_mod_inverse(&self, p: &MutableBigInt) -> Option<MutableBigInt> {
        if p.is_odd() {
            return self.mod_inverse_odd(p);
        }
        // Base and modulus both even: no inverse exists.
        if self.is_even() {
            return None;
        }
        let powers_of_2 = p.lowest_set_bit().unwrap();
        let mut odd_mod = p.clone();
        odd_mod.right_shift(powers_of_2);
        if odd_mod.is_one() {
            return self.mod_inverse_mp2(powers_of_2);
        }

        // Combine the inverses mod the odd part and mod 2^k by CRT.
        let odd_part = self.mod_inverse_odd(&odd_mod)?;
        let even_part = self.mod_inverse_mp2(powers_of_2)?;
        let y1 = mod_inverse_bp2(&odd_mod, powers_of_2);
        let y2 = odd_mod.mod_inverse_mp2(powers_of_2)?;

        let mut odd_part = odd_part;
        odd_part.left_shift(powers_of_2);
        let mut result = odd_part.multiply(&y1);
        let temp1 = even_part.multiply(&odd_mod);
        let temp2 = temp1.multiply(&y2);
        result.add(&temp2);
        let (_, r) = result.div_rem(p);
        Some(r)
    }

    /// Schroeppel's almost-inverse algorithm for an odd modulus, with a
    /// final fixup pass dividing out the accumulated power of two.
    fn mod_inverse_odd(&self, mod_: &MutableBigInt) -> Option<MutableBigInt> {
        debug_assert!(mod_.is_odd());
        if self.is_zero() {
            return None;
        }
        let p = mod_.clone();
        let mut f = self.clone();
        let mut g = p.clone();
        let mut c = SignedMutableBigInt::one();
        let mut d = SignedMutableBigInt::zero();

        let mut k = 0usize;
        if f.is_even() {
            let trailing = f.lowest_set_bit().unwrap();
            f.right_shift(trailing);
            d.mag.left_shift(trailing);
            k = trailing;
        }

        // The almost inverse algorithm.
        while !f.is_one() {
            if f.is_zero() {
                return None;
            }
            if f.compare(&g) == Less {
                core::mem::swap(&mut f, &mut g);
                core::mem::swap(&mut c, &mut d);
            }
            if (f.low_word() ^ g.low_word()) & 3 == 0 {
                f.sub_smaller(&g);
                c.signed_subtract(&d);
            } else {
                f.add(&g);
                c.signed_add(&d);
            }
            // f == g leaves f zero here; the loop head reports no inverse.
            let trailing = match f.lowest_set_bit() {
                Some(t) => t,
                None => continue,
            };
            f.right_shift(trailing);
            d.mag.left_shift(trailing);
            k += trailing;
        }

        if c.mag.compare(&p) != Less {
            let (_, r) = c.mag.div_rem(&p);
            c.mag = r;
        }
        if c.sign < 0 {
            c.sign = c.mag.subtract_abs(&p);
            // |c| < p, so c is now p - |c| and positive.
        }
        Some(fixup(c.mag, p, k))
    }

    /// `self^-1 mod 2^k`.
    fn mod_inverse_mp2(&self, k: usize) -> Option<MutableBigInt> {
        if self.is_even() {
            return None;
        }
        if k > 64 {
            return self.euclid_mod_inverse(k);
        }
        let t = inverse_mod32(self.low_word());
        if k < 33 {
            let t = if k == 32 { t } else { t & ((1 << k) - 1) };
            return Some(MutableBigInt::from_word(t));
        }
        let mut p_long = u64::from(self.low_word());
        if self.len > 1 {
            p_long |= u64::from(self.value[self.offset + self.len - 2]) << 32;
        }
        let mut t_long = u64::from(t);
        t_long = t_long.wrapping_mul(2u64.wrapping_sub(p_long.wrapping_mul(t_long)));
        if k != 64 {
            t_long &= (1 << k) - 1;
        }
        Some(MutableBigInt::from_u64(t_long))
    }

    /// Extended-Euclid fallback for `self^-1 mod 2^k` with large `k`.
    fn euclid_mod_inverse(&self, k: usize) -> Option<MutableBigInt> {
        let modulus: BigInt = BigInt::one().shift_left_unsigned(k as u64);
        let value = self.to_big_int(Plus);
        let (g, x, _) = extended_gcd(&value, &modulus);
        if !g.is_one() {
            return None;
        }
        let x = x.mod_floor(&modulus);
        Some(MutableBigInt::from_big(&x))
    }
}

/// `(2^k)^-1 mod p` for odd `p`: a fixup pass over the constant one.
fn mod_inverse_bp2(p: &MutableBigInt, k: usize) -> MutableBigInt {
    fixup(MutableBigInt::from_word(1), p.clone(), k)
}

/// The almost-inverse fixup: divides `c` by `2^k` modulo the odd `p` by
/// repeatedly cancelling the low word (or low bits) against a multiple of
/// `p`.
fn fixup(mut c: MutableBigInt, mut p: MutableBigInt, k: usize) -> MutableBigInt {
    let r = inverse_mod32(p.low_word()).wrapping_neg();
    for _ in 0..(k >> 5) {
        // V = R * c (mod 2^32)
        let v = r.wrapping_mul(c.low_word());
        // c += v * p, making the low word zero, then drop it.
        let t = p.mul_word(v);
        c.add(&t);
        debug_assert_eq!(c.low_word(), 0);
        if c.len > 0 {
            c.len -= 1;
            c.normalize();
        }
    }
    let num_bits = k & 0x1f;
    if num_bits != 0 {
        let mut v = r.wrapping_mul(c.low_word());
        v &= (1u32 << num_bits) - 1;
        let t = p.mul_word(v);
        c.add(&t);
        c.right_shift(num_bits);
    }
    while c.compare(&p) != Less {
        c.sub_smaller(&p);
    }
    c
}

/// Multiplicative inverse of an odd double word mod 2^64.
pub(crate) fn inverse_mod64(val: u64) -> u64 {
    debug_assert!(val & 1 == 1);
    let mut t = val;
    t = t.wrapping_mul(2u64.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u64.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u64.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u64.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u64.wrapping_sub(val.wrapping_mul(t)));
    debug_assert_eq!(t.wrapping_mul(val), 1);
    t
}

/// Multiplicative inverse of an odd word mod 2^32, by Newton's iteration.
pub(crate) fn inverse_mod32(val: u32) -> u32 {
    debug_assert!(val & 1 == 1);
    let mut t = val;
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t
}

/// Binary (Stein) gcd of two nonzero values.
fn binary_gcd(mut u: MutableBigInt, mut v: MutableBigInt) -> MutableBigInt {
    let s1 = u.lowest_set_bit().expect("nonzero");
    let s2 = v.lowest_set_bit().expect("nonzero");
    let k = s1.min(s2);
    if k != 0 {
        u.right_shift(k);
        v.right_shift(k);
    }
    u.right_shift(u.lowest_set_bit().expect("nonzero"));
    loop {
        match v.lowest_set_bit() {
            Some(lb) => v.right_shift(lb),
            None => break,
        }
        // Both odd here; fall back to word gcd as soon as possible.
        if u.len < 2 && v.len < 2 {
            let x = word_gcd(u.low_word(), v.low_word());
            let mut r = MutableBigInt::from_word(x);
            if k > 0 {
                r.left_shift(k);
            }
            return r;
        }
        if u.compare(&v) == Greater {
            core::mem::swap(&mut u, &mut v);
        }
        // v - u is even, keeping the loop making progress.
        v.sub_smaller(&u);
    }
    if k > 0 {
        u.left_shift(k);
    }
    u
}

fn word_gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A mutable value with an explicit sign, used only by the almost-inverse
/// bookkeeping where intermediate coefficients go negative.
struct SignedMutableBigInt {
    mag: MutableBigInt,
    sign: i32,
}

impl SignedMutableBigInt {
    fn zero() -> SignedMutableBigInt {
        SignedMutableBigInt {
            mag: MutableBigInt::new(),
            sign: 1,
        }
    }

    fn one() -> SignedMutableBigInt {
        SignedMutableBigInt {
            mag: MutableBigInt::from_word(1),
            sign: 1,
        }
    }

    fn signed_add(&mut self, addend: &SignedMutableBigInt) {
        if self.sign == addend.sign {
            self.mag.add(&addend.mag);
        } else {
            self.sign *= self.mag.subtract_abs(&addend.mag);
        }
    }

    fn signed_subtract(&mut self, addend: &SignedMutableBigInt) {
        if self.sign == addend.sign {
            self.sign *= self.mag.subtract_abs(&addend.mag);
        } else {
            self.mag.add(&addend.mag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Signed;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::str::FromStr;

    use crate::bigrand::RandBigInt;

    fn big(s: &str) -> BigInt {
        BigInt::from_str(s).unwrap()
    }

    #[test]
    fn test_divide_one_word() {
        let a = MutableBigInt::from_big(&big("123456789012345678901234567893"));
        let (q, r) = a.divide_one_word(7);
        assert_eq!(
            q.to_big_int(Plus),
            big("17636684144620811271604938270")
        );
        assert_eq!(r, 3);

        let b = MutableBigInt::from_big(&big("123456789012345678901234567890"));
        let (q, r) = b.divide_one_word(7);
        assert_eq!(
            q.to_big_int(Plus),
            big("17636684144620811271604938270")
        );
        assert_eq!(r, 0);
    }

    #[test]
    fn test_divide_u64() {
        let a = MutableBigInt::from_big(&big("340282366920938463463374607431768211455"));
        let d = 1_000_000_000_000_000_000u64;
        let (q, r) = a.divide_u64(d);
        let back = q.to_big_int(Plus) * BigInt::from(d) + BigInt::from(r);
        assert_eq!(back, big("340282366920938463463374607431768211455"));
        assert!(r < d);
    }

    #[test]
    fn test_knuth_division_randomized() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..60 {
            let a = rng.gen_bigint(800).abs();
            let b = rng.gen_bigint(300).abs();
            if b.is_zero() {
                continue;
            }
            let (q, r) = MutableBigInt::from_big(&a).divide_knuth(&MutableBigInt::from_big(&b));
            let q = q.to_big_int(Plus);
            let r = r.to_big_int(Plus);
            assert_eq!(&b * &q + &r, a);
            assert!(r < b);
        }
    }

    #[test]
    fn test_knuth_add_back_case() {
        // Dividend crafted so the first quotient estimate is one too large.
        let a = BigInt::from_slice(Plus, &[0x8000_0000, 0, 0, 1]);
        let b = BigInt::from_slice(Plus, &[0x8000_0000, 0, 1]);
        let (q, r) = a.div_rem(&b);
        assert_eq!(&b * &q + &r, a);
    }

    #[test]
    fn test_burnikel_ziegler_matches_knuth() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..3 {
            // 150-word divisor, 300-word dividend: BZ range.
            let a = rng.gen_bigint(9600).abs();
            let b = rng.gen_bigint(4800).abs();
            if b.is_zero() {
                continue;
            }
            let am = MutableBigInt::from_big(&a);
            let bm = MutableBigInt::from_big(&b);
            let (qk, rk) = am.divide_knuth(&bm);
            let (qb, rb) = am.divide_burnikel_ziegler(&bm);
            assert_eq!(qk.compare(&qb), Equal);
            assert_eq!(rk.compare(&rb), Equal);
        }
    }

    #[test]
    fn test_shifts() {
        let mut a = MutableBigInt::from_big(&big("123456789012345678901234567890"));
        a.left_shift(67);
        a.right_shift(67);
        assert_eq!(a.to_big_int(Plus), big("123456789012345678901234567890"));
        a.right_shift(1000);
        assert!(a.is_zero());
    }

    #[test]
    fn test_mod_inverse_odd_modulus() {
        let a = MutableBigInt::from_big(&big("17"));
        let m = MutableBigInt::from_big(&big("3233"));
        let inv = a.mutable_mod_inverse(&m).unwrap().to_big_int(Plus);
        assert_eq!((inv * big("17")) % big("3233"), big("1"));
    }

    #[test]
    fn test_mod_inverse_even_modulus() {
        let a = MutableBigInt::from_big(&big("7"));
        let m = MutableBigInt::from_big(&big("1024"));
        let inv = a.mutable_mod_inverse(&m).unwrap().to_big_int(Plus);
        assert_eq!((inv * big("7")) % big("1024"), big("1"));

        let a = MutableBigInt::from_big(&big("35"));
        let m = MutableBigInt::from_big(&big("24")); // 8 * 3
        let inv = a.mutable_mod_inverse(&m).unwrap().to_big_int(Plus);
        assert_eq!((inv * big("35")) % big("24"), big("1"));
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        let a = MutableBigInt::from_big(&big("6"));
        let m = MutableBigInt::from_big(&big("9"));
        assert!(a.mutable_mod_inverse(&m).is_none());
        let a = MutableBigInt::from_big(&big("4"));
        let m = MutableBigInt::from_big(&big("8"));
        assert!(a.mutable_mod_inverse(&m).is_none());
    }

    #[test]
    fn test_mod_inverse_randomized() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..25 {
            let m = rng.gen_bigint(256).abs() + BigInt::from(3);
            let a = rng.gen_bigint(200).abs() + BigInt::from(2);
            let g = a.gcd(&m);
            let am = MutableBigInt::from_big(&a);
            let mm = MutableBigInt::from_big(&m);
            match am.mutable_mod_inverse(&mm) {
                Some(inv) => {
                    assert!(g.is_one());
                    let inv = inv.to_big_int(Plus);
                    assert_eq!((inv * &a) % &m, BigInt::one());
                }
                None => assert!(!g.is_one()),
            }
        }
    }

    #[test]
    fn test_inverse_mod32() {
        for &v in &[1u32, 3, 5, 0xFFFF_FFFF, 0x1234_5677] {
            assert_eq!(v.wrapping_mul(inverse_mod32(v)), 1);
        }
    }

    #[test]
    fn test_binary_gcd_agrees() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for _ in 0..40 {
            let a = rng.gen_bigint(192).abs();
            let b = rng.gen_bigint(190).abs();
            if a.is_zero() || b.is_zero() {
                continue;
            }
            let g = binary_gcd(MutableBigInt::from_big(&a), MutableBigInt::from_big(&b))
                .to_big_int(Plus);
            let mut x = a.clone();
            let mut y = b.clone();
            while !y.is_zero() {
                let r = &x % &y;
                x = y;
                y = r;
            }
            assert_eq!(g, x);
        }
    }
}
