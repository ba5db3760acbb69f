//! Modular arithmetic: Euclidean remainder, modular exponentiation and
//! modular inverse.
//!
//! Exponentiation with an odd modulus runs in Montgomery form with a
//! sliding window sized from the exponent; an even modulus is split into
//! its odd part and power-of-two part, the two partial results recombined
//! by the Chinese Remainder Theorem.

use core::cmp::Ordering::Less;

use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::bigint::multiplication::{add_one, mul_add, multiply_to_len, square};
use crate::bigint::Sign::Plus;
use crate::bigint::BigInt;
use crate::mutable::{self, MutableBigInt};

/// Exponent bit lengths at which the sliding window widens by one bit.
const EXP_MOD_THRESH_TABLE: [u64; 7] = [7, 25, 81, 241, 673, 1793, u64::MAX];

impl BigInt {
    /// The Euclidean remainder of `self` modulo `m`, always in `[0, m)`.
    ///
    /// # Panics
    ///
    /// Panics if `m` is zero or negative.
    pub fn modulus(&self, m: &BigInt) -> BigInt {
        assert!(m.is_positive(), "modulus not positive");
        self.mod_floor(m)
    }

    /// `self^exponent mod modulus`.
    ///
    /// A negative exponent is resolved through the modular inverse of the
    /// base.
    ///
    /// # Panics
    ///
    /// Panics if the modulus is not positive, or if the exponent is
    /// negative and the base is not invertible modulo `modulus`.
    pub fn modpow(&self, exponent: &BigInt, modulus: &BigInt) -> BigInt {
        assert!(modulus.is_positive(), "modulus not positive");

        if exponent.is_zero() || self.is_one() {
            return if modulus.is_one() {
                BigInt::zero()
            } else {
                BigInt::one()
            };
        }
        if self.is_zero() && !exponent.is_negative() {
            return BigInt::zero();
        }
        if *self == -BigInt::one() && exponent.is_even() {
            return if modulus.is_one() {
                BigInt::zero()
            } else {
                BigInt::one()
            };
        }

        let invert_result = exponent.is_negative();
        let exp = exponent.abs();
        let base = if self.is_negative() || self.cmp_magnitude(modulus) != Less {
            self.mod_floor(modulus)
        } else {
            self.clone()
        };

        let result = if modulus.is_odd() {
            odd_mod_pow(&base, &exp, modulus)
        } else {
            // Split m = m1 * 2^p with m1 odd; solve each part and
            // recombine with CRT.
            let p = modulus.trailing_zeros().expect("positive modulus");
            let m1 = modulus.shift_right_exact(p);
            let m2 = BigInt::one().shift_left_unsigned(p);

            let base2 = if self.is_negative() || self.cmp_magnitude(&m2) != Less {
                self.mod_floor(&m2)
            } else {
                self.clone()
            };
            let a1 = if m1.is_one() {
                BigInt::zero()
            } else {
                odd_mod_pow(&base, &exp, &m1)
            };
            let a2 = mod_pow2(&base2, &exp, p);
            let y1 = mod_inverse(&m2, &m1).expect("odd and even parts are coprime");
            let y2 = mod_inverse(&m1, &m2).expect("odd and even parts are coprime");

            (a1 * m2 * y1 + a2 * m1 * y2).mod_floor(modulus)
        };

        if invert_result {
            match mod_inverse(&result, modulus) {
                Some(inv) => inv,
                None => panic!("BigInt not invertible"),
            }
        } else {
            result
        }
    }
}

/// `a^-1 mod m` in `[0, m)`, or `None` when `gcd(a, m) != 1`.
///
/// # Panics
///
/// Panics if `m` is zero or negative.
pub(crate) fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    assert!(m.is_positive(), "modulus not positive");
    if m.is_one() {
        return Some(BigInt::zero());
    }
    let reduced = if a.is_negative() || a.cmp_magnitude(m) != Less {
        a.mod_floor(m)
    } else {
        a.clone()
    };
    if reduced.is_one() {
        return Some(BigInt::one());
    }
    let base = MutableBigInt::from_big(&reduced);
    let modulus = MutableBigInt::from_big(m);
    let inv = base.mutable_mod_inverse(&modulus)?;
    Some(inv.to_big_int(Plus))
}

/// Montgomery sliding-window exponentiation for an odd modulus.
/// Requires `0 <= base < z`, `y > 0`, `z` odd.
fn odd_mod_pow(base: &BigInt, y: &BigInt, z: &BigInt) -> BigInt {
    if y.is_one() {
        return base.clone();
    }
    if base.is_zero() {
        return BigInt::zero();
    }

    // Pad the modulus to an even word count so the low 64 bits are a
    // whole number of words.
    let mut mod_words = z.mag.clone();
    if mod_words.len() & 1 != 0 {
        mod_words.insert(0, 0);
    }
    let mod_len = mod_words.len();

    // Window size; 65537 gets the minimal table since its bits are sparse.
    let ebits = y.bits();
    let mut wbits = 0usize;
    if !(ebits == 17 && y.mag[0] == 65537) {
        while ebits > EXP_MOD_THRESH_TABLE[wbits] {
            wbits += 1;
        }
    }
    let tblmask = 1usize << wbits;

    // -1 / m mod 2^64, driving each reduction step.
    let n0 = u64::from(mod_words[mod_len - 1]) | (u64::from(mod_words[mod_len - 2]) << 32);
    let inv = mutable::inverse_mod64(n0).wrapping_neg() as u32;

    // table[i] holds base^(2i+1) in Montgomery form.
    let mont_base = base.shift_left_unsigned(32 * mod_len as u64);
    let (_, r) = mutable::divide_magnitudes(&mont_base.mag, &z.mag);
    let mut table: Vec<Vec<u32>> = Vec::with_capacity(tblmask);
    table.push(pad_left(&r, mod_len));
    let base_sq = montgomery_square(&table[0], &mod_words, mod_len, inv);
    for i in 1..tblmask {
        let next = montgomery_multiply(&base_sq, &table[i - 1], &mod_words, mod_len, inv);
        table.push(next);
    }

    // Scan the exponent from the top, gathering odd windows.
    let mut acc: Option<Vec<u32>> = None;
    let mut i = ebits as i64 - 1;
    while i >= 0 {
        if !y.test_bit(i as u64) {
            if let Some(a) = acc.take() {
                acc = Some(montgomery_square(&a, &mod_words, mod_len, inv));
            }
            i -= 1;
            continue;
        }
        // Largest window ending at bit i whose low bit is set.
        let mut j = (i - wbits as i64).max(0);
        while !y.test_bit(j as u64) {
            j += 1;
        }
        let mut w = 0usize;
        for k in (j..=i).rev() {
            w = (w << 1) | usize::from(y.test_bit(k as u64));
        }
        acc = Some(match acc.take() {
            None => table[w >> 1].clone(),
            Some(mut a) => {
                for _ in 0..(i - j + 1) {
                    a = montgomery_square(&a, &mod_words, mod_len, inv);
                }
                montgomery_multiply(&a, &table[w >> 1], &mod_words, mod_len, inv)
            }
        });
        i = j - 1;
    }

    // Leave Montgomery form: one extra reduction divides out 2^(32*modLen).
    let result = acc.expect("positive exponent");
    let mut wide = vec![0u32; 2 * mod_len];
    wide[mod_len..].copy_from_slice(&result);
    mont_reduce(&mut wide, &mod_words, mod_len, inv);
    wide.truncate(mod_len);
    BigInt::from_magnitude(Plus, wide)
}

fn pad_left(words: &[u32], len: usize) -> Vec<u32> {
    let mut out = vec![0u32; len];
    out[len - words.len()..].copy_from_slice(words);
    out
}

fn montgomery_multiply(a: &[u32], b: &[u32], modw: &[u32], mlen: usize, inv: u32) -> Vec<u32> {
    let mut product = multiply_to_len(&a[..mlen], &b[..mlen]);
    mont_reduce(&mut product, modw, mlen, inv);
    product.truncate(mlen);
    product
}

fn montgomery_square(a: &[u32], modw: &[u32], mlen: usize, inv: u32) -> Vec<u32> {
    montgomery_multiply(a, a, modw, mlen, inv)
}

/// Montgomery reduction of a `2*mlen`-word product in place: the result
/// `n * 2^(-32*mlen) mod m` lands in the top `mlen` words of `n`.
fn mont_reduce(n: &mut [u32], modw: &[u32], mlen: usize, inv: u32) {
    debug_assert_eq!(n.len(), 2 * mlen);
    let mut c: i32 = 0;
    for offset in 0..mlen {
        let n_end = n[n.len() - 1 - offset];
        let carry = mul_add(n, modw, offset, inv.wrapping_mul(n_end));
        c += add_one(n, offset, mlen, carry) as i32;
    }
    while c > 0 {
        c += sub_n(n, modw, mlen);
    }
    while cmp_to_len(n, modw, mlen) != Less {
        sub_n(n, modw, mlen);
    }
}

/// `a[..len] -= b[..len]`, returning `-1` on borrow out, else `0`.
fn sub_n(a: &mut [u32], b: &[u32], len: usize) -> i32 {
    let mut sum: i64 = 0;
    for i in (0..len).rev() {
        sum = i64::from(a[i]) - i64::from(b[i]) + (sum >> 32);
        a[i] = sum as u32;
    }
    (sum >> 32) as i32
}

fn cmp_to_len(a: &[u32], b: &[u32], len: usize) -> core::cmp::Ordering {
    a[..len].cmp(&b[..len])
}

/// The low `p` bits of a non-negative value.
fn mod2(x: &BigInt, p: u64) -> BigInt {
    if x.bits() <= p {
        return x.clone();
    }
    let num_words = ((p + 31) >> 5) as usize;
    let mut mag = x.mag[x.mag.len() - num_words..].to_vec();
    let top_bits = (p - 32 * (num_words as u64 - 1)) as u32;
    if top_bits < 32 {
        mag[0] &= (1u32 << top_bits) - 1;
    }
    BigInt::from_magnitude(Plus, mag)
}

/// `base^exponent mod 2^p` by square-and-multiply over the low bits.
/// Requires a non-negative base.
fn mod_pow2(base: &BigInt, exponent: &BigInt, p: u64) -> BigInt {
    let mut result = BigInt::one();
    let mut base_pow = mod2(base, p);
    let mut exp_offset = 0u64;
    let mut limit = exponent.bits();
    // An odd base has multiplicative order dividing 2^(p-2).
    if base.test_bit(0) {
        limit = limit.min(p.saturating_sub(1));
    }
    while exp_offset < limit {
        if exponent.test_bit(exp_offset) {
            result = mod2(&(&result * &base_pow), p);
        }
        exp_offset += 1;
        if exp_offset < limit {
            base_pow = mod2(&square(&base_pow), p);
        }
    }
    result
}
