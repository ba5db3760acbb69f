//! Probabilistic primality testing and prime generation.
//!
//! Candidates below 100 bits get Miller-Rabin alone with enough rounds to
//! push the error probability below the requested certainty; larger ones
//! combine fewer Miller-Rabin rounds with a Lucas strong-pseudoprime test,
//! since no composite is known to pass both.

use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng;

use crate::bigint::Sign::Plus;
use crate::bigint::BigInt;
use crate::bigrand::RandBigInt;
use crate::bit_sieve::BitSieve;

/// Bit length below which prime search works by incrementing candidates
/// instead of sieving a window.
pub(crate) const SMALL_PRIME_THRESHOLD: u64 = 95;

/// Certainty used by [`BigInt::next_probable_prime`] and random prime
/// generation: error probability at most 2^-100.
pub(crate) const DEFAULT_PRIME_CERTAINTY: u32 = 100;

/// 3 * 5 * 7 * 11 * ... * 41, for one-shot trial division by remainder.
const SMALL_PRIME_PRODUCT: u64 = 152_125_131_763_605;

impl BigInt {
    /// Whether this value is probably prime, with error probability at
    /// most `2^-certainty` when `true`. Zero certainty accepts anything;
    /// negative values and zero and one are never prime.
    pub fn is_probable_prime(&self, certainty: u32) -> bool {
        if certainty == 0 {
            return true;
        }
        let w = self.abs();
        if w == BigInt::from(2u32) {
            return true;
        }
        if !w.test_bit(0) || w.is_one() {
            return false;
        }
        prime_to_certainty(&w, certainty, &mut rand::rng())
    }

    /// A random probable prime of exactly `bit_length` bits, drawn from
    /// the supplied randomness source and tested to the default
    /// certainty.
    ///
    /// # Panics
    ///
    /// Panics if `bit_length` is below 2.
    pub fn probable_prime<R: Rng + ?Sized>(bit_length: u64, rng: &mut R) -> BigInt {
        assert!(bit_length >= 2, "bit_length < 2");
        if bit_length < SMALL_PRIME_THRESHOLD {
            small_prime(bit_length, DEFAULT_PRIME_CERTAINTY, rng)
        } else {
            large_prime(bit_length, DEFAULT_PRIME_CERTAINTY, rng)
        }
    }

    /// The first probable prime greater than `self`, tested to the default
    /// certainty. Never skips a prime.
    ///
    /// # Panics
    ///
    /// Panics if `self` is negative.
    pub fn next_probable_prime(&self) -> BigInt {
        assert!(!self.is_negative(), "start < 0: {}", self);
        if self.is_zero() || self.is_one() {
            return BigInt::from(2u32);
        }
        let two = BigInt::from(2u32);
        let mut result = self + BigInt::one();

        // Small candidates advance two at a time with a cheap remainder
        // pre-test.
        if result.bits() < SMALL_PRIME_THRESHOLD {
            if !result.test_bit(0) {
                result = result + BigInt::one();
            }
            loop {
                if result.bits() > 6 && !passes_small_prime_product(&result) {
                    result = result + &two;
                    continue;
                }
                if result.bits() < 4 {
                    return result;
                }
                if prime_to_certainty(&result, DEFAULT_PRIME_CERTAINTY, &mut rand::rng()) {
                    return result;
                }
                result = result + &two;
            }
        }

        // Start at the previous even number and sieve windows upward.
        if result.test_bit(0) {
            result = result - BigInt::one();
        }
        let search_len = prime_search_len(result.bits());
        loop {
            let sieve = BitSieve::new(&result, search_len);
            if let Some(candidate) =
                sieve.retrieve(&result, DEFAULT_PRIME_CERTAINTY, &mut rand::rng())
            {
                return candidate;
            }
            result = result + BigInt::from(2 * search_len as u64);
        }
    }
}

/// Sieve window size likely to contain a prime near a `bit_length`-bit
/// value, by the prime number theorem.
pub(crate) fn prime_search_len(bit_length: u64) -> usize {
    (bit_length / 20 * 64) as usize
}

fn passes_small_prime_product(p: &BigInt) -> bool {
    let r = (p % BigInt::from(SMALL_PRIME_PRODUCT))
        .to_u64()
        .expect("remainder below the product");
    r % 3 != 0
        && r % 5 != 0
        && r % 7 != 0
        && r % 11 != 0
        && r % 13 != 0
        && r % 17 != 0
        && r % 19 != 0
        && r % 23 != 0
        && r % 29 != 0
        && r % 31 != 0
        && r % 37 != 0
        && r % 41 != 0
}

/// Core primality test for an odd `w > 2`, sizing the Miller-Rabin round
/// count from the bit length.
pub(crate) fn prime_to_certainty<R: Rng + ?Sized>(w: &BigInt, certainty: u32, rng: &mut R) -> bool {
    let n = certainty.saturating_add(1) / 2;
    let size_in_bits = w.bits();
    if size_in_bits < 100 {
        return passes_miller_rabin(w, n.min(50), rng);
    }
    let rounds = if size_in_bits < 256 {
        27
    } else if size_in_bits < 512 {
        15
    } else if size_in_bits < 768 {
        8
    } else if size_in_bits < 1024 {
        4
    } else {
        2
    };
    passes_miller_rabin(w, n.min(rounds), rng) && passes_lucas_lehmer(w)
}

/// Miller-Rabin with uniformly random bases in `(1, w)`.
fn passes_miller_rabin<R: Rng + ?Sized>(w: &BigInt, iterations: u32, rng: &mut R) -> bool {
    let one = BigInt::one();
    let w_minus_one = w - &one;
    let a = w_minus_one.trailing_zeros().expect("w is above 2");
    let m = w_minus_one.shift_right_exact(a);
    let bits = w.bits();

    for _ in 0..iterations {
        let mut b = rng.gen_nonneg_bigint(bits);
        while b <= one || b >= *w {
            b = rng.gen_nonneg_bigint(bits);
        }

        let mut j = 0u64;
        let mut z = b.modpow(&m, w);
        loop {
            if (j == 0 && z.is_one()) || z == w_minus_one {
                break;
            }
            if j > 0 && z.is_one() {
                return false;
            }
            j += 1;
            if j == a {
                return false;
            }
            z = (&z * &z).modulus(w);
        }
    }
    true
}

/// Lucas strong-pseudoprime test for odd `w`.
fn passes_lucas_lehmer(w: &BigInt) -> bool {
    let w_plus_one = w + BigInt::one();
    let mut d = 5i32;
    while jacobi_symbol(d, w) != -1 {
        d = if d < 0 { d.abs() + 2 } else { -(d + 2) };
    }
    let u = lucas_lehmer_sequence(d, &w_plus_one, w);
    u.modulus(w).is_zero()
}

/// Jacobi symbol (p/n) for odd positive `n` and small `p`.
fn jacobi_symbol(p: i32, n: &BigInt) -> i32 {
    if p == 0 {
        return 0;
    }
    let mut p = p;
    let mut j = 1i32;
    let mut u = n.mag.last().copied().expect("n is nonzero") as i32;

    if p < 0 {
        p = -p;
        let n8 = u & 7;
        if n8 == 3 || n8 == 7 {
            j = -j;
        }
    }
    while p & 3 == 0 {
        p >>= 2;
    }
    if p & 1 == 0 {
        p >>= 1;
        if ((u ^ (u >> 1)) & 2) != 0 {
            j = -j;
        }
    }
    if p == 1 {
        return j;
    }
    // Quadratic reciprocity, then reduce u mod p and fold down.
    if p & u & 2 != 0 {
        j = -j;
    }
    u = n
        .modulus(&BigInt::from(p))
        .to_i64()
        .expect("residue fits a word") as i32;
    while u != 0 {
        while u & 3 == 0 {
            u >>= 2;
        }
        if u & 1 == 0 {
            u >>= 1;
            if ((p ^ (p >> 1)) & 2) != 0 {
                j = -j;
            }
        }
        if u == 1 {
            return j;
        }
        debug_assert!(u < p);
        core::mem::swap(&mut u, &mut p);
        if u & p & 2 != 0 {
            j = -j;
        }
        u %= p;
    }
    0
}

/// `U_k` of the Lucas sequence with discriminant `z`, computed mod `n` by
/// binary expansion of `k`.
fn lucas_lehmer_sequence(z: i32, k: &BigInt, n: &BigInt) -> BigInt {
    let d = BigInt::from(z);
    let mut u = BigInt::one();
    let mut v = BigInt::one();

    for i in (0..=k.bits() - 2).rev() {
        let u2 = (&u * &v).modulus(n);
        let mut v2 = (&v * &v + &d * (&u * &u)).modulus(n);
        if v2.test_bit(0) {
            v2 = v2 - n;
        }
        v2 = v2.shift_right(1);
        u = u2;
        v = v2;
        if k.test_bit(i) {
            let mut u2 = (&u + &v).modulus(n);
            if u2.test_bit(0) {
                u2 = u2 - n;
            }
            u2 = u2.shift_right(1);
            let mut v2 = (&v + &d * &u).modulus(n);
            if v2.test_bit(0) {
                v2 = v2 - n;
            }
            v2 = v2.shift_right(1);
            u = u2;
            v = v2;
        }
    }
    u
}

/// A random prime of exactly `bit_length` bits, found by testing random
/// odd candidates. Used below the sieving threshold.
pub(crate) fn small_prime<R: Rng + ?Sized>(
    bit_length: u64,
    certainty: u32,
    rng: &mut R,
) -> BigInt {
    let mag_len = ((bit_length + 31) >> 5) as usize;
    let mut temp = vec![0u32; mag_len];
    let high_bit = 1u32 << ((bit_length + 31) & 31);
    let high_mask = high_bit.wrapping_shl(1).wrapping_sub(1);

    loop {
        for w in temp.iter_mut() {
            *w = rng.random();
        }
        // Force the exact bit length and oddness.
        temp[0] = (temp[0] & high_mask) | high_bit;
        if bit_length > 2 {
            temp[mag_len - 1] |= 1;
        }
        let p = BigInt::from_slice(Plus, &temp);

        if bit_length > 6 && !passes_small_prime_product(&p) {
            continue;
        }
        // Every 2- and 3-bit odd candidate is prime by now.
        if bit_length < 4 {
            return p;
        }
        if prime_to_certainty(&p, certainty, rng) {
            return p;
        }
    }
}

/// A random prime of exactly `bit_length` bits, found by sieving windows
/// above a random even starting point.
pub(crate) fn large_prime<R: Rng + ?Sized>(
    bit_length: u64,
    certainty: u32,
    rng: &mut R,
) -> BigInt {
    let search_len = prime_search_len(bit_length);
    let mut p = rng
        .gen_nonneg_bigint(bit_length)
        .set_bit(bit_length - 1)
        .clear_bit(0);
    loop {
        let sieve = BitSieve::new(&p, search_len);
        if let Some(candidate) = sieve.retrieve(&p, certainty, rng) {
            if candidate.bits() == bit_length {
                return candidate;
            }
        }
        p = p + BigInt::from(2 * search_len as u64);
        if p.bits() != bit_length {
            p = rng.gen_nonneg_bigint(bit_length).set_bit(bit_length - 1);
        }
        p = p.clear_bit(0);
    }
}
