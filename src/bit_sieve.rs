//! A sieve of Eratosthenes over a window of odd numbers.
//!
//! Bit `i` of a sieve stands for the odd number `base + 2i + 1`; a set bit
//! marks a known composite. A process-wide small sieve of the first few
//! thousand odd numbers supplies the primes used to cross off multiples in
//! the large per-search sieves.

use std::sync::LazyLock;

use rand::Rng;

use crate::bigint::BigInt;
use crate::mutable::MutableBigInt;
use crate::prime;

/// Sieve over the odd numbers 3, 5, 7, ... used to seed larger sieves.
static SMALL_SIEVE: LazyLock<BitSieve> = LazyLock::new(BitSieve::small);

pub(crate) struct BitSieve {
    bits: Vec<u64>,
    /// Number of bits (odd numbers) covered.
    length: usize,
}

impl BitSieve {
    /// The sieve of odd numbers starting at 1, fully sieved by trial
    /// crossing. Bit 0 (the number 1) is marked composite up front.
    fn small() -> BitSieve {
        let length = 150 * 64;
        let mut sieve = BitSieve {
            bits: vec![0; ((length - 1) >> 6) + 1],
            length,
        };
        sieve.set(0);
        let mut next_index = 1usize;
        let mut next_prime = 3usize;
        loop {
            sieve.sieve_single(length, next_index + next_prime, next_prime);
            match sieve.sieve_search(length, next_index + 1) {
                Some(i) => {
                    next_index = i;
                    next_prime = 2 * i + 1;
                }
                None => break,
            }
            if next_prime >= length {
                break;
            }
        }
        sieve
    }

    /// A sieve of `search_len` odd numbers above the even `base`, with all
    /// multiples of the small sieve's primes crossed off.
    pub(crate) fn new(base: &BigInt, search_len: usize) -> BitSieve {
        let mut sieve = BitSieve {
            bits: vec![0; ((search_len - 1) >> 6) + 1],
            length: search_len,
        };
        let small = &*SMALL_SIEVE;
        let b = MutableBigInt::from_big(base);

        let mut step = small
            .sieve_search(small.length, 0)
            .expect("small sieve holds primes");
        let mut converted_step = step * 2 + 1;
        loop {
            // Offset of the first odd multiple of converted_step above base.
            let (_, rem) = b.divide_one_word(converted_step as u32);
            let mut start = converted_step - rem as usize;
            if start % 2 == 0 {
                start += converted_step;
            }
            sieve.sieve_single(search_len, (start - 1) / 2, converted_step);

            match small.sieve_search(small.length, step + 1) {
                Some(s) => {
                    step = s;
                    converted_step = step * 2 + 1;
                }
                None => break,
            }
        }
        sieve
    }

    #[inline]
    fn get(&self, index: usize) -> bool {
        self.bits[index >> 6] & (1u64 << (index & 63)) != 0
    }

    #[inline]
    fn set(&mut self, index: usize) {
        self.bits[index >> 6] |= 1u64 << (index & 63);
    }

    /// Index of the first clear bit at or after `start`, if any.
    fn sieve_search(&self, limit: usize, start: usize) -> Option<usize> {
        if start >= limit {
            return None;
        }
        let mut index = start;
        loop {
            if !self.get(index) {
                return Some(index);
            }
            index += 1;
            if index >= limit - 1 {
                return None;
            }
        }
    }

    fn sieve_single(&mut self, limit: usize, mut start: usize, step: usize) {
        while start < limit {
            self.set(start);
            start += step;
        }
    }

    /// Tests the surviving candidates `base + 2i + 1` in order and returns
    /// the first that passes the primality test.
    pub(crate) fn retrieve<R: Rng + ?Sized>(
        &self,
        base: &BigInt,
        certainty: u32,
        rng: &mut R,
    ) -> Option<BigInt> {
        let mut offset = 1u64;
        for &unit in &self.bits {
            let mut next = !unit;
            for _ in 0..64 {
                if next & 1 == 1 {
                    let candidate = base + BigInt::from(offset);
                    if prime::prime_to_certainty(&candidate, certainty, rng) {
                        return Some(candidate);
                    }
                }
                next >>= 1;
                offset += 2;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_small_sieve_marks_composites() {
        let sieve = &*SMALL_SIEVE;
        // Bit i is 2i+1: 1 and 9 composite, 3, 5, 7, 11 prime.
        assert!(sieve.get(0));
        assert!(!sieve.get(1));
        assert!(!sieve.get(2));
        assert!(!sieve.get(3));
        assert!(sieve.get(4));
        assert!(!sieve.get(5));
        // 9999 = 3 * 3333 composite, 9973 prime.
        assert!(sieve.get((9999 - 1) / 2));
        assert!(!sieve.get((9973 - 1) / 2));
    }

    #[test]
    fn test_retrieve_finds_next_prime() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        // 2^100 is even; the first prime above it is 2^100 + 277.
        let base = BigInt::one().shift_left(100);
        let sieve = BitSieve::new(&base, 320);
        let found = sieve.retrieve(&base, 100, &mut rng).unwrap();
        assert_eq!(found, &base + BigInt::from(277u32));
    }
}
