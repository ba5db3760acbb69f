//! Randomization of big integers.

use rand::distr::uniform::{Error, SampleBorrow, SampleUniform, UniformSampler};
use rand::distr::Distribution;
use rand::Rng;

use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::bigint::Sign::{Minus, Plus};
use crate::bigint::BigInt;

/// A trait for sampling random big integers.
pub trait RandBigInt {
    /// Generate a random non-negative [`BigInt`] of at most the given bit
    /// size, uniform over `[0, 2^bit_size)`.
    fn gen_nonneg_bigint(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random [`BigInt`] whose magnitude has at most the given
    /// bit size, with a uniformly random sign.
    fn gen_bigint(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random [`BigInt`] less than the given bound.
    ///
    /// # Panics
    ///
    /// Panics when the bound is not positive.
    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt;

    /// Generate a random [`BigInt`] within the given range. The lower
    /// bound is inclusive; the upper bound is exclusive.
    ///
    /// # Panics
    ///
    /// Panics when the upper bound is not greater than the lower bound.
    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt;
}

fn gen_bits<R: Rng + ?Sized>(rng: &mut R, data: &mut [u32], rem: u64) {
    // `fill` is faster than many `random::<u32>` calls
    rng.fill(data);
    if rem > 0 {
        // The magnitude is big-endian, so the partial word leads.
        data[0] >>= 32 - rem;
    }
}

impl<R: Rng + ?Sized> RandBigInt for R {
    fn gen_nonneg_bigint(&mut self, bit_size: u64) -> BigInt {
        let (digits, rem) = bit_size.div_rem(&32);
        let len = (digits + (rem > 0) as u64)
            .to_usize()
            .expect("capacity overflow");
        let mut data = vec![0u32; len];
        gen_bits(self, &mut data, rem);
        BigInt::from_magnitude(Plus, data)
    }

    fn gen_bigint(&mut self, bit_size: u64) -> BigInt {
        loop {
            let magnitude = self.gen_nonneg_bigint(bit_size);
            let sign = if self.random() { Plus } else { Minus };
            if magnitude.is_zero() && sign == Minus {
                // Reject negative zero so both signs stay equally likely.
                continue;
            }
            return match sign {
                Minus => -magnitude,
                _ => magnitude,
            };
        }
    }

    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt {
        assert!(bound > &BigInt::zero());
        let bits = bound.bits();
        loop {
            let n = self.gen_nonneg_bigint(bits);
            if &n < bound {
                return n;
            }
        }
    }

    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt {
        assert!(lbound < ubound);
        if lbound.is_zero() {
            self.gen_bigint_below(ubound)
        } else {
            lbound + self.gen_bigint_below(&(ubound - lbound))
        }
    }
}

/// A random distribution for non-negative [`BigInt`] of a particular bit
/// size.
#[derive(Clone, Copy, Debug)]
pub struct RandomBits {
    bits: u64,
}

impl RandomBits {
    /// Creates a distribution over `[0, 2^bits)`.
    #[inline]
    pub fn new(bits: u64) -> RandomBits {
        RandomBits { bits }
    }
}

impl Distribution<BigInt> for RandomBits {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BigInt {
        rng.gen_nonneg_bigint(self.bits)
    }
}

/// The back-end implementing rand's [`UniformSampler`] for [`BigInt`].
#[derive(Clone, Debug)]
pub struct UniformBigInt {
    base: BigInt,
    len: BigInt,
}

impl UniformSampler for UniformBigInt {
    type X = BigInt;

    #[inline]
    fn new<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low >= high {
            return Err(Error::EmptyRange);
        }
        Ok(UniformBigInt {
            len: high - low,
            base: low.clone(),
        })
    }

    #[inline]
    fn new_inclusive<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low > high {
            return Err(Error::EmptyRange);
        }
        Self::new(low, high + BigInt::from(1u32))
    }

    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::X {
        &self.base + rng.gen_bigint_below(&self.len)
    }
}

impl SampleUniform for BigInt {
    type Sampler = UniformBigInt;
}

/// A generic trait for generating random primes.
///
/// ```
/// use rand::rng;
/// use bigmath::RandPrime;
///
/// let mut rng = rng();
/// let p = rng.gen_prime(512);
/// assert_eq!(p.bits(), 512);
/// ```
pub trait RandPrime {
    /// Generate a random prime number with as many bits as given, with an
    /// error probability of at most `2^-100`.
    ///
    /// # Panics
    ///
    /// Panics if the bit size is below 2.
    fn gen_prime(&mut self, bit_size: u64) -> BigInt;
}

impl<R: Rng + ?Sized> RandPrime for R {
    fn gen_prime(&mut self, bit_size: u64) -> BigInt {
        BigInt::probable_prime(bit_size, self)
    }
}
