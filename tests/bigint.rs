use std::str::FromStr;

use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use bigmath::{BigInt, ModInverse, RandBigInt, Sign};

fn big(s: &str) -> BigInt {
    BigInt::from_str(s).unwrap()
}

#[test]
fn test_arithmetic_identities() {
    let mut rng = XorShiftRng::from_seed([1u8; 16]);
    for _ in 0..50 {
        let a = rng.gen_bigint(512);
        let b = rng.gen_bigint(256);
        assert_eq!(&a + &b - &b, a);
        assert_eq!(&a * &b, &b * &a);
        assert_eq!(&a * BigInt::zero(), BigInt::zero());
        assert_eq!(&a * BigInt::one(), a);
    }
}

#[test]
fn test_division_identity() {
    // a == b * (a / b) + (a % b), with the remainder sign following a.
    let mut rng = XorShiftRng::from_seed([2u8; 16]);
    for _ in 0..50 {
        let a = rng.gen_bigint(600);
        let mut b = rng.gen_bigint(200);
        if b.is_zero() {
            b = BigInt::one();
        }
        let (q, r) = a.div_rem(&b);
        assert_eq!(&b * &q + &r, a);
        assert!(r.abs() < b.abs());
        assert!(r.is_zero() || r.signum() == a.signum());
    }
}

#[test]
fn test_remainder_signs() {
    assert_eq!(big("7") % big("3"), big("1"));
    assert_eq!(big("-7") % big("3"), big("-1"));
    assert_eq!(big("7") % big("-3"), big("1"));
    assert_eq!(big("-7") % big("-3"), big("-1"));
    // modulus is always in [0, m).
    assert_eq!(big("-7").modulus(&big("3")), big("2"));
    assert_eq!(big("7").modulus(&big("3")), big("1"));
}

#[test]
fn test_string_round_trip() {
    let mut rng = XorShiftRng::from_seed([3u8; 16]);
    for radix in [2u32, 8, 10, 16, 36] {
        for _ in 0..10 {
            let a = rng.gen_bigint(300);
            let s = a.to_str_radix(radix);
            assert_eq!(BigInt::from_str_radix(&s, radix).unwrap(), a);
        }
    }
    // Canonicalization: leading zeros and an explicit plus disappear.
    assert_eq!(big("+007").to_string(), "7");
    assert_eq!(big("-000").to_string(), "0");
}

#[test]
fn test_modpow_rsa_toy() {
    // p=61, q=53, e=17, d=413.
    let m = big("3233");
    let c = big("65").modpow(&big("17"), &m);
    assert_eq!(c, big("2790"));
    assert_eq!(c.modpow(&big("413"), &m), big("65"));
}

#[test]
fn test_modpow_large() {
    // Fermat: 3^(p-1) == 1 mod p for prime p = 2^127 - 1.
    let p = BigInt::one().shift_left(127) - BigInt::one();
    let e = &p - BigInt::one();
    assert_eq!(big("3").modpow(&e, &p), BigInt::one());
    // Even modulus goes through the CRT split.
    assert_eq!(big("3").modpow(&big("4"), &big("32")), big("17"));
    // Negative exponent inverts first.
    assert_eq!(big("3").modpow(&big("-1"), &big("7")), big("5"));
}

#[test]
fn test_mod_inverse() {
    let a = big("3");
    let m = big("7");
    assert_eq!((&a).mod_inverse(&m), Some(big("5")));
    assert_eq!(big("4").mod_inverse(&big("8")), None);

    let mut rng = XorShiftRng::from_seed([4u8; 16]);
    for _ in 0..20 {
        let a = rng.gen_nonneg_bigint(256) + BigInt::one();
        let m = rng.gen_nonneg_bigint(256) + big("2");
        if let Some(inv) = (&a).mod_inverse(&m) {
            assert_eq!((&a * &inv).modulus(&m), BigInt::one());
        } else {
            assert!(a.gcd(&m) > BigInt::one());
        }
    }
}

#[test]
fn test_gcd_and_pow() {
    assert_eq!(big("48").gcd(&big("18")), big("6"));
    assert_eq!(big("0").gcd(&big("5")), big("5"));
    assert_eq!(big("2").pow(100).to_string(), "1267650600228229401496703205376");
    assert_eq!(big("-3").pow(3), big("-27"));
}

#[test]
fn test_bit_operations() {
    let x = BigInt::from_str_radix("101100", 2).unwrap();
    assert_eq!(x, big("44"));
    assert!(x.test_bit(2) && x.test_bit(3) && x.test_bit(5));
    assert!(!x.test_bit(0));
    assert_eq!(x.set_bit(0), big("45"));
    assert_eq!(x.clear_bit(2), big("40"));
    assert_eq!(x.shift_left(4), big("704"));
    assert_eq!(x.shift_right(3), big("5"));
    // Arithmetic right shift on negatives floors.
    assert_eq!(big("-44").shift_right(3), big("-6"));
    // Negative distances reverse direction.
    assert_eq!(x.shift_left(-3), big("5"));
    // Two's-complement bitwise semantics.
    assert_eq!(big("-1") & big("255"), big("255"));
    assert_eq!(big("6") | big("-5"), big("-1"));
    assert_eq!(big("-6") ^ big("-5"), big("1"));
}

#[test]
fn test_byte_round_trips() {
    let a = big("-123456789123456789123456789");
    let (sign, bytes) = a.to_bytes_be();
    assert_eq!(sign, Sign::Minus);
    assert_eq!(BigInt::from_bytes_be(sign, &bytes), a);

    let signed = a.to_signed_bytes_be();
    assert_eq!(BigInt::from_signed_bytes_be(&signed), a);
}

#[test]
fn test_primitive_conversions() {
    assert_eq!(big("9223372036854775807").to_i64(), Some(i64::MAX));
    assert_eq!(big("9223372036854775808").to_i64(), None);
    assert_eq!(big("-9223372036854775808").to_i64(), Some(i64::MIN));
    assert_eq!(BigInt::from(1u64 << 53).to_f64(), Some(9007199254740992.0));
    let two_130 = BigInt::one().shift_left(130);
    assert_eq!(two_130.to_f64(), Some((2.0f64).powi(130)));
    // Wrapping narrowing keeps the low bits and may flip the sign.
    assert_eq!(big("4294967296").to_i32_wrapping(), 0);
    assert_eq!(big("-1").to_i64_wrapping(), -1);
    assert_eq!(big("9223372036854775808").to_i64_wrapping(), i64::MIN);
    assert_eq!(
        (BigInt::one().shift_left(64) + BigInt::one()).to_i64_wrapping(),
        1
    );
}

#[test]
fn test_primality_surface() {
    assert!(big("2").is_probable_prime(100));
    assert!(!big("1").is_probable_prime(100));
    let m127 = BigInt::one().shift_left(127) - BigInt::one();
    assert!(m127.is_probable_prime(100));
    assert_eq!(big("90").next_probable_prime(), big("97"));
}

#[test]
#[should_panic]
fn test_division_by_zero() {
    let _ = big("5") / big("0");
}
