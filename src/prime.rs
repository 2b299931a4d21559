// Miller-Rabin primality oracle and prime generation

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use crate::arith::pow_mod;
use crate::error::{Error, Result};

/// Miller-Rabin rounds used for prime generation.
/// 40 rounds bound the false-positive probability by 4^-40 < 2^-80.
pub const MR_ROUNDS: u32 = 40;

/// Miller-Rabin primality test.
/// Returns true if n is probably prime; a false result is conclusive.
///
/// With `rounds` random witnesses the false-positive probability for a
/// composite n is at most 4^-rounds.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let three = BigUint::from(3u8);

    if n < &two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 = 2^s * d with d odd
    let n_minus_1 = n - &one;
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        // Random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_1);

        let mut x = pow_mod(&a, &d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }

        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        // No square reached n-1: a witnesses compositeness
        return false;
    }

    true
}

/// Generate a probable prime of exactly `bits` bits.
///
/// Draws random odd candidates with the top bit forced set (exact width)
/// and retests until one passes Miller-Rabin with [`MR_ROUNDS`] rounds.
pub fn generate_prime<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::InvalidArgument("prime bit length must be at least 2"));
    }

    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate |= BigUint::one() << (bits - 1); // exact bit length
        candidate |= BigUint::one(); // odd
        if is_probable_prime(&candidate, MR_ROUNDS, rng) {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn test_small_primes() {
        let mut rng = rng();
        for p in [2u64, 3, 5, 7, 11, 13, 104729] {
            assert!(
                is_probable_prime(&BigUint::from(p), 20, &mut rng),
                "{} should test prime",
                p
            );
        }
    }

    #[test]
    fn test_small_composites() {
        let mut rng = rng();
        for c in [0u64, 1, 4, 9, 15, 100, 104730] {
            assert!(
                !is_probable_prime(&BigUint::from(c), 20, &mut rng),
                "{} should test composite",
                c
            );
        }
    }

    #[test]
    fn test_carmichael_number() {
        // 561 = 3*11*17 fools Fermat but not Miller-Rabin
        let mut rng = rng();
        let n = BigUint::from(561u32);
        for _ in 0..20 {
            assert!(!is_probable_prime(&n, 5, &mut rng));
        }
    }

    #[test]
    fn test_generate_prime_width_and_parity() {
        let mut rng = rng();
        for bits in [16u64, 32, 64, 128] {
            let p = generate_prime(bits, &mut rng).unwrap();
            assert_eq!(p.bits(), bits, "prime should have exactly {} bits", bits);
            assert!(p.is_odd());
        }
    }

    #[test]
    fn test_generate_prime_too_small() {
        let mut rng = rng();
        assert!(generate_prime(1, &mut rng).is_err());
    }

    #[test]
    fn test_generated_prime_passes_oracle() {
        let mut rng = rng();
        let p = generate_prime(96, &mut rng).unwrap();
        assert!(is_probable_prime(&p, 40, &mut rng));
    }
}
