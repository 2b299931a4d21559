// Pollard's rho factorization with Floyd cycle detection

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::arith::gcd;
use crate::error::{Error, Result};
use crate::prime::is_probable_prime;

/// Modular-step budget for a single (seed, c) walk before restarting.
const WALK_ITERATION_CAP: u64 = 100_000;

/// Trial-division bound for stripping small factors before the rho walk.
const TRIAL_DIVISION_BOUND: u64 = 10_000;

/// Miller-Rabin rounds for the prime pre-check; primes make the rho walk
/// collapse every time, so detecting them up front saves the whole budget.
const PRIME_CHECK_ROUNDS: u32 = 12;

/// A successful split of n, with the iteration count of the rho walk for
/// benchmarking. `p <= q` and `p * q == n` only when n is a semiprime;
/// for other composites q is the (possibly composite) cofactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    pub p: BigUint,
    pub q: BigUint,
    pub iterations: u64,
}

fn split(n: &BigUint, factor: BigUint, iterations: u64) -> Factorization {
    let cofactor = n / &factor;
    let (p, q) = if factor <= cofactor {
        (factor, cofactor)
    } else {
        (cofactor, factor)
    };
    Factorization { p, q, iterations }
}

/// Quickly remove small factors.
fn trial_division(n: &BigUint) -> Option<BigUint> {
    let mut f = 3u64;
    while f <= TRIAL_DIVISION_BOUND {
        let candidate = BigUint::from(f);
        if &candidate * &candidate > *n {
            break;
        }
        if (n % &candidate).is_zero() {
            return Some(candidate);
        }
        f += 2;
    }
    None
}

/// Find a non-trivial factorization of n by Pollard's rho.
///
/// Iterates x -> x^2 + c mod n from a random seed with Floyd's
/// tortoise-and-hare, taking g = gcd(|x - y|, n) each step. On cycle
/// collapse (g = n) or an exhausted walk the engine restarts with a fresh
/// (seed, c), up to `max_restarts` times; running out of restarts is the
/// expected `FactorizationFailed` outcome (n is prime, a prime power, or
/// needs a bigger budget), not a fault. Expected cost O(n^(1/4)) modular
/// operations for a semiprime.
pub fn factorize<R: Rng + ?Sized>(
    n: &BigUint,
    max_restarts: u32,
    rng: &mut R,
) -> Result<Factorization> {
    let one = BigUint::one();
    let two = BigUint::from(2u8);

    if n <= &one {
        return Err(Error::InvalidArgument("nothing to factor below 2"));
    }
    if n.is_even() {
        if *n == two {
            return Err(Error::FactorizationFailed);
        }
        return Ok(split(n, two, 0));
    }
    if is_probable_prime(n, PRIME_CHECK_ROUNDS, rng) {
        return Err(Error::FactorizationFailed);
    }
    if let Some(f) = trial_division(n) {
        if f != *n {
            return Ok(split(n, f, 0));
        }
    }

    let mut iterations = 0u64;
    for _ in 0..max_restarts {
        let c = rng.gen_biguint_range(&one, n);
        let mut x = rng.gen_biguint_range(&two, n);
        let mut y = x.clone();

        let step = |v: &BigUint| (v * v + &c) % n;

        for _ in 0..WALK_ITERATION_CAP {
            x = step(&x);
            y = step(&step(&y));
            iterations += 1;

            let diff = if x > y { &x - &y } else { &y - &x };
            let g = gcd(&diff, n);
            if g.is_one() {
                continue;
            }
            if g == *n {
                // Cycle collapsed onto itself; restart with new (seed, c)
                break;
            }
            return Ok(split(n, g, iterations));
        }
    }

    Err(Error::FactorizationFailed)
}
