// Wiener's attack: recovering a small private exponent from (e, n)
// via the continued-fraction expansion of e/n

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// A successful reconstruction of the private material from public values
/// only. Independent of any original key object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WienerResult {
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub phi: BigUint,
    pub convergents_examined: u32,
}

/// Attempt to recover a small private exponent d from (e, n).
///
/// Walks the convergents k/d of the continued fraction of e/n using the
/// standard numerator/denominator recurrence. For each convergent with
/// k | (e*d - 1), the candidate phi = (e*d - 1)/k determines
/// p + q = n - phi + 1; when x^2 - (p+q)x + n has a perfect-square
/// discriminant and the roots multiply back to n, the key is broken.
///
/// Succeeds only when d < n^(1/4)/3 or so (Wiener's bound); otherwise
/// every convergent is rejected and the result is `AttackNotApplicable`,
/// an expected outcome rather than a fault.
pub fn recover_private_exponent(
    e: &BigUint,
    n: &BigUint,
    max_convergents: u32,
) -> Result<WienerResult> {
    let one = BigUint::one();
    let two = BigUint::from(2u8);

    if e.is_zero() || n <= &one {
        return Err(Error::InvalidArgument("e and n must be positive, n > 1"));
    }
    if e >= n {
        return Err(Error::InvalidArgument("public exponent must be below the modulus"));
    }

    // Continued-fraction state for e/n and the convergent recurrence
    // k_i = q_i * k_{i-1} + k_{i-2}, d_i likewise.
    let mut a = e.clone();
    let mut b = n.clone();
    let (mut prev_k, mut k) = (BigUint::zero(), BigUint::one());
    let (mut prev_d, mut d) = (BigUint::one(), BigUint::zero());
    let mut examined = 0u32;

    while !b.is_zero() && examined < max_convergents {
        let (quot, rem) = a.div_rem(&b);
        a = std::mem::replace(&mut b, rem);

        let next_k = &quot * &k + &prev_k;
        let next_d = &quot * &d + &prev_d;
        prev_k = std::mem::replace(&mut k, next_k);
        prev_d = std::mem::replace(&mut d, next_d);
        examined += 1;

        if k.is_zero() || d.is_zero() {
            continue;
        }

        // e*d - 1 must be an exact multiple of k for phi to be integral
        let ed_minus_1 = e * &d - &one;
        if !(&ed_minus_1 % &k).is_zero() {
            continue;
        }
        let phi = &ed_minus_1 / &k;
        if &phi >= n {
            continue;
        }

        // p + q = n - phi + 1; solve x^2 - (p+q)x + n = 0
        let sum = n + &one - &phi;
        let sum_sq = &sum * &sum;
        let four_n = BigUint::from(4u8) * n;
        if sum_sq < four_n {
            continue;
        }

        let disc = sum_sq - four_n;
        let root = disc.sqrt();
        if &root * &root != disc {
            continue;
        }

        let p = (&sum + &root) / &two;
        let q = (&sum - &root) / &two;
        if p > one && q > one && &p * &q == *n {
            return Ok(WienerResult {
                d,
                p,
                q,
                phi,
                convergents_examined: examined,
            });
        }
    }

    Err(Error::AttackNotApplicable)
}
