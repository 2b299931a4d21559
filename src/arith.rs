// Modular arithmetic core
// Square-and-multiply exponentiation, Euclid/extended-Euclid gcd, modular inverse

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Modular exponentiation: base^exponent mod modulus
/// Binary square-and-multiply, O(log exponent) modular multiplications.
///
/// The base is reduced before the loop and every product is reduced
/// immediately. `exponent == 0` gives 1 for any base, including 0;
/// `modulus == 1` gives 0; a zero modulus is rejected.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidArgument("modulus must be positive"));
    }
    if modulus.is_one() {
        return Ok(BigUint::zero());
    }
    Ok(pow_mod(base, exponent, modulus))
}

/// Unchecked square-and-multiply for callers that guarantee modulus > 1.
pub(crate) fn pow_mod(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exp = exponent.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = &result * &base % modulus;
        }
        base = &base * &base % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Extended Euclidean Algorithm (iterative)
/// Returns (g, x, y) such that a*x + b*y = g = gcd(a, b).
///
/// Works over signed integers since the Bézout coefficients alternate
/// sign as the remainder sequence shrinks.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let mut old_r = a.clone();
    let mut r = b.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();
    let mut old_t = BigInt::zero();
    let mut t = BigInt::one();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Compute a^(-1) mod m, normalized into [0, m).
/// Fails with `NoInverseExists` when gcd(a, m) != 1.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m <= &BigUint::one() {
        return Err(Error::InvalidArgument("modulus must exceed 1"));
    }

    let m_signed = BigInt::from(m.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_signed);
    if !g.is_one() {
        return Err(Error::NoInverseExists);
    }

    // x may be negative; fold it into [0, m)
    let x = ((x % &m_signed) + &m_signed) % &m_signed;
    Ok(x.magnitude().clone())
}
