// RSA key pair generation

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;

use crate::arith::{gcd, mod_inverse};
use crate::error::{Error, Result};
use crate::prime::generate_prime;

/// Minimum accepted key size in bits. This bounds generation time for the
/// retry loops below; it is not a security floor.
pub const MIN_KEY_BITS: u64 = 128;

/// Fresh `p` draws before key generation gives up.
const MAX_P_ATTEMPTS: u32 = 8;
/// `q` redraws per `p` when gcd(e, phi) != 1 or q == p.
const MAX_Q_ATTEMPTS: u32 = 8;

/// RSA public material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// RSA private material. Owns the factorization of n; `dp`, `dq` and
/// `qinv` are precomputed for the CRT decryption path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub n: BigUint,
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub dp: BigUint,   // d mod (p-1)
    pub dq: BigUint,   // d mod (q-1)
    pub qinv: BigUint, // q^(-1) mod p
}

/// A complete key pair. Immutable once generated.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
    pub bits: u64,
}

impl PublicKey {
    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }
}

impl PrivateKey {
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }
}

/// Generate an RSA key pair.
///
/// `bits` is the modulus size (must be even and at least [`MIN_KEY_BITS`]);
/// `e` is the public exponent, typically 65537. Two independent primes of
/// `bits/2` are drawn, redrawing `q` while `q == p` or while
/// `gcd(e, (p-1)(q-1)) != 1`, with a bounded budget; then
/// `d = e^(-1) mod (p-1)(q-1)` and the CRT parameters are precomputed.
pub fn generate_keypair<R: Rng + ?Sized>(bits: u64, e: u64, rng: &mut R) -> Result<KeyPair> {
    if bits < MIN_KEY_BITS {
        return Err(Error::KeySizeTooSmall {
            min: MIN_KEY_BITS,
            actual: bits,
        });
    }
    if bits % 2 != 0 {
        return Err(Error::InvalidArgument(
            "key size must be even so p and q have equal width",
        ));
    }
    if e < 3 || e % 2 == 0 {
        return Err(Error::InvalidArgument("public exponent must be odd and > 2"));
    }

    let e = BigUint::from(e);
    let one = BigUint::one();
    let half_bits = bits / 2;

    for _ in 0..MAX_P_ATTEMPTS {
        let p = generate_prime(half_bits, rng)?;

        for _ in 0..MAX_Q_ATTEMPTS {
            let q = generate_prime(half_bits, rng)?;
            if q == p {
                continue;
            }

            let phi = (&p - &one) * (&q - &one);
            if gcd(&e, &phi) != one {
                continue;
            }

            // Order p above q so q^(-1) mod p exists with p, q distinct
            let (p, q) = if p < q { (q, p.clone()) } else { (p.clone(), q) };

            let n = &p * &q;
            let d = mod_inverse(&e, &phi)?;

            let dp = &d % (&p - &one);
            let dq = &d % (&q - &one);
            let qinv = mod_inverse(&q, &p)?;

            return Ok(KeyPair {
                public: PublicKey {
                    n: n.clone(),
                    e: e.clone(),
                },
                private: PrivateKey {
                    n,
                    d,
                    p,
                    q,
                    dp,
                    dq,
                    qinv,
                },
                bits,
            });
        }
    }

    Err(Error::KeyGenerationFailed(
        "no prime pair coprime to e within the retry budget",
    ))
}
