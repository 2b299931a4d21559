//! Number-theoretic RSA toolkit.
//!
//! Implements RSA key generation, encryption/decryption (including a
//! CRT-optimized decryption path and OAEP/PSS padding), and the classic
//! cryptanalytic attacks against weak parameters: Miller-Rabin primality
//! testing, Pollard's rho factorization and Wiener's small-private-exponent
//! attack. All arithmetic is exact over `num_bigint::BigUint`.
//!
//! Every randomized operation takes an explicit `rand::Rng`, so callers
//! decide between a cryptographically-suitable generator (key generation,
//! OAEP seeds, PSS salts) and a seeded one for reproducible attack
//! benchmarks.
//!
//! ```no_run
//! use rsa_toolkit::{generate_keypair, encrypt_oaep, decrypt_oaep};
//!
//! let mut rng = rand::thread_rng();
//! let keypair = generate_keypair(2048, 65537, &mut rng).unwrap();
//! let ciphertext = encrypt_oaep(b"hello", &keypair.public, &mut rng).unwrap();
//! let plaintext = decrypt_oaep(&ciphertext, &keypair.private).unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```
//!
//! This crate is pure computation: no I/O, no shared state, no padding
//! schemes beyond OAEP and PSS, and no constant-time guarantees. The
//! attack engines exist precisely because textbook RSA with weak
//! parameters is breakable.

pub mod arith;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod factor;
pub mod keygen;
pub mod padding;
pub mod prime;
pub mod wiener;

pub use arith::{extended_gcd, gcd, mod_inverse, mod_pow};
pub use cipher::{decrypt, decrypt_bytes, decrypt_crt, encrypt, encrypt_bytes};
pub use error::{Error, Result};
pub use factor::{factorize, Factorization};
pub use keygen::{generate_keypair, KeyPair, PrivateKey, PublicKey, MIN_KEY_BITS};
pub use padding::{
    decrypt_oaep, encrypt_oaep, mgf1, oaep_decode, oaep_encode, pss_encode, pss_verify, sign_pss,
    verify_pss,
};
pub use prime::{generate_prime, is_probable_prime, MR_ROUNDS};
pub use wiener::{recover_private_exponent, WienerResult};
