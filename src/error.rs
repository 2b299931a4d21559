// Error taxonomy shared by every module in the crate

/// Errors that can occur during key generation, the cipher transforms,
/// padding, or the attack engines.
///
/// `FactorizationFailed` and `AttackNotApplicable` are expected
/// probabilistic non-success, not faults: callers should surface them
/// as "attack did not succeed" data.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("no modular inverse exists: operands are not coprime")]
    NoInverseExists,

    #[error("key size too small: need at least {min} bits, got {actual}")]
    KeySizeTooSmall { min: u64, actual: u64 },

    #[error("key generation failed: {0}")]
    KeyGenerationFailed(&'static str),

    // Deliberately says nothing about which structural check failed.
    #[error("invalid padding")]
    PaddingInvalid,

    #[error("factorization did not succeed within the restart budget")]
    FactorizationFailed,

    #[error("attack not applicable: no convergent yielded the private exponent")]
    AttackNotApplicable,
}

pub type Result<T> = std::result::Result<T, Error>;
