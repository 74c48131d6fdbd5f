//! Error types for sealing and unsealing.
//!
//! Failures fall into two families that callers must be able to tell apart:
//! [`UnsealError`] means the input token did not validate, and deliberately
//! carries no more detail than its canonical message; [`CryptoError`] means a
//! platform primitive failed (RNG, cipher, MAC) and is propagated verbatim.

use thiserror::Error;

/// A validation failure caused by the input token.
///
/// The message strings are part of the wire contract and match the reference
/// implementation byte for byte. Callers should treat every variant as
/// "authentication failed" and not surface the distinction to untrusted
/// parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsealError {
    #[error("Incorrect number of sealed components")]
    ComponentCount,

    #[error("Wrong mac prefix")]
    MacPrefix,

    #[error("Invalid expiration time")]
    InvalidExpiration,

    #[error("Invalid component encoding")]
    ComponentEncoding,

    #[error("Expired or invalid seal")]
    Expired,

    #[error("Bad hmac value")]
    BadHmac,
}

/// An operational failure in a platform primitive.
///
/// These never indicate anything about the validity of a token; they are
/// configuration or environment faults and are kept distinct from
/// [`UnsealError`] so callers can alert on them instead of treating them as
/// forgery attempts.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(#[from] rand::Error),

    #[error("cipher initialization failed")]
    CipherInitFailed,

    #[error("mac initialization failed")]
    MacInitFailed,

    #[error("cipher input is not block aligned")]
    NotBlockAligned,
}

/// Unified error for all vault operations.
#[derive(Debug, Error)]
pub enum IronError {
    /// The token failed validation.
    #[error(transparent)]
    Unseal(#[from] UnsealError),

    /// A cryptographic primitive failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl IronError {
    /// Returns true if the error was caused by the input token.
    pub fn is_validation(&self) -> bool {
        matches!(self, IronError::Unseal(_))
    }

    /// Returns true if the error was an operational fault rather than a bad
    /// token.
    pub fn is_operational(&self) -> bool {
        matches!(self, IronError::Crypto(_))
    }
}
