//! Cryptographically secure random byte generation.

use rand::{rngs::OsRng, RngCore};

use crate::error::CryptoError;

/// Draws `bits / 8` bytes from the OS CSPRNG.
///
/// Never returns fewer bytes than requested on success; an inaccessible RNG
/// surfaces as [`CryptoError::RandomSourceUnavailable`].
pub(crate) fn random_bits(bits: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; bits / 8];
    OsRng.try_fill_bytes(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_byte_count() {
        assert_eq!(random_bits(256).unwrap().len(), 32);
        assert_eq!(random_bits(128).unwrap().len(), 16);
        assert_eq!(random_bits(0).unwrap().len(), 0);
    }

    #[test]
    fn successive_draws_differ() {
        let a = random_bits(256).unwrap();
        let b = random_bits(256).unwrap();
        assert_ne!(a, b);
    }
}
