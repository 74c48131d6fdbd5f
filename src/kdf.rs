//! Key derivation from the shared secret.
//!
//! Keys are stretched with PBKDF2 using HMAC-SHA-1 as the pseudorandom
//! function. The SHA-1 PRF is a wire-compatibility requirement: tokens sealed
//! by the reference implementation derive their keys this way even though the
//! outer MAC uses SHA-256. Derived key material zeroizes on drop.

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

/// Derives `key_bits / 8` bytes of key material from the secret and salt.
///
/// Deterministic for equal inputs. The salt is the ASCII form carried in the
/// token, not its decoded bytes.
pub(crate) fn derive_key(
    secret: &[u8],
    salt: &[u8],
    iterations: u32,
    key_bits: usize,
) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; key_bits / 8]);
    pbkdf2_hmac::<Sha1>(secret, salt, iterations, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    // PBKDF2-HMAC-SHA1 vectors from RFC 6070.
    #[test]
    fn rfc6070_single_iteration() {
        let key = derive_key(b"password", b"salt", 1, 160);
        assert_eq!(hex::encode(&*key), "0c60c80f961f0e71f3a9b524af6012062fe037a6");
    }

    #[test]
    fn rfc6070_two_iterations() {
        let key = derive_key(b"password", b"salt", 2, 160);
        assert_eq!(hex::encode(&*key), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    }

    #[test]
    fn rfc6070_many_iterations() {
        let key = derive_key(b"password", b"salt", 4096, 160);
        assert_eq!(hex::encode(&*key), "4b007901b765489abead49d926f721d065a429c1");
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let a = derive_key(b"0123456789abcdef0123456789abcdef", b"aa", 1, 256);
        let b = derive_key(b"0123456789abcdef0123456789abcdef", b"aa", 1, 256);
        assert_eq!(*a, *b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn salt_changes_output() {
        let a = derive_key(b"0123456789abcdef0123456789abcdef", b"aa", 1, 256);
        let b = derive_key(b"0123456789abcdef0123456789abcdef", b"ab", 1, 256);
        assert_ne!(*a, *b);
    }
}
