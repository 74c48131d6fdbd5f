//! Pluggable block cipher suites.
//!
//! A [`CipherSuite`] maps a key and IV to paired encrypt/decrypt operations
//! over whole blocks. The trait is the extension seam for alternative suites;
//! the vault only ever talks to the trait. Padding is owned by the caller, so
//! suites run their block mode with no inner padding scheme.

use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// A symmetric block-mode cipher.
///
/// Implementations must accept only block-aligned input and reject everything
/// else with [`CryptoError::NotBlockAligned`]; key or IV material of the
/// wrong size surfaces as [`CryptoError::CipherInitFailed`].
pub trait CipherSuite: Send + Sync {
    /// Block size in bytes; callers pad plaintext to a multiple of this.
    fn block_size(&self) -> usize;

    /// Encrypts block-aligned plaintext.
    fn encrypt(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts block-aligned ciphertext.
    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// AES-256 in CBC mode, the suite used by Fe26.2 tokens.
pub struct Aes256Cbc;

/// The default cipher suite.
pub static AES_256_CBC: Aes256Cbc = Aes256Cbc;

impl CipherSuite for Aes256Cbc {
    fn block_size(&self) -> usize {
        16
    }

    fn encrypt(&self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if plaintext.len() % self.block_size() != 0 {
            return Err(CryptoError::NotBlockAligned);
        }
        let enc =
            Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CryptoError::CipherInitFailed)?;
        Ok(enc.encrypt_padded_vec_mut::<NoPadding>(plaintext))
    }

    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let dec =
            Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CryptoError::CipherInitFailed)?;
        dec.decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| CryptoError::NotBlockAligned)
    }
}
