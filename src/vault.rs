//! Seal/unseal orchestration and configuration.
//!
//! A [`Vault`] owns an immutable [`Options`] and composes the random source,
//! key derivation, cipher suite, padder and message codec into the two public
//! operations. A single vault is safe to share across threads: every call
//! works on its own message and buffers, and the underlying primitives keep
//! no mutable state.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::cipher::{CipherSuite, AES_256_CBC};
use crate::error::{CryptoError, IronError, UnsealError};
use crate::kdf;
use crate::message::Message;
use crate::padding;
use crate::random;

/// Minimum length of the shared secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// How payloads are encrypted.
#[derive(Clone, Copy)]
pub struct Encryption {
    /// Size of the derived encryption key in bits.
    pub key_bits: usize,
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Bits of randomness behind each per-token encryption salt.
    pub salt_bits: usize,
    /// Size of the generated IV in bits.
    pub iv_bits: usize,
    /// Block cipher suite; see [`CipherSuite`] for adding alternatives.
    pub cipher: &'static dyn CipherSuite,
}

impl Default for Encryption {
    fn default() -> Self {
        Encryption {
            key_bits: 256,
            iterations: 1,
            salt_bits: 256,
            iv_bits: 128,
            cipher: &AES_256_CBC,
        }
    }
}

/// Hash behind the integrity MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityHash {
    Sha256,
}

/// How tokens are authenticated.
#[derive(Debug, Clone, Copy)]
pub struct Integrity {
    /// Size of the derived MAC key in bits.
    pub key_bits: usize,
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Bits of randomness behind each per-token integrity salt.
    pub salt_bits: usize,
    /// MAC hash algorithm.
    pub hash: IntegrityHash,
}

impl Default for Integrity {
    fn default() -> Self {
        Integrity {
            key_bits: 256,
            iterations: 1,
            salt_bits: 256,
            hash: IntegrityHash::Sha256,
        }
    }
}

/// Vault configuration. Immutable once the vault is constructed.
///
/// Build with struct update syntax over the defaults:
///
/// ```
/// use ironseal::{Options, Vault};
///
/// let vault = Vault::new(Options {
///     secret: b"some_not_random_password_that_is_also_long_enough".to_vec(),
///     ..Options::default()
/// });
/// ```
pub struct Options {
    /// Shared secret for key derivation. Must be at least
    /// [`MIN_SECRET_LEN`] bytes.
    pub secret: Vec<u8>,
    /// Sealed token lifetime; zero means tokens never expire.
    pub ttl: Duration,
    /// Permitted clock skew when validating expirations.
    pub timestamp_skew: Duration,
    /// Offset added to the local clock during expiration checks.
    pub local_time_offset: Duration,
    /// Encryption parameters.
    pub encryption: Encryption,
    /// Integrity parameters.
    pub integrity: Integrity,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            secret: Vec::new(),
            ttl: Duration::zero(),
            timestamp_skew: Duration::seconds(60),
            local_time_offset: Duration::zero(),
            encryption: Encryption::default(),
            integrity: Integrity::default(),
        }
    }
}

/// Seals payloads into Fe26.2 tokens and unseals them back.
pub struct Vault {
    opts: Options,
}

impl Vault {
    /// Creates a vault from the given options.
    ///
    /// # Panics
    ///
    /// Panics if the secret is shorter than [`MIN_SECRET_LEN`] bytes. A weak
    /// secret is a programming defect, not a runtime condition.
    pub fn new(options: Options) -> Vault {
        assert!(
            options.secret.len() >= MIN_SECRET_LEN,
            "secret key must be at least {MIN_SECRET_LEN} bytes"
        );
        Vault { opts: options }
    }

    /// Encrypts and authenticates the payload into a packed token.
    pub fn seal(&self, payload: &[u8]) -> Result<String, IronError> {
        let mut msg = self.encrypt(payload)?;
        if self.opts.ttl > Duration::zero() {
            msg.expiration = Some(Utc::now() + self.opts.ttl);
        }

        let hmac_salt = self.generate_salt(self.opts.integrity.salt_bits)?;
        let base = msg.base().to_owned();
        let digest = self.hmac_with_password(&hmac_salt, &base)?;

        msg.hmac_salt = hmac_salt;
        msg.hmac = digest;
        Ok(msg.pack())
    }

    /// Verifies and decrypts a packed token back into its payload.
    ///
    /// Steps run in a fixed order and stop at the first failure: parse,
    /// expiration, MAC, decrypt. Only MAC-authenticated ciphertext is ever
    /// decrypted.
    pub fn unseal(&self, sealed: &str) -> Result<Vec<u8>, IronError> {
        let mut msg = Message::unpack(sealed)?;

        if let Some(expiration) = msg.expiration {
            let now = Utc::now() + self.opts.local_time_offset;
            // One-sided: tokens may not be expired past the skew, but
            // future-dated tokens are accepted.
            if expiration - now < -self.opts.timestamp_skew {
                return Err(UnsealError::Expired.into());
            }
        }

        let hmac_salt = msg.hmac_salt.clone();
        let base = msg.base().to_owned();
        let digest = self.hmac_with_password(&hmac_salt, &base)?;

        if !bool::from(digest.ct_eq(&msg.hmac)) {
            return Err(UnsealError::BadHmac.into());
        }

        Ok(self.decrypt(&msg)?)
    }

    fn encrypt(&self, payload: &[u8]) -> Result<Message, CryptoError> {
        let encryption = &self.opts.encryption;
        let salt = self.generate_salt(encryption.salt_bits)?;
        let key = kdf::derive_key(
            &self.opts.secret,
            &salt,
            encryption.iterations,
            encryption.key_bits,
        );
        let iv = random::random_bits(encryption.iv_bits)?;

        let padded = padding::pad(payload.to_vec(), encryption.cipher.block_size());
        let encrypted_body = encryption.cipher.encrypt(&key, &iv, &padded)?;

        Ok(Message {
            salt,
            iv,
            encrypted_body,
            ..Default::default()
        })
    }

    fn decrypt(&self, msg: &Message) -> Result<Vec<u8>, CryptoError> {
        let encryption = &self.opts.encryption;
        let key = kdf::derive_key(
            &self.opts.secret,
            &msg.salt,
            encryption.iterations,
            encryption.key_bits,
        );
        let data = encryption.cipher.decrypt(&key, &msg.iv, &msg.encrypted_body)?;
        Ok(padding::unpad(&data).to_vec())
    }

    // Salts travel in the token as hex text; the same bytes feed key
    // derivation and the packed string, so they are generated in their
    // on-wire form.
    fn generate_salt(&self, bits: usize) -> Result<Vec<u8>, CryptoError> {
        let raw = random::random_bits(bits)?;
        Ok(hex::encode(raw).into_bytes())
    }

    fn hmac_with_password(&self, salt: &[u8], data: &str) -> Result<Vec<u8>, CryptoError> {
        let integrity = &self.opts.integrity;
        let key = kdf::derive_key(
            &self.opts.secret,
            salt,
            integrity.iterations,
            integrity.key_bits,
        );
        match integrity.hash {
            IntegrityHash::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(&key)
                    .map_err(|_| CryptoError::MacInitFailed)?;
                mac.update(data.as_bytes());
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        self.opts.secret.zeroize();
    }
}
