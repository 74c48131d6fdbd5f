//! Seal and unseal Fe26.2 ("Iron") tokens.
//!
//! A sealed token is an opaque, URL-safe string carrying an encrypted,
//! HMAC-authenticated payload under a single shared secret, wire-compatible
//! with the reference Iron implementation: a payload sealed here unseals
//! there and vice versa.
//!
//! Sealing derives per-token keys from the secret with PBKDF2, encrypts the
//! padded payload with AES-256-CBC, and authenticates the result with
//! HMAC-SHA-256; unsealing verifies in fixed order (parse, expiration, MAC in
//! constant time) before decrypting.
//!
//! # Example
//!
//! ```
//! use ironseal::{Options, Vault};
//!
//! # fn example() -> Result<(), ironseal::IronError> {
//! let vault = Vault::new(Options {
//!     secret: b"some_not_random_password_that_is_also_long_enough".to_vec(),
//!     ..Options::default()
//! });
//!
//! let token = vault.seal(b"sensitive payload")?;
//! let payload = vault.unseal(&token)?;
//! assert_eq!(payload, b"sensitive payload");
//! # Ok(())
//! # }
//! ```

mod cipher;
mod error;
mod kdf;
mod message;
mod padding;
mod random;
mod vault;

pub use cipher::{Aes256Cbc, CipherSuite, AES_256_CBC};
pub use error::{CryptoError, IronError, UnsealError};
pub use message::{Message, MAC_PREFIX};
pub use vault::{Encryption, Integrity, IntegrityHash, Options, Vault, MIN_SECRET_LEN};
