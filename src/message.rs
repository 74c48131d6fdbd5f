//! The six-field token codec.
//!
//! A packed token is eight `*`-separated fields in fixed positions:
//!
//! ```text
//! Fe26.2 * key-id * enc-salt * iv * body * expiration * hmac-salt * hmac
//! ```
//!
//! `iv`, `body` and `hmac` are base64url without padding; the salts travel
//! verbatim as ASCII; `expiration` is empty or decimal milliseconds since the
//! Unix epoch. The MAC covers the *base*: the first six fields joined, with
//! no trailing delimiter. When unpacking, the base is recovered by slicing
//! the original input rather than re-joining fields, so tokens produced by
//! other implementations verify even if their encoders would differ from
//! ours.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};

use crate::error::UnsealError;

/// Version prefix of every valid token.
pub const MAC_PREFIX: &str = "Fe26.2";

const DELIMITER: &str = "*";
const COMPONENT_COUNT: usize = 8;

/// In-memory form of a token.
///
/// Lives for the duration of a single seal or unseal call.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// ASCII form of the encryption salt, exactly as carried on the wire.
    pub salt: Vec<u8>,
    /// Raw initialization vector.
    pub iv: Vec<u8>,
    /// Raw ciphertext.
    pub encrypted_body: Vec<u8>,
    /// Absolute expiry; `None` means the token never expires.
    pub expiration: Option<DateTime<Utc>>,
    /// ASCII form of the integrity salt, exactly as carried on the wire.
    pub hmac_salt: Vec<u8>,
    /// Raw MAC digest.
    pub hmac: Vec<u8>,

    // Memoized MAC base string; populated by unpack() or base().
    pub(crate) base: Option<String>,
}

impl Message {
    /// Parses a packed token.
    ///
    /// Checks are strictly ordered: component count, prefix, expiration,
    /// component encodings. The key-id field is reserved and any value is
    /// tolerated. The base is memoized as a byte-exact slice of the input.
    pub fn unpack(sealed: &str) -> Result<Message, UnsealError> {
        let parts: Vec<&str> = sealed.split(DELIMITER).collect();
        if parts.len() != COMPONENT_COUNT {
            return Err(UnsealError::ComponentCount);
        }
        if parts[0] != MAC_PREFIX {
            return Err(UnsealError::MacPrefix);
        }

        let expiration = if parts[5].is_empty() {
            None
        } else {
            let millis: i64 = parts[5]
                .parse()
                .map_err(|_| UnsealError::InvalidExpiration)?;
            let at = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or(UnsealError::InvalidExpiration)?;
            Some(at)
        };

        let iv = decode_component(parts[3])?;
        let encrypted_body = decode_component(parts[4])?;
        let hmac = decode_component(parts[7])?;

        let base_len = sealed.len() - parts[7].len() - 1 - parts[6].len() - 1;

        Ok(Message {
            salt: parts[2].as_bytes().to_vec(),
            iv,
            encrypted_body,
            expiration,
            hmac_salt: parts[6].as_bytes().to_vec(),
            hmac,
            base: Some(sealed[..base_len].to_string()),
        })
    }

    /// Produces the packed token string.
    ///
    /// The memoized base is reused for the first six fields when present;
    /// the integrity salt and MAC are appended behind it.
    pub fn pack(&self) -> String {
        let base = match &self.base {
            Some(base) => base.clone(),
            None => self.join_base(),
        };
        [
            base,
            String::from_utf8_lossy(&self.hmac_salt).into_owned(),
            URL_SAFE_NO_PAD.encode(&self.hmac),
        ]
        .join(DELIMITER)
    }

    /// Returns the MAC base string, memoizing it on first use.
    pub fn base(&mut self) -> &str {
        if self.base.is_none() {
            self.base = Some(self.join_base());
        }
        self.base.as_deref().unwrap_or_default()
    }

    fn join_base(&self) -> String {
        let expiration = self
            .expiration
            .map(|at| at.timestamp_millis().to_string())
            .unwrap_or_default();
        [
            MAC_PREFIX.to_string(),
            String::new(),
            String::from_utf8_lossy(&self.salt).into_owned(),
            URL_SAFE_NO_PAD.encode(&self.iv),
            URL_SAFE_NO_PAD.encode(&self.encrypted_body),
            expiration,
        ]
        .join(DELIMITER)
    }
}

fn decode_component(component: &str) -> Result<Vec<u8>, UnsealError> {
    URL_SAFE_NO_PAD
        .decode(component)
        .map_err(|_| UnsealError::ComponentEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_empty_message() {
        assert_eq!(Message::default().pack(), "Fe26.2*******");
    }

    #[test]
    fn pack_reuses_memoized_base() {
        let msg = Message {
            base: Some("base".to_string()),
            ..Default::default()
        };
        assert_eq!(msg.pack(), "base**");
    }

    #[test]
    fn pack_with_hmac() {
        let msg = Message {
            hmac: b"hmac".to_vec(),
            ..Default::default()
        };
        assert_eq!(msg.pack(), "Fe26.2*******aG1hYw");
    }

    #[test]
    fn pack_with_hmac_and_salt() {
        let msg = Message {
            hmac: b"hmac".to_vec(),
            hmac_salt: b"hmacsalt".to_vec(),
            ..Default::default()
        };
        assert_eq!(msg.pack(), "Fe26.2******hmacsalt*aG1hYw");
    }

    #[test]
    fn base_prefers_memo() {
        let mut msg = Message {
            base: Some("base".to_string()),
            iv: b"ignored".to_vec(),
            ..Default::default()
        };
        assert_eq!(msg.base(), "base");
    }

    #[test]
    fn base_joins_fields() {
        let mut msg = Message {
            iv: b"iv".to_vec(),
            ..Default::default()
        };
        assert_eq!(msg.base(), "Fe26.2***aXY**");

        let mut msg = Message {
            iv: b"iv".to_vec(),
            encrypted_body: b"body".to_vec(),
            ..Default::default()
        };
        assert_eq!(msg.base(), "Fe26.2***aXY*Ym9keQ*");
    }

    #[test]
    fn unpack_rejects_wrong_component_count() {
        assert_eq!(Message::unpack("").unwrap_err(), UnsealError::ComponentCount);
        assert_eq!(
            Message::unpack("Fe26.2*a*a*a*a*a*a*a*a").unwrap_err(),
            UnsealError::ComponentCount
        );
    }

    #[test]
    fn unpack_rejects_wrong_prefix() {
        assert_eq!(
            Message::unpack("a*a*a*a*a*a*a*a").unwrap_err(),
            UnsealError::MacPrefix
        );
    }

    #[test]
    fn unpack_rejects_bad_expiration_before_decoding() {
        // The expiration check runs before any base64 decoding, so the
        // undecodable fields behind it are never reached.
        assert_eq!(
            Message::unpack("Fe26.2*a*a*a*a*a*a*a").unwrap_err(),
            UnsealError::InvalidExpiration
        );
    }

    #[test]
    fn unpack_rejects_bad_base64() {
        assert_eq!(
            Message::unpack("Fe26.2**salt*%%%*Ym9keQ**hs*aG1hYw").unwrap_err(),
            UnsealError::ComponentEncoding
        );
    }

    #[test]
    fn unpack_reads_all_fields() {
        let token = "Fe26.2**73616c74*aXY*Ym9keQ*1380495854060*hs*aG1hYw";
        let msg = Message::unpack(token).unwrap();
        assert_eq!(msg.salt, b"73616c74");
        assert_eq!(msg.iv, b"iv");
        assert_eq!(msg.encrypted_body, b"body");
        assert_eq!(
            msg.expiration.unwrap().timestamp_millis(),
            1_380_495_854_060
        );
        assert_eq!(msg.hmac_salt, b"hs");
        assert_eq!(msg.hmac, b"hmac");
    }

    #[test]
    fn unpack_memoizes_base_as_input_slice() {
        let token = "Fe26.2**73616c74*aXY*Ym9keQ*1380495854060*hs*aG1hYw";
        let mut msg = Message::unpack(token).unwrap();
        assert_eq!(msg.base(), "Fe26.2**73616c74*aXY*Ym9keQ*1380495854060");
    }

    #[test]
    fn unpack_pack_round_trips_exactly() {
        let token = "Fe26.2**73616c74*aXY*Ym9keQ*1380495854060*hs*aG1hYw";
        assert_eq!(Message::unpack(token).unwrap().pack(), token);

        // No expiration.
        let token = "Fe26.2**73616c74*aXY*Ym9keQ**hs*aG1hYw";
        assert_eq!(Message::unpack(token).unwrap().pack(), token);
    }

    #[test]
    fn unpack_tolerates_any_key_id() {
        let token = "Fe26.2*future-key-id*73616c74*aXY*Ym9keQ**hs*aG1hYw";
        let msg = Message::unpack(token).unwrap();
        assert_eq!(msg.iv, b"iv");
    }

    #[test]
    fn unpack_accepts_negative_expiration() {
        let token = "Fe26.2**s*aXY*Ym9keQ*-1000*hs*aG1hYw";
        let msg = Message::unpack(token).unwrap();
        assert_eq!(msg.expiration.unwrap().timestamp_millis(), -1000);
    }
}
