//! Cryptographic utilities: random tokens and HMAC-signed values.

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random URL-safe token with `len_bytes` of entropy (base64url, no padding).
pub fn random_token(len_bytes: usize) -> String {
    to_base64_url(&random_bytes(len_bytes))
}

pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Decode standard base64 (used for secrets supplied through the environment).
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// HMAC-SHA256 key used to sign values handed to clients (session cookies).
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    pub fn new(secret: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: <HmacSha256 as Mac>::new_from_slice(secret)?,
        })
    }

    fn tag(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Appends a signature: `"{value}.{base64url(mac)}"`.
    pub fn sign(&self, value: &str) -> String {
        format!("{}.{}", value, to_base64_url(&self.tag(value.as_bytes())))
    }

    /// Verifies a value produced by [`SigningKey::sign`] and returns the
    /// unsigned part. Comparison is constant time; malformed input yields `None`.
    pub fn verify<'a>(&self, signed: &'a str) -> Option<&'a str> {
        let (value, signature) = signed.rsplit_once('.')?;
        let signature = from_base64_url(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(value)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_rfc4231_case_2() {
        let key = SigningKey::new(b"Jefe").unwrap();
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(key.tag(b"what do ya want for nothing?").to_vec(), expected);
    }

    #[test]
    fn random_token_is_url_safe() {
        let token = random_token(32);
        // 32 bytes -> 43 base64url characters without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, random_token(32));
    }

    #[test]
    fn signed_value_roundtrip() {
        let key = SigningKey::new(&[7u8; 32]).unwrap();
        let signed = key.sign("session-id");
        assert_eq!(key.verify(&signed), Some("session-id"));
    }

    #[test]
    fn tampered_or_foreign_signature_is_rejected() {
        let key = SigningKey::new(&[7u8; 32]).unwrap();
        let other = SigningKey::new(&[8u8; 32]).unwrap();
        let signed = key.sign("session-id");

        let tampered = signed.replacen("session", "sessioN", 1);
        assert_eq!(key.verify(&tampered), None);
        assert_eq!(other.verify(&signed), None);
        assert_eq!(key.verify("no-signature"), None);
        assert_eq!(key.verify("value.!!!"), None);
    }

    #[test]
    fn debug_hides_key() {
        let key = SigningKey::new(b"super-secret").unwrap();
        assert_eq!(format!("{key:?}"), "SigningKey([REDACTED])");
    }
}
