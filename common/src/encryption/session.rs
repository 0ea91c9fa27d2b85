//! Simulated TLS record: AES-256-GCM with a 128-bit nonce and 128-bit tag.
//!
//! No handshake happens. Every encryption draws its own session key and nonce, ignores
//! the certificate it was given, and puts the key in the envelope in cleartext. What the
//! scheme does show is integrity: any change to ciphertext or tag fails authentication.

use super::envelope::{Envelope, SessionEnvelope};
use super::keys::{self, KeyMaterial, AES_KEY_LEN};
use super::{envelope_mismatch, SchemeStrategy};
use crate::error::{CryptoError, Result};
use crate::types::Scheme;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};

type Aes256Gcm16 = AesGcm<Aes256, U16>;

pub const NONCE_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

pub struct SessionStrategy;

impl SchemeStrategy for SessionStrategy {
    fn scheme(&self) -> Scheme {
        Scheme::AeadSessionStub
    }

    fn generate_keys(&self) -> Result<KeyMaterial> {
        keys::generate_session_stub()
    }

    fn encrypt(&self, message: &str, _public_key: &str) -> Result<Envelope> {
        let key = keys::random_bytes::<AES_KEY_LEN>();
        let nonce = keys::random_bytes::<NONCE_LEN>();

        let cipher = Aes256Gcm16::new_from_slice(&key)
            .map_err(|_| CryptoError::Encryption("invalid session key".to_string()))?;

        let mut buffer = message.as_bytes().to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&nonce), b"", &mut buffer)
            .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".to_string()))?;

        Ok(Envelope::Session(SessionEnvelope {
            ciphertext: buffer,
            nonce: nonce.to_vec(),
            auth_tag: tag.to_vec(),
            key: key.to_vec(),
        }))
    }

    fn decrypt(&self, envelope: &Envelope, _private_key: &str) -> Result<String> {
        let Envelope::Session(env) = envelope else {
            return Err(envelope_mismatch(self.scheme(), envelope));
        };

        if env.key.len() != AES_KEY_LEN {
            return Err(CryptoError::Decryption(format!(
                "session key must be {} bytes, got {}",
                AES_KEY_LEN,
                env.key.len()
            )));
        }
        if env.nonce.len() != NONCE_LEN {
            return Err(CryptoError::Decryption(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LEN,
                env.nonce.len()
            )));
        }
        if env.auth_tag.len() != TAG_LEN {
            return Err(CryptoError::Authentication(format!(
                "tag must be {} bytes, got {}",
                TAG_LEN,
                env.auth_tag.len()
            )));
        }

        let cipher = Aes256Gcm16::new_from_slice(&env.key)
            .map_err(|_| CryptoError::Decryption("invalid session key".to_string()))?;

        let mut buffer = env.ciphertext.clone();
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&env.nonce),
                b"",
                &mut buffer,
                Tag::from_slice(&env.auth_tag),
            )
            .map_err(|_| CryptoError::Authentication("authentication tag mismatch".to_string()))?;

        String::from_utf8(buffer)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}
