//! RSA-2048 with OAEP applied directly to the message bytes.
//!
//! OAEP uses SHA-1 for both the label hash and MGF1, the usual default for
//! `RSA_PKCS1_OAEP_PADDING`, so envelopes from such peers open here and vice versa.

use super::envelope::{Envelope, RsaEnvelope};
use super::keys::{self, KeyMaterial};
use super::{envelope_mismatch, SchemeStrategy};
use crate::error::{CryptoError, Result};
use crate::types::Scheme;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;

/// SHA-1 output length, which fixes the OAEP overhead.
const OAEP_HASH_LEN: usize = 20;

pub struct RsaOaepStrategy;

/// Largest message OAEP can carry under a key of `modulus_bytes` bytes.
pub fn max_message_len(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(2 * OAEP_HASH_LEN + 2)
}

pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey> {
    Ok(RsaPublicKey::from_public_key_pem(pem.trim())?)
}

pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    Ok(RsaPrivateKey::from_pkcs8_pem(pem.trim())?)
}

impl SchemeStrategy for RsaOaepStrategy {
    fn scheme(&self) -> Scheme {
        Scheme::Rsa2048Oaep
    }

    fn generate_keys(&self) -> Result<KeyMaterial> {
        keys::generate_asymmetric()
    }

    fn encrypt(&self, message: &str, public_key: &str) -> Result<Envelope> {
        let public_key = parse_public_key(public_key)?;

        let limit = max_message_len(public_key.size());
        if message.len() > limit {
            return Err(CryptoError::Encryption(format!(
                "message is {} bytes, RSA-OAEP limit for this key is {} bytes",
                message.len(),
                limit
            )));
        }

        let ciphertext = public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), message.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        Ok(Envelope::Rsa(RsaEnvelope { ciphertext }))
    }

    fn decrypt(&self, envelope: &Envelope, private_key: &str) -> Result<String> {
        let Envelope::Rsa(env) = envelope else {
            return Err(envelope_mismatch(self.scheme(), envelope));
        };

        let private_key = parse_private_key(private_key)?;
        let plaintext = private_key
            .decrypt(Oaep::new::<Sha1>(), &env.ciphertext)
            .map_err(|_| CryptoError::Decryption("OAEP decryption failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}
