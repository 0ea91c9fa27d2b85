//! Scheme dispatch engine.
//!
//! Each [`Scheme`] has one strategy bundling key generation, encryption and decryption.
//! [`strategy`] selects it by exhaustive match, so the set of schemes is checked at compile
//! time. Every operation is a pure function of its inputs plus the OS CSPRNG; there is no
//! shared state between calls.
//!
//! Read the scheme docs before relying on any of this for secrecy. Only RSA keeps a message
//! confidential: the AES and session envelopes carry their own key in cleartext, and the
//! armored scheme is plain base64. That behavior is part of the teaching contract.

pub mod aes_cbc;
pub mod armor;
pub mod armored;
pub mod envelope;
pub mod keys;
pub mod metrics;
pub mod rsa_oaep;
pub mod session;

pub use envelope::{AesEnvelope, ArmoredEnvelope, Envelope, RsaEnvelope, SessionEnvelope};
pub use keys::KeyMaterial;
pub use metrics::{strength_score, MetricsCollector, OperationMetrics};

use crate::error::{CryptoError, Result};
use crate::types::Scheme;
use log::{debug, warn};
use sha2::{Digest, Sha256};

/// Returned verbatim by every decryption that runs with the tamper flag set.
pub const TAMPER_SENTINEL: &str = "⚠️ Message integrity compromised! This message has been tampered with by a Man-in-the-Middle attack.";

pub trait SchemeStrategy: Send + Sync {
    fn scheme(&self) -> Scheme;

    /// Fresh key material for this scheme.
    fn generate_keys(&self) -> Result<KeyMaterial>;

    /// Encrypts a message that has already been checked to be non-blank.
    fn encrypt(&self, message: &str, public_key: &str) -> Result<Envelope>;

    fn decrypt(&self, envelope: &Envelope, private_key: &str) -> Result<String>;
}

pub fn strategy(scheme: Scheme) -> &'static dyn SchemeStrategy {
    match scheme {
        Scheme::Aes256Cbc => &aes_cbc::AesCbcStrategy,
        Scheme::Rsa2048Oaep => &rsa_oaep::RsaOaepStrategy,
        Scheme::ArmoredStub => &armored::ArmoredStrategy,
        Scheme::AeadSessionStub => &session::SessionStrategy,
    }
}

pub(crate) fn envelope_mismatch(expected: Scheme, envelope: &Envelope) -> CryptoError {
    CryptoError::Parse(format!(
        "expected a {} envelope, got a {} envelope",
        expected,
        envelope.scheme()
    ))
}

fn key_mismatch(expected: Scheme, keys: &KeyMaterial) -> CryptoError {
    CryptoError::Parse(format!(
        "expected {} key material, got {} key material",
        expected,
        keys.scheme()
    ))
}

/// Short SHA-256 fingerprint of key text, safe to log.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..8])
}

pub fn generate_keys(scheme: Scheme) -> Result<KeyMaterial> {
    let keys = strategy(scheme).generate_keys()?;
    debug!(
        "Generated {} key material (public fingerprint {})",
        scheme,
        fingerprint(&keys.public_text()?)
    );
    Ok(keys)
}

pub fn encrypt(scheme: Scheme, message: &str, public_key: &str) -> Result<Envelope> {
    if message.trim().is_empty() {
        return Err(CryptoError::Validation("Message is required".to_string()));
    }
    strategy(scheme).encrypt(message, public_key)
}

/// [`encrypt`] with typed key material, which must belong to `scheme`.
pub fn encrypt_with_keys(scheme: Scheme, message: &str, keys: &KeyMaterial) -> Result<Envelope> {
    if keys.scheme() != scheme {
        return Err(key_mismatch(scheme, keys));
    }
    encrypt(scheme, message, &keys.public_text()?)
}

/// Decrypts `envelope`, or returns [`TAMPER_SENTINEL`] when `simulate_tamper` is set.
///
/// The tamper path is an injected fault for demonstration. It skips every check, including
/// whether the envelope belongs to `scheme`. It is not an integrity check.
pub fn decrypt(
    scheme: Scheme,
    envelope: &Envelope,
    private_key: &str,
    simulate_tamper: bool,
) -> Result<String> {
    if simulate_tamper {
        warn!("Simulated interception on {} decryption", scheme);
        return Ok(TAMPER_SENTINEL.to_string());
    }
    if envelope.scheme() != scheme {
        return Err(envelope_mismatch(scheme, envelope));
    }
    strategy(scheme).decrypt(envelope, private_key)
}

/// [`decrypt`] with typed key material, which must belong to `scheme`.
pub fn decrypt_with_keys(
    scheme: Scheme,
    envelope: &Envelope,
    keys: &KeyMaterial,
    simulate_tamper: bool,
) -> Result<String> {
    if simulate_tamper {
        return decrypt(scheme, envelope, "", true);
    }
    if keys.scheme() != scheme {
        return Err(key_mismatch(scheme, keys));
    }
    decrypt(scheme, envelope, &keys.private_text()?, false)
}

/// Parses and decrypts a transported envelope string.
///
/// With `simulate_tamper` set the text is never parsed.
pub fn decrypt_text(
    scheme: Scheme,
    envelope_text: &str,
    private_key: &str,
    simulate_tamper: bool,
) -> Result<String> {
    if simulate_tamper {
        warn!("Simulated interception on {} decryption", scheme);
        return Ok(TAMPER_SENTINEL.to_string());
    }
    let envelope = Envelope::parse(scheme, envelope_text)?;
    decrypt(scheme, &envelope, private_key, false)
}
