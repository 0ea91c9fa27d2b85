//! Simulated PGP: the message is base64-encoded into an armor block.
//!
//! This is an encoding, not encryption. The key blocks are fixed placeholders and neither
//! is consulted on the way in or out.

use super::envelope::{ArmoredEnvelope, Envelope};
use super::keys::{self, KeyMaterial};
use super::{envelope_mismatch, SchemeStrategy};
use crate::error::{CryptoError, Result};
use crate::types::Scheme;

pub struct ArmoredStrategy;

impl SchemeStrategy for ArmoredStrategy {
    fn scheme(&self) -> Scheme {
        Scheme::ArmoredStub
    }

    fn generate_keys(&self) -> Result<KeyMaterial> {
        Ok(keys::armored_placeholder())
    }

    fn encrypt(&self, message: &str, _public_key: &str) -> Result<Envelope> {
        Ok(Envelope::Armored(ArmoredEnvelope::from_payload(message.as_bytes())))
    }

    fn decrypt(&self, envelope: &Envelope, _private_key: &str) -> Result<String> {
        let Envelope::Armored(env) = envelope else {
            return Err(envelope_mismatch(self.scheme(), envelope));
        };

        String::from_utf8(env.payload()?)
            .map_err(|_| CryptoError::Parse("armored payload is not valid UTF-8".to_string()))
    }
}
