//! Envelope codec.
//!
//! An envelope always travels as one string. The symmetric and session variants are JSON
//! objects, RSA is bare base64 and the armored variant is an armor block. Parsing is eager:
//! encodings are decoded here so a malformed envelope is rejected as a parse error before
//! any cipher runs. Lengths are left to the strategies, which know what they need.

use crate::encryption::armor::{armor_decode, armor_encode, ArmorLabel, PGP_HEADERS};
use crate::error::{CryptoError, Result};
use crate::types::Scheme;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// AES-CBC ciphertext together with the key and IV that open it.
///
/// The key travels in cleartext next to the ciphertext. Whoever holds the envelope can read
/// the message; this scheme demonstrates the cipher mechanics, not confidentiality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesEnvelope {
    pub ciphertext: Vec<u8>,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaEnvelope {
    pub ciphertext: Vec<u8>,
}

/// Armored message text. Base64 only, nothing is encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmoredEnvelope {
    pub armored_text: String,
}

/// AES-GCM record with nonce, tag and (in cleartext) the session key.
///
/// As with [`AesEnvelope`], the envelope discloses its own key. The tag still catches any
/// change to the ciphertext or tag in transit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnvelope {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
    pub key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Aes(AesEnvelope),
    Rsa(RsaEnvelope),
    Armored(ArmoredEnvelope),
    Session(SessionEnvelope),
}

#[derive(Serialize, Deserialize)]
struct AesWire {
    encrypted: String,
    key: String,
    iv: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionWire {
    encrypted: String,
    iv: String,
    auth_tag: String,
    key: String,
}

impl ArmoredEnvelope {
    pub fn from_payload(payload: &[u8]) -> Self {
        Self {
            armored_text: armor_encode(ArmorLabel::PgpMessage, PGP_HEADERS, payload),
        }
    }

    pub fn payload(&self) -> Result<Vec<u8>> {
        armor_decode(ArmorLabel::PgpMessage, &self.armored_text)
    }
}

impl Envelope {
    pub fn scheme(&self) -> Scheme {
        match self {
            Envelope::Aes(_) => Scheme::Aes256Cbc,
            Envelope::Rsa(_) => Scheme::Rsa2048Oaep,
            Envelope::Armored(_) => Scheme::ArmoredStub,
            Envelope::Session(_) => Scheme::AeadSessionStub,
        }
    }

    /// Serializes the envelope into its transportable string.
    pub fn to_transport(&self) -> Result<String> {
        Ok(match self {
            Envelope::Aes(env) => serde_json::to_string(&AesWire {
                encrypted: BASE64.encode(&env.ciphertext),
                key: hex::encode(&env.key),
                iv: hex::encode(&env.iv),
            })?,
            Envelope::Rsa(env) => BASE64.encode(&env.ciphertext),
            Envelope::Armored(env) => env.armored_text.clone(),
            Envelope::Session(env) => serde_json::to_string(&SessionWire {
                encrypted: BASE64.encode(&env.ciphertext),
                iv: BASE64.encode(&env.nonce),
                auth_tag: BASE64.encode(&env.auth_tag),
                key: BASE64.encode(&env.key),
            })?,
        })
    }

    /// Parses `text` as an envelope of `scheme`. No other scheme's format is tried.
    pub fn parse(scheme: Scheme, text: &str) -> Result<Self> {
        match scheme {
            Scheme::Aes256Cbc => {
                let wire: AesWire = serde_json::from_str(text)
                    .map_err(|e| CryptoError::Parse(format!("malformed AES envelope: {}", e)))?;
                Ok(Envelope::Aes(AesEnvelope {
                    ciphertext: BASE64.decode(wire.encrypted.as_bytes())?,
                    key: hex::decode(&wire.key)?,
                    iv: hex::decode(&wire.iv)?,
                }))
            }
            Scheme::Rsa2048Oaep => {
                let ciphertext = BASE64.decode(text.trim().as_bytes())?;
                if ciphertext.is_empty() {
                    return Err(CryptoError::Parse("empty RSA ciphertext".to_string()));
                }
                Ok(Envelope::Rsa(RsaEnvelope { ciphertext }))
            }
            Scheme::ArmoredStub => {
                let begin = ArmorLabel::PgpMessage.begin_marker();
                if !text.lines().any(|line| line.trim_end() == begin) {
                    return Err(CryptoError::Parse(format!("missing {begin} marker")));
                }
                Ok(Envelope::Armored(ArmoredEnvelope {
                    armored_text: text.to_string(),
                }))
            }
            Scheme::AeadSessionStub => {
                let wire: SessionWire = serde_json::from_str(text).map_err(|e| {
                    CryptoError::Parse(format!("malformed session envelope: {}", e))
                })?;
                Ok(Envelope::Session(SessionEnvelope {
                    ciphertext: BASE64.decode(wire.encrypted.as_bytes())?,
                    nonce: BASE64.decode(wire.iv.as_bytes())?,
                    auth_tag: BASE64.decode(wire.auth_tag.as_bytes())?,
                    key: BASE64.decode(wire.key.as_bytes())?,
                }))
            }
        }
    }
}
