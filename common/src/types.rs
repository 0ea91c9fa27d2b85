use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::CryptoError;

/// The closed set of schemes the engine knows how to run.
///
/// Wire identifiers are `aes`, `rsa`, `pgp` and `tls`. Adding a variant means adding a full
/// strategy in [`crate::encryption`]; the compiler points at every match that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    #[serde(rename = "aes")]
    Aes256Cbc,
    #[serde(rename = "rsa")]
    Rsa2048Oaep,
    /// Simulated PGP. Base64 inside an armor block, no encryption at all.
    #[serde(rename = "pgp")]
    ArmoredStub,
    /// Simulated TLS record. AES-256-GCM with the key shipped in the envelope.
    #[serde(rename = "tls")]
    AeadSessionStub,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::Aes256Cbc,
        Scheme::Rsa2048Oaep,
        Scheme::ArmoredStub,
        Scheme::AeadSessionStub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Aes256Cbc => "aes",
            Scheme::Rsa2048Oaep => "rsa",
            Scheme::ArmoredStub => "pgp",
            Scheme::AeadSessionStub => "tls",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Scheme::Aes256Cbc => "AES-256-CBC",
            Scheme::Rsa2048Oaep => "RSA-2048-OAEP",
            Scheme::ArmoredStub => "PGP (simulated)",
            Scheme::AeadSessionStub => "TLS record (simulated)",
        }
    }

    /// Teaching stand-ins rather than the protocol they are named after.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Scheme::ArmoredStub | Scheme::AeadSessionStub)
    }

    /// Whether an envelope alone keeps the plaintext secret.
    ///
    /// Only RSA does. The AES and session envelopes carry their own key in cleartext and
    /// the armored envelope is plain base64.
    pub fn is_confidential(&self) -> bool {
        matches!(self, Scheme::Rsa2048Oaep)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aes" => Ok(Scheme::Aes256Cbc),
            "rsa" => Ok(Scheme::Rsa2048Oaep),
            "pgp" => Ok(Scheme::ArmoredStub),
            "tls" => Ok(Scheme::AeadSessionStub),
            other => Err(CryptoError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Text form of a generated key pair, as handed across the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairText {
    pub public_key: String,
    pub private_key: String,
}
