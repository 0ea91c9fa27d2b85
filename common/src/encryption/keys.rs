//! Key material for every scheme.
//!
//! Nothing here is cached or persisted: each generation call draws fresh randomness from
//! the operating system CSPRNG and the caller owns the result for one exchange.

use crate::encryption::armor::{armor_encode, ArmorLabel, PGP_HEADERS};
use crate::error::{CryptoError, Result};
use crate::types::{KeyPairText, Scheme};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

pub const AES_KEY_LEN: usize = 32;
pub const AES_IV_LEN: usize = 16;
pub const RSA_BITS: usize = 2048;

/// Body of the placeholder public key block. Not derived from anything.
pub const PGP_PUBLIC_KEY_PAYLOAD: &[u8] = b"cipherlab placeholder public key; not key material";

/// Body of the placeholder private key block. Not secret.
pub const PGP_PRIVATE_KEY_PAYLOAD: &[u8] = b"cipherlab placeholder private key; not key material";

/// Key material, tagged by the scheme it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Symmetric {
        key: [u8; AES_KEY_LEN],
        iv: [u8; AES_IV_LEN],
    },
    Asymmetric {
        public_key_pem: String,
        private_key_pem: String,
    },
    ArmoredPlaceholder {
        public_block: String,
        private_block: String,
    },
    SessionStub {
        public_cert_pem: String,
        private_key_pem: String,
    },
}

/// Public half of symmetric key material. Only the IV is exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetricPublicKey {
    pub iv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetricPrivateKey {
    pub key: String,
    pub iv: String,
}

impl KeyMaterial {
    pub fn scheme(&self) -> Scheme {
        match self {
            KeyMaterial::Symmetric { .. } => Scheme::Aes256Cbc,
            KeyMaterial::Asymmetric { .. } => Scheme::Rsa2048Oaep,
            KeyMaterial::ArmoredPlaceholder { .. } => Scheme::ArmoredStub,
            KeyMaterial::SessionStub { .. } => Scheme::AeadSessionStub,
        }
    }

    /// Text handed out as the public key.
    pub fn public_text(&self) -> Result<String> {
        Ok(match self {
            KeyMaterial::Symmetric { iv, .. } => serde_json::to_string(&SymmetricPublicKey {
                iv: hex::encode(iv),
            })?,
            KeyMaterial::Asymmetric { public_key_pem, .. } => public_key_pem.clone(),
            KeyMaterial::ArmoredPlaceholder { public_block, .. } => public_block.clone(),
            KeyMaterial::SessionStub { public_cert_pem, .. } => public_cert_pem.clone(),
        })
    }

    /// Text handed out as the private key.
    pub fn private_text(&self) -> Result<String> {
        Ok(match self {
            KeyMaterial::Symmetric { key, iv } => serde_json::to_string(&SymmetricPrivateKey {
                key: hex::encode(key),
                iv: hex::encode(iv),
            })?,
            KeyMaterial::Asymmetric { private_key_pem, .. } => private_key_pem.clone(),
            KeyMaterial::ArmoredPlaceholder { private_block, .. } => private_block.clone(),
            KeyMaterial::SessionStub { private_key_pem, .. } => private_key_pem.clone(),
        })
    }

    pub fn to_text(&self) -> Result<KeyPairText> {
        Ok(KeyPairText {
            public_key: self.public_text()?,
            private_key: self.private_text()?,
        })
    }
}

pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

pub fn generate_symmetric() -> KeyMaterial {
    KeyMaterial::Symmetric {
        key: random_bytes::<AES_KEY_LEN>(),
        iv: random_bytes::<AES_IV_LEN>(),
    }
}

fn generate_rsa_private_key() -> Result<RsaPrivateKey> {
    RsaPrivateKey::new(&mut OsRng, RSA_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))
}

fn private_key_pem(private_key: &RsaPrivateKey) -> Result<String> {
    let pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    Ok(pem.to_string())
}

/// A 2048-bit RSA pair as SPKI / PKCS#8 PEM.
pub fn generate_asymmetric() -> Result<KeyMaterial> {
    let private_key = generate_rsa_private_key()?;
    let public_key = RsaPublicKey::from(&private_key);

    let public_key_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

    Ok(KeyMaterial::Asymmetric {
        public_key_pem,
        private_key_pem: private_key_pem(&private_key)?,
    })
}

/// The fixed placeholder blocks. Deterministic.
pub fn armored_placeholder() -> KeyMaterial {
    KeyMaterial::ArmoredPlaceholder {
        public_block: armor_encode(ArmorLabel::PgpPublicKey, PGP_HEADERS, PGP_PUBLIC_KEY_PAYLOAD),
        private_block: armor_encode(
            ArmorLabel::PgpPrivateKey,
            PGP_HEADERS,
            PGP_PRIVATE_KEY_PAYLOAD,
        ),
    }
}

/// An RSA pair whose public half is relabelled as a `CERTIFICATE` block.
///
/// The body is the SPKI DER of the public key. There is no signature, subject or chain;
/// nothing ever validates it.
pub fn generate_session_stub() -> Result<KeyMaterial> {
    let private_key = generate_rsa_private_key()?;
    let public_key = RsaPublicKey::from(&private_key);

    let spki = public_key
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

    Ok(KeyMaterial::SessionStub {
        public_cert_pem: armor_encode(ArmorLabel::Certificate, &[], spki.as_bytes()),
        private_key_pem: private_key_pem(&private_key)?,
    })
}
