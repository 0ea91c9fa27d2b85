//! AES-256-CBC with PKCS#7 padding.
//!
//! Not confidential by construction: encryption draws a brand-new key, ignores the one
//! handed out by key generation, and ships that new key in hex next to the ciphertext.
//! Only the IV is taken from the caller's public key. Decryption uses whatever key and IV
//! the envelope carries.

use super::envelope::{AesEnvelope, Envelope};
use super::keys::{self, KeyMaterial, SymmetricPublicKey, AES_IV_LEN, AES_KEY_LEN};
use super::{envelope_mismatch, SchemeStrategy};
use crate::error::{CryptoError, Result};
use crate::types::Scheme;
use aes::Aes256;
use cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use log::debug;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub struct AesCbcStrategy;

pub fn encrypt_cbc(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| CryptoError::Encryption(format!("invalid key or IV length: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

pub fn decrypt_cbc(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != AES_KEY_LEN {
        return Err(CryptoError::Decryption(format!(
            "key must be {} bytes, got {}",
            AES_KEY_LEN,
            key.len()
        )));
    }
    if iv.len() != AES_IV_LEN {
        return Err(CryptoError::Decryption(format!(
            "IV must be {} bytes, got {}",
            AES_IV_LEN,
            iv.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption("bad padding or wrong key".to_string()))
}

fn parse_iv(public_key: &str) -> Result<[u8; AES_IV_LEN]> {
    let public: SymmetricPublicKey = serde_json::from_str(public_key)
        .map_err(|e| CryptoError::Parse(format!("AES public key must be {{\"iv\": <hex>}}: {}", e)))?;
    let iv = hex::decode(&public.iv)?;
    iv.as_slice().try_into().map_err(|_| {
        CryptoError::Parse(format!("IV must be {} bytes, got {}", AES_IV_LEN, iv.len()))
    })
}

impl SchemeStrategy for AesCbcStrategy {
    fn scheme(&self) -> Scheme {
        Scheme::Aes256Cbc
    }

    fn generate_keys(&self) -> Result<KeyMaterial> {
        Ok(keys::generate_symmetric())
    }

    fn encrypt(&self, message: &str, public_key: &str) -> Result<Envelope> {
        let iv = parse_iv(public_key)?;
        let key = keys::random_bytes::<AES_KEY_LEN>();

        let ciphertext = encrypt_cbc(&key, &iv, message.as_bytes())?;
        debug!("AES-CBC produced {} ciphertext bytes", ciphertext.len());

        Ok(Envelope::Aes(AesEnvelope {
            ciphertext,
            key: key.to_vec(),
            iv: iv.to_vec(),
        }))
    }

    fn decrypt(&self, envelope: &Envelope, _private_key: &str) -> Result<String> {
        let Envelope::Aes(env) = envelope else {
            return Err(envelope_mismatch(self.scheme(), envelope));
        };

        let plaintext = decrypt_cbc(&env.key, &env.iv, &env.ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}
