//! Request/response contract shared by the HTTP service and its clients.
//!
//! Every operation is scoped by a wire scheme id (`aes | rsa | pgp | tls`). The id is
//! resolved first, then required fields are checked, then the engine runs.

use crate::encryption::{self, strength_score};
use crate::error::{CryptoError, Result};
use crate::types::{KeyPairText, Scheme};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    pub message: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResponse {
    pub encrypted_message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub encrypted_message: Option<String>,
    pub private_key: Option<String>,
    /// Older clients send this as `mitm`.
    #[serde(default, alias = "mitm")]
    pub simulate_tamper: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResponse {
    pub decrypted_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeInfo {
    pub id: Scheme,
    pub name: String,
    pub strength: u8,
    pub simulated: bool,
    pub confidential: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl From<Scheme> for SchemeInfo {
    fn from(scheme: Scheme) -> Self {
        Self {
            id: scheme,
            name: scheme.display_name().to_string(),
            strength: strength_score(scheme),
            simulated: scheme.is_simulated(),
            confidential: scheme.is_confidential(),
        }
    }
}

pub fn list_schemes() -> Vec<SchemeInfo> {
    Scheme::ALL.into_iter().map(SchemeInfo::from).collect()
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CryptoError::Validation(format!("{} is required", name))),
    }
}

pub fn generate_keys(method: &str) -> Result<KeyPairText> {
    let scheme: Scheme = method.parse()?;
    let keys = encryption::generate_keys(scheme)?.to_text()?;
    info!("Generated keys for {}", scheme);
    Ok(keys)
}

pub fn encrypt(method: &str, request: &EncryptRequest) -> Result<EncryptResponse> {
    let scheme: Scheme = method.parse()?;
    let message = required(&request.message, "Message")?;
    let public_key = request.public_key.as_deref().unwrap_or_default();

    let envelope = encryption::encrypt(scheme, message, public_key)?;
    let encrypted_message = envelope.to_transport()?;
    info!(
        "Encrypted {} bytes with {} into {} byte envelope",
        message.len(),
        scheme,
        encrypted_message.len()
    );
    Ok(EncryptResponse { encrypted_message })
}

pub fn decrypt(method: &str, request: &DecryptRequest) -> Result<DecryptResponse> {
    let scheme: Scheme = method.parse()?;
    let encrypted_message = required(&request.encrypted_message, "Encrypted message")?;
    let private_key = request.private_key.as_deref().unwrap_or_default();

    let decrypted_message = encryption::decrypt_text(
        scheme,
        encrypted_message,
        private_key,
        request.simulate_tamper,
    )?;
    info!(
        "Decrypted {} envelope (simulated tamper: {})",
        scheme, request.simulate_tamper
    );
    Ok(DecryptResponse { decrypted_message })
}
