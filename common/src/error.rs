use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Failure kinds reported by the scheme engine.
///
/// Every variant carries a human-readable message. Messages never include key material or
/// plaintext, so they are safe to hand to a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unsupported encryption method: {0}")]
    UnsupportedScheme(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Encryption error: {0}")]
    Encryption(String),
    #[error("Decryption error: {0}")]
    Decryption(String),
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("Key generation error: {0}")]
    KeyGeneration(String),
}

/// Stable, machine-readable name of a [`CryptoError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    ValidationError,
    UnsupportedSchemeError,
    ParseError,
    EncryptionError,
    DecryptionError,
    AuthenticationError,
    KeyGenerationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::UnsupportedSchemeError => "UnsupportedSchemeError",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::EncryptionError => "EncryptionError",
            ErrorKind::DecryptionError => "DecryptionError",
            ErrorKind::AuthenticationError => "AuthenticationError",
            ErrorKind::KeyGenerationError => "KeyGenerationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::Validation(_) => ErrorKind::ValidationError,
            CryptoError::UnsupportedScheme(_) => ErrorKind::UnsupportedSchemeError,
            CryptoError::Parse(_) => ErrorKind::ParseError,
            CryptoError::Encryption(_) => ErrorKind::EncryptionError,
            CryptoError::Decryption(_) => ErrorKind::DecryptionError,
            CryptoError::Authentication(_) => ErrorKind::AuthenticationError,
            CryptoError::KeyGeneration(_) => ErrorKind::KeyGenerationError,
        }
    }

    /// True for failures caused by the caller's input rather than by the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CryptoError::Validation(_)
                | CryptoError::UnsupportedScheme(_)
                | CryptoError::Parse(_)
                | CryptoError::Encryption(_)
        )
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Parse(err.to_string())
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::Parse(format!("invalid base64: {}", err))
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(err: hex::FromHexError) -> Self {
        CryptoError::Parse(format!("invalid hex: {}", err))
    }
}

impl From<rsa::pkcs8::Error> for CryptoError {
    fn from(err: rsa::pkcs8::Error) -> Self {
        CryptoError::Parse(format!("invalid private key: {}", err))
    }
}

impl From<rsa::pkcs8::spki::Error> for CryptoError {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        CryptoError::Parse(format!("invalid public key: {}", err))
    }
}
