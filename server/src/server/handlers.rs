//! HTTP request handlers.
//!
//! Client mistakes (unknown method, missing field, malformed key or envelope, message too
//! long) come back as 400 with the error text. Anything else is logged in full here and the
//! caller gets a generic 500 naming only the operation.

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse, ResponseError};
use common::api::{self, DecryptRequest, EncryptRequest, ErrorBody};
use common::{CryptoError, Scheme};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    KeyGeneration,
    Encryption,
    Decryption,
}

impl Operation {
    fn failure_message(&self) -> &'static str {
        match self {
            Operation::KeyGeneration => "Failed to generate keys",
            Operation::Encryption => "Failed to encrypt message",
            Operation::Decryption => "Failed to decrypt message",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{operation:?} failed: {source}")]
    Crypto {
        operation: Operation,
        source: CryptoError,
    },
    #[error("{operation:?} worker failed: {reason}")]
    Internal { operation: Operation, reason: String },
    #[error("Invalid request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn new(operation: Operation, source: CryptoError) -> Self {
        if source.is_client_error() {
            warn!("{:?} rejected: {}", operation, source);
        } else {
            error!("{:?} failed: {}", operation, source);
        }
        ApiError::Crypto { operation, source }
    }

    fn internal(operation: Operation, reason: impl ToString) -> Self {
        let reason = reason.to_string();
        error!("{:?} worker failed: {}", operation, reason);
        ApiError::Internal { operation, reason }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Crypto { source, .. } if source.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Crypto { source, .. } if source.is_client_error() => ErrorBody {
                error: source.to_string(),
                kind: source.kind().to_string(),
            },
            ApiError::Crypto { operation, source } => ErrorBody {
                error: operation.failure_message().to_string(),
                kind: source.kind().to_string(),
            },
            ApiError::Internal { operation, .. } => ErrorBody {
                error: operation.failure_message().to_string(),
                kind: "InternalError".to_string(),
            },
            ApiError::BadRequest(reason) => ErrorBody {
                error: format!("Invalid request body: {}", reason),
                kind: "ValidationError".to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed JSON is a client error in the same shape as every other one.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            warn!("Rejected request body: {}", err);
            error::Error::from(ApiError::BadRequest(err.to_string()))
        })
}

pub async fn get_status() -> HttpResponse {
    let schemes: Vec<&str> = Scheme::ALL.iter().map(|s| s.as_str()).collect();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "schemes": schemes,
    }))
}

pub async fn get_schemes() -> HttpResponse {
    HttpResponse::Ok().json(api::list_schemes())
}

/// `GET /api/keys/{method}`. RSA generation is CPU-bound, so it runs on the blocking pool.
pub async fn generate_keys(method: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let method = method.into_inner();
    let keys = web::block(move || api::generate_keys(&method))
        .await
        .map_err(|e| ApiError::internal(Operation::KeyGeneration, e))?
        .map_err(|e| ApiError::new(Operation::KeyGeneration, e))?;

    Ok(HttpResponse::Ok().json(keys))
}

/// `POST /api/encrypt/{method}` with `{ message, publicKey }`.
pub async fn encrypt(
    method: web::Path<String>,
    request: web::Json<EncryptRequest>,
) -> Result<HttpResponse, ApiError> {
    let method = method.into_inner();
    let request = request.into_inner();
    let response = web::block(move || api::encrypt(&method, &request))
        .await
        .map_err(|e| ApiError::internal(Operation::Encryption, e))?
        .map_err(|e| ApiError::new(Operation::Encryption, e))?;

    Ok(HttpResponse::Ok().json(response))
}

/// `POST /api/decrypt/{method}` with `{ encryptedMessage, privateKey, simulateTamper }`.
pub async fn decrypt(
    method: web::Path<String>,
    request: web::Json<DecryptRequest>,
) -> Result<HttpResponse, ApiError> {
    let method = method.into_inner();
    let request = request.into_inner();
    let response = web::block(move || api::decrypt(&method, &request))
        .await
        .map_err(|e| ApiError::internal(Operation::Decryption, e))?
        .map_err(|e| ApiError::new(Operation::Decryption, e))?;

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::Crypto {
            operation: Operation::Decryption,
            source: CryptoError::Decryption("bad padding or wrong key".to_string()),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_errors_are_400() {
        for source in [
            CryptoError::Validation("Message is required".to_string()),
            CryptoError::UnsupportedScheme("xyz".to_string()),
            CryptoError::Parse("bad pem".to_string()),
            CryptoError::Encryption("too long".to_string()),
        ] {
            let err = ApiError::Crypto {
                operation: Operation::Encryption,
                source,
            };
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
