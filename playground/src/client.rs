//! Talks to a running server over HTTP, or runs the same operations in-process.

use common::api::{
    self, DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorBody,
};
use common::{CryptoError, KeyPairText, Scheme};
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {error} ({kind})")]
    Api {
        status: u16,
        error: String,
        kind: String,
    },
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, ClientError>;

enum Backend {
    Remote { http: Client, server_url: String },
    Local,
}

pub struct Playground {
    backend: Backend,
}

impl Playground {
    pub fn remote(server_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            backend: Backend::Remote {
                http,
                server_url: server_url.trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn local() -> Self {
        Self {
            backend: Backend::Local,
        }
    }

    pub fn describe(&self) -> String {
        match &self.backend {
            Backend::Remote { server_url, .. } => server_url.clone(),
            Backend::Local => "in-process".to_string(),
        }
    }

    pub async fn generate_keys(&self, scheme: Scheme) -> Result<KeyPairText> {
        match &self.backend {
            Backend::Local => Ok(api::generate_keys(scheme.as_str())?),
            Backend::Remote { http, server_url } => {
                let url = format!("{}/api/keys/{}", server_url, scheme);
                debug!("GET {}", url);
                read_json(http.get(url).send().await?).await
            }
        }
    }

    pub async fn encrypt(&self, scheme: Scheme, request: &EncryptRequest) -> Result<String> {
        let response: EncryptResponse = match &self.backend {
            Backend::Local => api::encrypt(scheme.as_str(), request)?,
            Backend::Remote { http, server_url } => {
                let url = format!("{}/api/encrypt/{}", server_url, scheme);
                debug!("POST {}", url);
                read_json(http.post(url).json(request).send().await?).await?
            }
        };
        Ok(response.encrypted_message)
    }

    pub async fn decrypt(&self, scheme: Scheme, request: &DecryptRequest) -> Result<String> {
        let response: DecryptResponse = match &self.backend {
            Backend::Local => api::decrypt(scheme.as_str(), request)?,
            Backend::Remote { http, server_url } => {
                let url = format!("{}/api/decrypt/{}", server_url, scheme);
                debug!("POST {}", url);
                read_json(http.post(url).json(request).send().await?).await?
            }
        };
        Ok(response.decrypted_message)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let status = status.as_u16();
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(ClientError::Api {
            status,
            error: body.error,
            kind: body.kind,
        }),
        Err(e) => Err(ClientError::Api {
            status,
            error: format!("unreadable error body: {}", e),
            kind: "Unknown".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::encryption::TAMPER_SENTINEL;

    #[tokio::test]
    async fn test_local_exchange() {
        let playground = Playground::local();
        let keys = playground.generate_keys(Scheme::AeadSessionStub).await.unwrap();

        let encrypted = playground
            .encrypt(
                Scheme::AeadSessionStub,
                &EncryptRequest {
                    message: Some("ping".to_string()),
                    public_key: Some(keys.public_key),
                },
            )
            .await
            .unwrap();

        let mut request = DecryptRequest {
            encrypted_message: Some(encrypted),
            private_key: Some(keys.private_key),
            simulate_tamper: false,
        };
        let decrypted = playground
            .decrypt(Scheme::AeadSessionStub, &request)
            .await
            .unwrap();
        assert_eq!(decrypted, "ping");

        request.simulate_tamper = true;
        let tampered = playground
            .decrypt(Scheme::AeadSessionStub, &request)
            .await
            .unwrap();
        assert_eq!(tampered, TAMPER_SENTINEL);
    }

    #[tokio::test]
    async fn test_local_errors_are_crypto_errors() {
        let playground = Playground::local();
        let err = playground
            .encrypt(Scheme::Aes256Cbc, &EncryptRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Crypto(CryptoError::Validation(_))));
    }

    #[test]
    fn test_remote_url_is_normalized() {
        let playground = Playground::remote("http://localhost:8080/").unwrap();
        assert_eq!(playground.describe(), "http://localhost:8080");
    }
}
