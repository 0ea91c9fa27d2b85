//! Key generation, encryption and decryption across four schemes behind one contract.
//!
//! | id    | scheme                | confidential | notes                                  |
//! |-------|-----------------------|--------------|----------------------------------------|
//! | `aes` | AES-256-CBC           | no           | envelope carries its key in hex        |
//! | `rsa` | RSA-2048-OAEP         | yes          | message must fit the OAEP bound        |
//! | `pgp` | armored base64 (sim.) | no           | fixed placeholder keys, no encryption  |
//! | `tls` | AES-256-GCM (sim.)    | no           | envelope carries its key; tag verified |

pub mod api;
pub mod config;
pub mod encryption;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{Config, ConfigError};
pub use error::{CryptoError, ErrorKind, Result};
pub use types::*;
