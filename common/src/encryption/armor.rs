//! ASCII armor: base64 payload between `-----BEGIN <LABEL>-----` / `-----END <LABEL>-----`
//! markers, optional `Name: value` headers, body hard-wrapped at 64 columns.
//!
//! ```text
//! -----BEGIN PGP MESSAGE-----
//! Version: OpenPGP.js v4.10.10
//! Comment: https://openpgpjs.org
//!
//! dGVzdA==
//!
//! -----END PGP MESSAGE-----
//! ```

use crate::error::{CryptoError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

pub const LINE_WIDTH: usize = 64;

/// Headers written into every simulated PGP block.
pub const PGP_HEADERS: &[(&str, &str)] = &[
    ("Version", "OpenPGP.js v4.10.10"),
    ("Comment", "https://openpgpjs.org"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorLabel {
    PgpMessage,
    PgpPublicKey,
    PgpPrivateKey,
    Certificate,
}

impl ArmorLabel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PgpMessage => "PGP MESSAGE",
            Self::PgpPublicKey => "PGP PUBLIC KEY BLOCK",
            Self::PgpPrivateKey => "PGP PRIVATE KEY BLOCK",
            Self::Certificate => "CERTIFICATE",
        }
    }

    pub fn begin_marker(&self) -> String {
        format!("-----BEGIN {}-----", self.label())
    }

    pub fn end_marker(&self) -> String {
        format!("-----END {}-----", self.label())
    }
}

/// Splits `text` into lines of at most `width` characters. `text` must be ASCII.
pub fn wrap_lines(text: &str, width: usize) -> Vec<&str> {
    let mut lines = Vec::with_capacity(text.len() / width + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest.len().min(width);
        let (line, tail) = rest.split_at(cut);
        lines.push(line);
        rest = tail;
    }
    lines
}

/// Encodes `payload` as an armor block.
///
/// With headers present a blank separator line follows them, and the body is followed by
/// an empty line before the end marker.
pub fn armor_encode(label: ArmorLabel, headers: &[(&str, &str)], payload: &[u8]) -> String {
    let encoded = BASE64.encode(payload);
    let mut result = String::with_capacity(encoded.len() + 128);

    result.push_str(&label.begin_marker());
    result.push('\n');

    if !headers.is_empty() {
        for (name, value) in headers {
            result.push_str(&format!("{name}: {value}\n"));
        }
        result.push('\n');
    }

    for line in wrap_lines(&encoded, LINE_WIDTH) {
        result.push_str(line);
        result.push('\n');
    }

    if !headers.is_empty() {
        result.push('\n');
    }
    result.push_str(&label.end_marker());
    result
}

/// Recovers the payload of an armor block.
///
/// Lines before the begin marker are ignored. Between the markers, `Version:` and
/// `Comment:` lines and blank lines are dropped and the rest concatenated and base64-decoded.
pub fn armor_decode(label: ArmorLabel, text: &str) -> Result<Vec<u8>> {
    let begin = label.begin_marker();
    let end = label.end_marker();

    let mut body = String::new();
    let mut in_body = false;
    let mut closed = false;

    for raw in text.lines() {
        let line = raw.trim_end();
        if !in_body {
            if line == begin {
                in_body = true;
            }
            continue;
        }
        if line == end {
            closed = true;
            break;
        }
        if line.is_empty() || line.starts_with("Version:") || line.starts_with("Comment:") {
            continue;
        }
        body.push_str(line.trim_start());
    }

    if !in_body {
        return Err(CryptoError::Parse(format!("missing {begin} marker")));
    }
    if !closed {
        return Err(CryptoError::Parse(format!("missing {end} marker")));
    }

    Ok(BASE64.decode(body.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_layout() {
        let armored = armor_encode(ArmorLabel::PgpMessage, PGP_HEADERS, b"test");
        assert_eq!(
            armored,
            "-----BEGIN PGP MESSAGE-----\n\
             Version: OpenPGP.js v4.10.10\n\
             Comment: https://openpgpjs.org\n\
             \n\
             dGVzdA==\n\
             \n\
             -----END PGP MESSAGE-----"
        );
    }

    #[test]
    fn test_long_payload_wraps_at_64() {
        let payload = vec![b'a'; 200];
        let armored = armor_encode(ArmorLabel::PgpMessage, PGP_HEADERS, &payload);
        let body: Vec<&str> = armored
            .lines()
            .filter(|l| !l.starts_with("-----") && !l.contains(':') && !l.is_empty())
            .collect();
        assert!(body.len() > 1);
        assert!(body[..body.len() - 1].iter().all(|l| l.len() == LINE_WIDTH));
        assert!(body.last().unwrap().len() <= LINE_WIDTH);
        assert_eq!(armor_decode(ArmorLabel::PgpMessage, &armored).unwrap(), payload);
    }

    #[test]
    fn test_headerless_block() {
        let armored = armor_encode(ArmorLabel::Certificate, &[], &[1, 2, 3]);
        assert!(armored.starts_with("-----BEGIN CERTIFICATE-----\nAQID\n"));
        assert_eq!(armor_decode(ArmorLabel::Certificate, &armored).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_tolerates_crlf_and_preamble() {
        let text = "garbage\r\n-----BEGIN PGP MESSAGE-----\r\nVersion: x\r\n\r\ndGVz\r\ndA==\r\n-----END PGP MESSAGE-----\r\n";
        assert_eq!(armor_decode(ArmorLabel::PgpMessage, text).unwrap(), b"test");
    }

    #[test]
    fn test_missing_markers() {
        let err = armor_decode(ArmorLabel::PgpMessage, "dGVzdA==").unwrap_err();
        assert!(matches!(err, CryptoError::Parse(_)));

        let err = armor_decode(ArmorLabel::PgpMessage, "-----BEGIN PGP MESSAGE-----\ndGVzdA==\n")
            .unwrap_err();
        assert!(matches!(err, CryptoError::Parse(_)));
    }

    #[test]
    fn test_wrong_label_is_missing_marker() {
        let armored = armor_encode(ArmorLabel::PgpPublicKey, PGP_HEADERS, b"key");
        assert!(armor_decode(ArmorLabel::PgpMessage, &armored).is_err());
    }

    #[test]
    fn test_invalid_base64() {
        let text = "-----BEGIN PGP MESSAGE-----\n!!!not base64!!!\n-----END PGP MESSAGE-----";
        let err = armor_decode(ArmorLabel::PgpMessage, text).unwrap_err();
        assert!(matches!(err, CryptoError::Parse(_)));
    }
}
