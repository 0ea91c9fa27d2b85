use crate::error::Result;
use crate::types::Scheme;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Illustrative "strength" shown next to each scheme.
///
/// A fixed lookup for display only. It is not computed from anything and says nothing about
/// real security; note the simulated PGP scheme, which is plain base64, scores highest.
pub fn strength_score(scheme: Scheme) -> u8 {
    match scheme {
        Scheme::Aes256Cbc => 85,
        Scheme::Rsa2048Oaep => 90,
        Scheme::ArmoredStub => 95,
        Scheme::AeadSessionStub => 88,
    }
}

/// Runs `f` and returns its output with the wall-clock time it took.
pub fn timed<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let output = f();
    (output, start.elapsed())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetrics {
    /// Milliseconds.
    pub encryption_time: f64,
    /// Milliseconds.
    pub decryption_time: f64,
    pub original_size: usize,
    pub encrypted_size: usize,
    pub expansion_ratio: f64,
    pub strength: u8,
}

/// Collects timings and sizes around one encrypt/decrypt exchange.
///
/// Purely derived observability; nothing in the engine reads these numbers back.
pub struct MetricsCollector {
    metrics: OperationMetrics,
}

impl MetricsCollector {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            metrics: OperationMetrics {
                strength: strength_score(scheme),
                ..Default::default()
            },
        }
    }

    /// Times `encrypt_fn` and records plaintext and serialized envelope sizes.
    pub fn measure_encryption<F>(&mut self, message: &str, encrypt_fn: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let (result, elapsed) = timed(encrypt_fn);
        self.record_encryption(message, result.as_deref().ok(), elapsed);
        result
    }

    pub fn measure_decryption<F>(&mut self, decrypt_fn: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let (result, elapsed) = timed(decrypt_fn);
        self.record_decryption(elapsed);
        result
    }

    /// For callers that time the call themselves, e.g. across an `.await`.
    pub fn record_encryption(&mut self, message: &str, envelope: Option<&str>, elapsed: Duration) {
        self.metrics.encryption_time = elapsed.as_secs_f64() * 1000.0;
        self.metrics.original_size = message.len();

        if let Some(envelope) = envelope {
            self.metrics.encrypted_size = envelope.len();
            self.metrics.expansion_ratio = if message.is_empty() {
                0.0
            } else {
                envelope.len() as f64 / message.len() as f64
            };
        }
    }

    pub fn record_decryption(&mut self, elapsed: Duration) {
        self.metrics.decryption_time = elapsed.as_secs_f64() * 1000.0;
    }

    pub fn metrics(&self) -> &OperationMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> OperationMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn test_strength_table() {
        assert_eq!(strength_score(Scheme::Aes256Cbc), 85);
        assert_eq!(strength_score(Scheme::Rsa2048Oaep), 90);
        assert_eq!(strength_score(Scheme::ArmoredStub), 95);
        assert_eq!(strength_score(Scheme::AeadSessionStub), 88);
    }

    #[test]
    fn test_sizes_are_byte_lengths() {
        let mut collector = MetricsCollector::new(Scheme::ArmoredStub);
        let out = collector
            .measure_encryption("héllo", || Ok("0123456789ab".to_string()))
            .unwrap();
        assert_eq!(out, "0123456789ab");

        let metrics = collector.metrics();
        assert_eq!(metrics.original_size, 6);
        assert_eq!(metrics.encrypted_size, 12);
        assert!((metrics.expansion_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(metrics.strength, 95);
    }

    #[test]
    fn test_failed_encryption_keeps_sizes_empty() {
        let mut collector = MetricsCollector::new(Scheme::Aes256Cbc);
        let result = collector.measure_encryption("hi", || {
            Err(CryptoError::Encryption("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(collector.metrics().encrypted_size, 0);
        assert_eq!(collector.metrics().original_size, 2);
    }

    #[test]
    fn test_timing_is_recorded() {
        let mut collector = MetricsCollector::new(Scheme::Rsa2048Oaep);
        collector
            .measure_decryption(|| {
                std::thread::sleep(Duration::from_millis(5));
                Ok(String::new())
            })
            .unwrap();
        assert!(collector.into_metrics().decryption_time >= 5.0);
    }

    #[test]
    fn test_recorded_timings() {
        let mut collector = MetricsCollector::new(Scheme::AeadSessionStub);
        collector.record_encryption("abcd", Some("abcdefgh"), Duration::from_millis(3));
        collector.record_decryption(Duration::from_micros(1500));

        let metrics = collector.into_metrics();
        assert!((metrics.encryption_time - 3.0).abs() < 1e-9);
        assert!((metrics.decryption_time - 1.5).abs() < 1e-9);
        assert!((metrics.expansion_ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_camel_case_fields() {
        let value = serde_json::to_value(OperationMetrics::default()).unwrap();
        assert!(value.get("encryptionTime").is_some());
        assert!(value.get("expansionRatio").is_some());
    }
}
