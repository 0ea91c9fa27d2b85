//! In-process round-trip benchmark over every scheme.
//!
//! Runs the same request path the HTTP handlers use (`common::api`), minus the network.

use common::api::{self, DecryptRequest, EncryptRequest};
use common::encryption::metrics::timed;
use common::encryption::{MetricsCollector, OperationMetrics};
use common::{CryptoError, Result, Scheme};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeReport {
    pub scheme: Scheme,
    pub iterations: usize,
    pub failures: usize,
    /// Milliseconds.
    pub key_generation_time: f64,
    /// Milliseconds, averaged.
    pub encryption_time: f64,
    /// Milliseconds, averaged.
    pub decryption_time: f64,
    pub original_size: usize,
    pub encrypted_size: usize,
    pub expansion_ratio: f64,
    pub strength: u8,
}

#[derive(Debug, Clone)]
pub struct ExchangeSample {
    pub key_generation: Duration,
    pub metrics: OperationMetrics,
}

/// One generate/encrypt/decrypt exchange, with metrics.
pub fn run_exchange(scheme: Scheme, message: &str) -> Result<ExchangeSample> {
    let (keys, key_generation) = timed(|| api::generate_keys(scheme.as_str()));
    let keys = keys?;
    let mut collector = MetricsCollector::new(scheme);

    let encrypted = collector.measure_encryption(message, || {
        api::encrypt(
            scheme.as_str(),
            &EncryptRequest {
                message: Some(message.to_string()),
                public_key: Some(keys.public_key.clone()),
            },
        )
        .map(|r| r.encrypted_message)
    })?;

    let decrypted = collector.measure_decryption(|| {
        api::decrypt(
            scheme.as_str(),
            &DecryptRequest {
                encrypted_message: Some(encrypted),
                private_key: Some(keys.private_key.clone()),
                simulate_tamper: false,
            },
        )
        .map(|r| r.decrypted_message)
    })?;

    if decrypted != message {
        return Err(CryptoError::Decryption(format!(
            "{} round trip returned a different message",
            scheme
        )));
    }
    Ok(ExchangeSample {
        key_generation,
        metrics: collector.into_metrics(),
    })
}

pub fn run_benchmark(scheme: Scheme, message: &str, iterations: usize) -> SchemeReport {
    info!("Benchmarking {} with {} iterations", scheme, iterations);

    let mut failures = 0;
    let mut samples = Vec::with_capacity(iterations);
    let mut key_generation = Duration::ZERO;

    for i in 0..iterations {
        match run_exchange(scheme, message) {
            Ok(sample) => {
                debug!("{} iteration {}: {:?}", scheme, i, sample.metrics);
                key_generation += sample.key_generation;
                samples.push(sample.metrics);
            }
            Err(e) => {
                warn!("{} iteration {} failed: {}", scheme, i, e);
                failures += 1;
            }
        }
    }

    let count = samples.len().max(1) as f64;
    let average = |f: fn(&OperationMetrics) -> f64| samples.iter().map(f).sum::<f64>() / count;

    let report = SchemeReport {
        scheme,
        iterations,
        failures,
        key_generation_time: key_generation.as_secs_f64() * 1000.0 / count,
        encryption_time: average(|m| m.encryption_time),
        decryption_time: average(|m| m.decryption_time),
        original_size: message.len(),
        encrypted_size: average(|m| m.encrypted_size as f64).round() as usize,
        expansion_ratio: average(|m| m.expansion_ratio),
        strength: common::encryption::strength_score(scheme),
    };

    info!("{} completed:", scheme.display_name());
    info!("- Failures: {}/{}", report.failures, report.iterations);
    info!("- Average key generation: {:.3} ms", report.key_generation_time);
    info!("- Average encryption: {:.3} ms", report.encryption_time);
    info!("- Average decryption: {:.3} ms", report.decryption_time);
    info!(
        "- Size: {} -> {} bytes ({:.2}x)",
        report.original_size, report.encrypted_size, report.expansion_ratio
    );

    report
}
