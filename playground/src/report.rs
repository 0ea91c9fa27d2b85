use common::encryption::{OperationMetrics, TAMPER_SENTINEL};
use common::Scheme;
use serde::Serialize;

const BAR_WIDTH: usize = 30;
const PREVIEW_CHARS: usize = 72;

/// Outcome of one keys/encrypt/decrypt run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub scheme: Scheme,
    pub message: String,
    pub encrypted_message: String,
    pub decrypted_message: String,
    pub simulate_tamper: bool,
    pub metrics: OperationMetrics,
}

impl Exchange {
    pub fn tampered(&self) -> bool {
        self.decrypted_message == TAMPER_SENTINEL
    }

    pub fn round_trip_ok(&self) -> bool {
        self.tampered() || self.decrypted_message == self.message
    }
}

/// `[#####.....]` filled to `percent` of the width, clamped to 0..=100.
pub fn bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// First `max` characters, with a marker when something was cut.
pub fn preview(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', "⏎");
    let mut chars = single_line.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}… ({} bytes)", head, text.len())
    } else {
        head
    }
}

pub fn format_exchange(exchange: &Exchange) -> String {
    let m = &exchange.metrics;
    let mut out = String::new();

    out.push_str(&format!("── {} ──\n", exchange.scheme.display_name()));
    out.push_str(&format!("Original:   {}\n", preview(&exchange.message, PREVIEW_CHARS)));
    out.push_str(&format!(
        "Encrypted:  {}\n",
        preview(&exchange.encrypted_message, PREVIEW_CHARS)
    ));
    out.push_str(&format!(
        "Decrypted:  {}\n",
        preview(&exchange.decrypted_message, PREVIEW_CHARS)
    ));
    if exchange.tampered() {
        out.push_str("            (man-in-the-middle simulation was on)\n");
    }
    if !exchange.scheme.is_confidential() {
        out.push_str("            note: this envelope can be opened without the private key\n");
    }

    out.push('\n');
    out.push_str(&format!(
        "Encryption Time      {:>10.2} ms  {}\n",
        m.encryption_time,
        bar(m.encryption_time / 10.0)
    ));
    out.push_str(&format!(
        "Decryption Time      {:>10.2} ms  {}\n",
        m.decryption_time,
        bar(m.decryption_time / 10.0)
    ));
    let size_percent = if m.encrypted_size > 0 {
        m.original_size as f64 / m.encrypted_size as f64 * 100.0
    } else {
        0.0
    };
    out.push_str(&format!(
        "Size Comparison  {:>6} B → {:>5} B  {}\n",
        m.original_size,
        m.encrypted_size,
        bar(size_percent)
    ));
    out.push_str(&format!(
        "Encryption Strength     {:>3}/100  {}\n",
        m.strength,
        bar(m.strength as f64)
    ));
    out
}
