//! Rounding helpers for log output.
//!
//! The wire sends values at full precision; these exist only so log lines
//! read well. Nothing here feeds back into the encoder.

/// Latency with one decimal: `"25.5ms"`, `"-"` when absent.
pub fn format_latency(ms: Option<f64>) -> String {
    match ms {
        Some(value) => format!("{:.1}ms", value),
        None => "-".to_string(),
    }
}

/// Loss percentage with one decimal: `"30.0%"`.
pub fn format_loss(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// `"up"` / `"down"` from the binary status flag.
pub fn format_status(status: u8) -> &'static str {
    if status == 1 { "up" } else { "down" }
}
