//! Error rates can be `+inf` (empty reference, non-empty hypothesis).
//! JSON has no infinity, so rates go through these helpers instead of
//! letting `serde_json` quietly write `null`.

use serde::Serializer;

pub const INFINITE_RATE_LABEL: &str = "inf";

pub fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rate.is_finite() {
        serializer.serialize_f64(*rate)
    } else {
        serializer.serialize_str(INFINITE_RATE_LABEL)
    }
}

/// Formats a rate as a percentage with two decimals, or `∞`.
pub fn format_percent(rate: f64) -> String {
    if rate.is_finite() {
        format!("{:.2}%", rate * 100.0)
    } else {
        "∞".to_string()
    }
}
