//! Formatting helpers shared by the VM and the output layer.

/// Formats a double the way the snippet language prints it.
///
/// Integral values drop the fraction (`3.0` prints as `3`), non-finite
/// values use their spelled-out names.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        // Avoid printing `-0`.
        return "0".to_owned();
    }
    format!("{value}")
}
