// Number formatting for console output.
//
// Cutoff scores and invitation totals are shown the way the IRCC pages show
// them: thousands separators, fixed decimals, and "N/A" for anything that
// could not be computed.
use num_format::{Locale, ToFormattedString};

/// Placeholder for a metric that is undefined over the current selection.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    // Use `num-format` to insert commas into the integer portion.
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Like [`format_number`], but an undefined metric renders as `N/A` instead of `0`.
pub fn format_optional(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) => format_number(v, decimals),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values such as
    // invitation totals (e.g., `12,345 invitations`).
    n.to_formatted_string(&Locale::en)
}
