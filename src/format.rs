//! Display formatting for dashboard metrics.

/// Shown in place of a mean (or any ratio) over an empty selection.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format with `decimals` fraction digits and comma thousands separators.
///
/// `thousands(1234567.891, 2)` gives `"1,234,567.89"`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// US dollars with cents: `$1,234.56`.
pub fn dollars(value: f64) -> String {
    format!("${}", thousands(value, 2))
}

/// Indonesian rupiah without fraction: `Rp 300,000,000`.
pub fn rupiah(value: f64) -> String {
    format!("Rp {}", thousands(value, 0))
}

pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Format a possibly missing value, falling back to [`NOT_AVAILABLE`].
pub fn or_placeholder(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
