//! Human-readable output formatting.
//!
//! The --json paths never go through here: JSON commands print exactly
//! one JSON value on stdout and nothing else.

use nestcalc_config::settings::OutputSettings;

/// Format a monetary value with thousands separators, e.g. `$2,572.62`.
/// Negative values render as `-$1,234.56`.
pub fn currency(value: f64, settings: &OutputSettings) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let formatted = format!("{:.*}", settings.decimal_places, abs);

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}{}.{}", sign, settings.currency_symbol, grouped, frac),
        None => format!("{}{}{}", sign, settings.currency_symbol, grouped),
    }
}

/// Format a percentage, e.g. `8.10%`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}
