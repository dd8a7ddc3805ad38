//! FILENAME: core/pivot-engine/src/format.rs
//! PURPOSE: Display formatting for aggregated cell values.
//! CONTEXT: The renderer shows numbers the way an en-US locale formats them:
//! thousands separators, at most three fraction digits, no trailing zeros.
//! Missing values show as "0".

/// Maximum fraction digits shown for a locale-formatted number.
const MAX_FRACTION_DIGITS: usize = 3;

/// Format a cell value for display. `None` renders as "0".
pub fn format_cell_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format_locale_number(v),
        None => "0".to_string(),
    }
}

/// Format a number with thousands separators and up to three decimals.
pub fn format_locale_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = format!("{:.prec$}", value, prec = MAX_FRACTION_DIGITS);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };

    let formatted = add_thousands_separator(trimmed);
    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        result.push('-');
    }

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}
