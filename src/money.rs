// Decimal token parsing and currency formatting

/// Parses a numeric token that may use either "." or "," as the decimal
/// separator. The "," form is normalized to "." before parsing.
///
/// Returns `None` for unparsable input; callers treat that as a recoverable
/// default rather than an error.
pub fn parse_amount(token: &str) -> Option<f64> {
    let normalized = token.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats an amount with exactly two fraction digits, "," as the decimal
/// separator and "." as the thousands separator: 1234.5 -> "1.234,50".
///
/// Pure formatting, independent of parsing. Currency symbol choice is left
/// to the renderer.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}", sign, grouped, fraction)
}
