// Parsing and display helpers.
//
// Every number that ends up in a table or chart label passes through the
// formatters here, which turn missing or non-finite values into `N/A`.
use num_format::{Locale, ToFormattedString};
use std::num::ParseFloatError;

pub const NA: &str = "N/A";

const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "None"];

/// Parse a rate cell.
///
/// - `Ok(None)` for an absent cell or one of the usual missing-value tokens.
/// - Strips `$` and thousands separators before parsing.
/// - `Err` when the text is present but not a number.
/// - Non-finite results count as missing.
pub fn parse_rate(s: Option<&str>) -> Result<Option<f64>, ParseFloatError> {
    let Some(s) = s else { return Ok(None) };
    let s = s.trim();
    if MISSING_TOKENS.contains(&s) {
        return Ok(None);
    }
    let cleaned = s.replace(['$', ','], "");
    let v: f64 = cleaned.parse()?;
    Ok(if v.is_finite() { Some(v) } else { None })
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `1,234,567.89` style grouping on the integer part.
    if !n.is_finite() {
        return NA.to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_thousands(int_part);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // `-0.00` reads as zero.
    let is_zero = s.chars().all(|c| c == '0' || c == '.');
    if n.is_sign_negative() && !is_zero {
        format!("-{}", res)
    } else {
        res
    }
}

// Commas every three digits, from the right. Works on the digit string so
// magnitudes beyond any integer type keep their value.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_currency(n: f64, decimals: usize) -> String {
    let body = format_number(n, decimals);
    if body == NA {
        return body;
    }
    match body.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", body),
    }
}

pub fn format_currency_opt(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) => format_currency(v, decimals),
        None => NA.to_string(),
    }
}

pub fn format_percent(p: f64) -> String {
    if !p.is_finite() {
        return NA.to_string();
    }
    format!("{:.1}%", p)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Shorten to `max_chars` characters followed by `...`.
pub fn truncate_display(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rate_handles_missing_tokens() {
        assert_eq!(parse_rate(None), Ok(None));
        assert_eq!(parse_rate(Some("")), Ok(None));
        assert_eq!(parse_rate(Some(" NaN ")), Ok(None));
        assert_eq!(parse_rate(Some("N/A")), Ok(None));
        assert_eq!(parse_rate(Some("inf")), Ok(None));
    }

    #[test]
    fn parse_rate_strips_currency() {
        assert_eq!(parse_rate(Some("$1,250.50")), Ok(Some(1250.5)));
        assert_eq!(parse_rate(Some("300")), Ok(Some(300.0)));
    }

    #[test]
    fn parse_rate_rejects_text() {
        assert!(parse_rate(Some("twelve")).is_err());
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234567.891, 2), "$1,234,567.89");
        assert_eq!(format_currency(999.7, 0), "$1,000");
        assert_eq!(format_currency(-12.0, 2), "-$12.00");
        assert_eq!(format_currency(f64::NAN, 2), NA);
        assert_eq!(format_currency_opt(None, 2), NA);
    }

    #[test]
    fn huge_values_keep_their_digits() {
        assert_eq!(format_currency(1e20, 0), "$100,000,000,000,000,000,000");
        assert_eq!(format_currency(-3e19, 2), "-$30,000,000,000,000,000,000.00");
        assert_eq!(format_number(123.0, 0), "123");
        assert_eq!(format_number(1234.0, 0), "1,234");
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn percent_and_truncation() {
        assert_eq!(format_percent(200.0 / 3.0), "66.7%");
        assert_eq!(truncate_display("Short", 20), "Short");
        assert_eq!(truncate_display("Twenty Characters Ok", 20), "Twenty Characters Ok");
        assert_eq!(
            truncate_display("Rancho Santa Margarita", 20),
            "Rancho Santa Margari..."
        );
    }
}
