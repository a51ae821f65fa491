//! Lenient numeric input.
//!
//! Areas, rates and coordinates arrive as free text. Anything that cannot be
//! read as a number becomes `0.0`; a zero value is degenerate but valid and
//! flows through valuation and settlement like any other.

use serde::{Deserialize, Deserializer};

/// Parse a user-entered amount.
///
/// Surrounding whitespace and thousands separators are ignored, and the
/// longest numeric prefix wins, so `"1,500 sqft"` reads as `1500.0`.
/// Empty, unparsable and non-finite input yields `0.0`.
pub fn parse_amount(s: &str) -> f64 {
    let cleaned: String = s.trim().chars().filter(|&c| c != ',').collect();

    let bytes = cleaned.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'+' | b'-' if i == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[i - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
    }

    if !seen_digit {
        return 0.0;
    }

    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Serde adapter accepting a number, a numeric string, or null.
///
/// Use with `#[serde(default, deserialize_with = "lenient_f64")]`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) if n.is_finite() => n,
        Some(NumberOrText::Text(s)) => parse_amount(&s),
        _ => 0.0,
    })
}

/// Like [`lenient_f64`] but keeps absence distinguishable.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Number(_)) => Some(0.0),
        Some(NumberOrText::Text(s)) => Some(parse_amount(&s)),
        None => None,
    })
}
