//! Brazilian amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::BRL_THOUSANDS;

/// Parse a Brazilian-formatted amount (e.g., "1.234,56", "50,73" or "1234.56").
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // "1.234,56" and "50,73": comma is the decimal separator
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), None) => cleaned.replace(',', "."),
        // "1,234.56": foreign format, comma groups thousands
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // "1.234" groups thousands, "50.73" is a decimal point
        (None, Some(_)) if BRL_THOUSANDS.is_match(&cleaned) => cleaned.replace('.', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Format amount in Brazilian style (1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2).abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
