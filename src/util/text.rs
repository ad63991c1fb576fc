use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// 千分位
const NUMBER_ESCAPE_CHAR: &[char] = &[','];

/// Parses a decimal value from a given string.
///
/// Thousands separators are removed before conversion. The cleaned text must
/// be a plain decimal number, otherwise an error naming the cleaned text is
/// returned.
///
/// # Example
///
/// ```
/// use firstrade_quote::util::text::parse_decimal;
///
/// let d = parse_decimal("1,234.56").unwrap();
/// assert_eq!(d.to_string(), "1234.56");
/// ```
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Removes the thousands separators from `s`.
pub(crate) fn clean_escape_chars(s: &str) -> String {
    s.chars().filter(|c| !NUMBER_ESCAPE_CHAR.contains(c)).collect()
}
