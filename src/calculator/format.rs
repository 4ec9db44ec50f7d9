//! Number formatting for the display and the formula trace.

use serde::{Deserialize, Serialize};

use super::error::CalcError;

/// Maximum fractional digits shown in the display.
pub const MAX_FRACTION_DIGITS: usize = 2;

/// Separators used when rendering numbers for people.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberLocale {
    pub group_separator: String,
    pub decimal_separator: String,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Format display text with thousand separators and at most two decimals.
///
/// Non-numeric input renders as `"0"`.
pub fn format_display(value: &str, locale: &NumberLocale) -> String {
    try_format_display(value, locale).unwrap_or_else(|_| "0".to_string())
}

/// Like [`format_display`], but reports non-numeric input.
pub fn try_format_display(value: &str, locale: &NumberLocale) -> Result<String, CalcError> {
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| CalcError::Format(value.to_string()))?;

    if !number.is_finite() {
        return Err(CalcError::Format(value.to_string()));
    }

    Ok(format_grouped(number, locale))
}

/// Format a number with grouping, rounded to two decimals, trailing zeros trimmed.
pub fn format_grouped(value: f64, locale: &NumberLocale) -> String {
    let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (trimmed, None),
    };

    let mut result = group_digits(int_part, &locale.group_separator);
    if let Some(frac) = frac_part {
        result.push_str(&locale.decimal_separator);
        result.push_str(frac);
    }

    // Values that round to zero lose their sign.
    if value.is_sign_negative() && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Insert a separator every three digits, counting from the right.
fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push_str(&separator.chars().rev().collect::<String>());
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a number as plain decimal text for the formula and the display.
///
/// Uses the shortest text that parses back to the same value, with no
/// grouping and no exponent. Negative zero renders as `"0"`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Label shown under the display, e.g. `"Your balance: $24,757.22 (available)"`.
pub fn format_balance(balance: f64, locale: &NumberLocale) -> String {
    format!(
        "Your balance: ${} (available)",
        format_grouped(balance, locale)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> NumberLocale {
        NumberLocale::default()
    }

    #[test]
    fn test_thousand_separators() {
        assert_eq!(format_display("1000000", &en()), "1,000,000");
        assert_eq!(format_display("12378.61", &en()), "12,378.61");
        assert_eq!(format_display("999", &en()), "999");
        assert_eq!(format_display("-1234.5", &en()), "-1,234.5");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(format_display("0.333333", &en()), "0.33");
        assert_eq!(format_display("2.50", &en()), "2.5");
        assert_eq!(format_display("1.999", &en()), "2");
        assert_eq!(format_display("-0.001", &en()), "0");
    }

    #[test]
    fn test_partial_input() {
        assert_eq!(format_display("0.", &en()), "0");
        assert_eq!(format_display("12.", &en()), "12");
        assert_eq!(format_display("0", &en()), "0");
    }

    #[test]
    fn test_non_numeric_input() {
        assert_eq!(format_display("Error", &en()), "0");
        assert_eq!(format_display("", &en()), "0");
        assert_eq!(
            try_format_display("abc", &en()),
            Err(CalcError::Format("abc".to_string()))
        );
        assert!(try_format_display("inf", &en()).is_err());
    }

    #[test]
    fn test_custom_locale() {
        let de = NumberLocale {
            group_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        };
        assert_eq!(format_display("24757.22", &de), "24.757,22");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(12378.61), "12378.61");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_balance_label() {
        assert_eq!(
            format_balance(24757.22, &en()),
            "Your balance: $24,757.22 (available)"
        );
    }
}
