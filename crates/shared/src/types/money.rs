//! Fixed-point money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal` rounded to 2 decimal
//! places; percentage rates carry 4.

use rust_decimal::Decimal;

/// Decimal places carried by currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Decimal places carried by percentage rates.
pub const RATE_SCALE: u32 = 4;

/// Rounds a currency amount to 2 decimal places (banker-free, half-up).
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp(CURRENCY_SCALE)
}

/// Rounds a percentage rate to 4 decimal places.
#[must_use]
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp(RATE_SCALE)
}

/// Serializes a currency amount as a fixed-point string with exactly
/// 2 fractional digits.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = round_currency(amount);
    rounded.rescale(CURRENCY_SCALE);
    rounded.to_string()
}

/// Serializes a percentage rate as a fixed-point string with exactly
/// 4 fractional digits.
#[must_use]
pub fn format_rate(rate: Decimal) -> String {
    let mut rounded = round_rate(rate);
    rounded.rescale(RATE_SCALE);
    rounded.to_string()
}

/// Parses a currency amount from a decimal string.
///
/// # Errors
///
/// Returns an error if the string is not a valid decimal number or carries
/// more than 2 fractional digits.
pub fn parse_currency(s: &str) -> Result<Decimal, String> {
    let amount: Decimal = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid amount: {s}"))?;

    if amount.scale() > CURRENCY_SCALE {
        return Err(format!("Amount has more than 2 decimal places: {s}"));
    }

    Ok(round_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(dec!(4.125)), dec!(4.13));
        assert_eq!(round_currency(dec!(4.124)), dec!(4.12));
        assert_eq!(round_currency(dec!(4)), dec!(4));
    }

    #[test]
    fn test_format_currency_always_two_digits() {
        assert_eq!(format_currency(dec!(4)), "4.00");
        assert_eq!(format_currency(dec!(4.1)), "4.10");
        assert_eq!(format_currency(dec!(1200)), "1200.00");
        assert_eq!(format_currency(dec!(0)), "0.00");
    }

    #[test]
    fn test_format_rate_always_four_digits() {
        assert_eq!(format_rate(dec!(5)), "5.0000");
        assert_eq!(format_rate(dec!(2.5)), "2.5000");
    }

    #[test]
    fn test_parse_currency_valid() {
        assert_eq!(parse_currency("4.12").unwrap(), dec!(4.12));
        assert_eq!(parse_currency(" 1200.00 ").unwrap(), dec!(1200.00));
        assert_eq!(parse_currency("0").unwrap(), dec!(0));
    }

    #[test]
    fn test_parse_currency_rejects_garbage() {
        assert!(parse_currency("abc").is_err());
        assert!(parse_currency("").is_err());
        assert!(parse_currency("1.2.3").is_err());
    }

    #[test]
    fn test_parse_currency_rejects_excess_scale() {
        assert!(parse_currency("1.234").is_err());
    }
}
