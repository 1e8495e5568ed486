//! Movement validation rules.
//!
//! Every rule here runs before any write; a movement that fails validation
//! never reaches the movement store.

use rust_decimal::Decimal;
use std::str::FromStr;

use kakebo_shared::types::CycleTag;
use kakebo_shared::types::money::CURRENCY_SCALE;

use super::error::LedgerError;

/// Validates a monetary movement amount.
///
/// Amounts are positive magnitudes with at most 2 decimal places; the sign
/// of a movement's effect comes from its kind, never from the amount.
///
/// # Errors
///
/// Returns `NegativeAmount` or `ExcessivePrecision`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount(amount));
    }
    if amount.scale() > CURRENCY_SCALE {
        return Err(LedgerError::ExcessivePrecision(amount));
    }
    Ok(())
}

/// Validates a cashback rate value.
///
/// # Errors
///
/// Returns `NegativeRate` for negative values.
pub fn validate_rate(value: Decimal) -> Result<(), LedgerError> {
    if value.is_sign_negative() {
        return Err(LedgerError::NegativeRate(value));
    }
    Ok(())
}

/// Validates a cycle tag string against the `YYYY-MM` shape.
///
/// # Errors
///
/// Returns `InvalidCycleTag` if the string does not parse.
pub fn validate_cycle_tag(tag: &str) -> Result<CycleTag, LedgerError> {
    CycleTag::from_str(tag).map_err(|_| LedgerError::InvalidCycleTag(tag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(0.01))]
    #[case(dec!(1200.00))]
    #[case(dec!(99999999.99))]
    fn test_valid_amounts(#[case] amount: Decimal) {
        assert!(validate_amount(amount).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert_eq!(
            validate_amount(dec!(-0.01)),
            Err(LedgerError::NegativeAmount(dec!(-0.01)))
        );
    }

    #[test]
    fn test_excess_precision_rejected() {
        assert_eq!(
            validate_amount(dec!(1.234)),
            Err(LedgerError::ExcessivePrecision(dec!(1.234)))
        );
    }

    #[test]
    fn test_rate_validation() {
        assert!(validate_rate(dec!(5.0)).is_ok());
        assert!(validate_rate(dec!(0)).is_ok());
        assert_eq!(
            validate_rate(dec!(-1)),
            Err(LedgerError::NegativeRate(dec!(-1)))
        );
    }

    #[rstest]
    #[case("2025-09")]
    #[case("2024-01")]
    #[case("1999-12")]
    fn test_valid_cycle_tags(#[case] tag: &str) {
        assert!(validate_cycle_tag(tag).is_ok());
    }

    #[rstest]
    #[case("2025-13")]
    #[case("2025-9")]
    #[case("sep-2025")]
    #[case("")]
    fn test_invalid_cycle_tags(#[case] tag: &str) {
        assert!(matches!(
            validate_cycle_tag(tag),
            Err(LedgerError::InvalidCycleTag(_))
        ));
    }
}
