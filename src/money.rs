//! Prices
//!
//! Prices are stored as integer minor units (centavos). Form text is parsed
//! exactly through [`Decimal`] and rendered as BRL for display only.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors parsing a price typed into a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is required")]
    Missing,

    #[error("price is not a number")]
    NotANumber,

    #[error("price cannot be negative")]
    Negative,

    #[error("price has more than two decimal places")]
    TooPrecise,

    #[error("price is too large")]
    TooLarge,
}

/// Parse a price such as `49.90`, `49,90` or `1.234,56` into minor units.
///
/// When both separators appear, the last one is the decimal separator and
/// the other groups thousands.
///
/// # Errors
///
/// Returns a [`PriceError`] describing why the text is not a valid price.
pub fn parse_price(input: &str) -> Result<u64, PriceError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(PriceError::Missing);
    }

    let normalised = match (input.rfind(','), input.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => input.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => input.replace(',', ""),
        (Some(_), None) => input.replace(',', "."),
        _ => input.to_string(),
    };

    let price = Decimal::from_str_exact(&normalised).map_err(|_err| PriceError::NotANumber)?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }

    if price.normalize().scale() > 2 {
        return Err(PriceError::TooPrecise);
    }

    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_u64())
        .filter(|minor| i64::try_from(*minor).is_ok())
        .ok_or(PriceError::TooLarge)
}

/// Render minor units as editable form text, e.g. `49.90`.
pub fn price_input(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

/// Render minor units as a BRL amount, e.g. `R$49,90`.
pub fn format_price(minor: u64) -> String {
    let minor = i64::try_from(minor).unwrap_or(i64::MAX);

    Money::from_minor(minor, iso::BRL).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dot_and_comma_decimals() -> Result<(), PriceError> {
        assert_eq!(parse_price("49.90")?, 4990);
        assert_eq!(parse_price("49,90")?, 4990);
        assert_eq!(parse_price(" 29.9 ")?, 2990);
        assert_eq!(parse_price("0")?, 0);

        Ok(())
    }

    #[test]
    fn parses_grouped_thousands() -> Result<(), PriceError> {
        assert_eq!(parse_price("1.234,56")?, 123_456);
        assert_eq!(parse_price("1,234.56")?, 123_456);

        Ok(())
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() -> Result<(), PriceError> {
        assert_eq!(parse_price("10.500")?, 1050);

        Ok(())
    }

    #[test]
    fn rejects_invalid_prices() {
        assert_eq!(parse_price("  "), Err(PriceError::Missing));
        assert_eq!(parse_price("abc"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("-1.00"), Err(PriceError::Negative));
        assert_eq!(parse_price("1.999"), Err(PriceError::TooPrecise));
        assert_eq!(
            parse_price("99999999999999999999999"),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn form_text_parses_back_to_the_same_price() -> Result<(), PriceError> {
        assert_eq!(price_input(4990), "49.90");
        assert_eq!(price_input(5), "0.05");
        assert_eq!(parse_price(&price_input(123_456))?, 123_456);

        Ok(())
    }

    #[test]
    fn formats_as_brl() {
        let formatted = format_price(12_970);

        assert!(formatted.contains("R$"), "expected BRL symbol in {formatted}");
        assert!(formatted.contains("129"), "expected major units in {formatted}");
    }
}
