//! Input validation shared by the client and product forms.
//!
//! Validation collects every failing field instead of stopping at the first,
//! so a form can flag all of them at once. Nothing is written until a form
//! validates cleanly.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    money::{PriceError, parse_price},
    postal::PostalCode,
};

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, e.g. `postal_code`.
    pub field: &'static str,

    /// Human readable reason.
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Failures in form order.
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` failed.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            Display::fmt(error, f)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field errors while a form is checked.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Trimmed `value`, flagging `field` when it is blank.
    pub(crate) fn required(&mut self, field: &'static str, value: &str) -> String {
        let value = value.trim();

        if value.is_empty() {
            self.reject(field, "is required");
        }

        value.to_string()
    }

    /// Parse a required field, flagging it with the parser's message on failure.
    pub(crate) fn parse<T, E: Display>(
        &mut self,
        field: &'static str,
        value: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Option<T> {
        if value.trim().is_empty() {
            self.reject(field, "is required");

            return None;
        }

        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                self.reject(field, error.to_string());

                None
            }
        }
    }

    pub(crate) fn postal_code(&mut self, field: &'static str, value: &str) -> Option<PostalCode> {
        self.parse(field, value, PostalCode::parse)
    }

    pub(crate) fn tax_id(&mut self, field: &'static str, value: &str) -> Option<TaxId> {
        self.parse(field, value, TaxId::parse)
    }

    pub(crate) fn email(&mut self, field: &'static str, value: &str) -> Option<String> {
        self.parse(field, value, parse_email)
    }

    pub(crate) fn price(&mut self, field: &'static str, value: &str) -> Option<u64> {
        match parse_price(value) {
            Ok(price) => Some(price),
            Err(PriceError::Missing) => {
                self.reject(field, "is required");

                None
            }
            Err(error) => {
                self.reject(field, error.to_string());

                None
            }
        }
    }

    /// Finish, returning `value` only when no field failed.
    pub(crate) fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(ValidationErrors(self.errors));
        }

        value().ok_or_else(ValidationErrors::default)
    }
}

/// A company tax id (CNPJ), normalised to `00.000.000/0000-00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId(String);

/// The input does not hold exactly fourteen digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tax id, expected 00.000.000/0000-00")]
pub struct InvalidTaxId;

impl TaxId {
    /// Parse a tax id with or without its mask.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaxId`] unless the input holds fourteen digits and
    /// nothing but mask punctuation besides them.
    pub fn parse(input: &str) -> Result<Self, InvalidTaxId> {
        let input = input.trim();

        if !input
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-'))
        {
            return Err(InvalidTaxId);
        }

        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != 14 {
            return Err(InvalidTaxId);
        }

        let mut masked = String::with_capacity(18);

        for (index, digit) in digits.chars().enumerate() {
            match index {
                2 | 5 => masked.push('.'),
                8 => masked.push('/'),
                12 => masked.push('-'),
                _ => {}
            }

            masked.push(digit);
        }

        Ok(Self(masked))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaxId {
    type Err = InvalidTaxId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TaxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
#[error("invalid email address")]
struct InvalidEmail;

/// Shape check only: one `@`, a non-empty local part, a dotted domain.
fn parse_email(input: &str) -> Result<String, InvalidEmail> {
    let input = input.trim();

    let Some((local, domain)) = input.split_once('@') else {
        return Err(InvalidEmail);
    };

    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');

    if local.is_empty() || !domain_ok || domain.contains('@') || input.contains(char::is_whitespace)
    {
        return Err(InvalidEmail);
    }

    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_id_is_normalised_with_mask() -> Result<(), InvalidTaxId> {
        assert_eq!(TaxId::parse("12345678000195")?.as_str(), "12.345.678/0001-95");
        assert_eq!(
            TaxId::parse("12.345.678/0001-95")?.as_str(),
            "12.345.678/0001-95"
        );

        Ok(())
    }

    #[test]
    fn tax_id_rejects_wrong_length_or_letters() {
        assert_eq!(TaxId::parse("1234567800019"), Err(InvalidTaxId));
        assert_eq!(TaxId::parse("12.345.678/0001-9X"), Err(InvalidTaxId));
    }

    #[test]
    fn email_shape() {
        assert!(parse_email("ana@example.com").is_ok());
        assert!(parse_email("ana@example").is_err());
        assert!(parse_email("@example.com").is_err());
        assert!(parse_email("ana@@example.com").is_err());
        assert!(parse_email("ana maria@example.com").is_err());
    }

    #[test]
    fn validator_collects_every_failing_field() {
        let mut validator = Validator::new();

        let name = validator.required("name", "   ");
        let postal_code = validator.postal_code("postal_code", "123");
        let price = validator.price("price", "");

        assert!(name.is_empty());
        assert!(postal_code.is_none());
        assert!(price.is_none());

        let errors = validator.finish(|| Some(())).err().unwrap_or_default();

        assert_eq!(errors.fields().len(), 3);
        assert!(errors.has("name"));
        assert!(errors.has("postal_code"));
        assert!(errors.has("price"));
        assert_eq!(
            errors.to_string(),
            "name: is required; postal_code: invalid postal code, expected 00000-000; \
             price: is required"
        );
    }

    #[test]
    fn validator_finishes_cleanly_without_errors() -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        let name = validator.required("name", " Ana ");
        let value = validator.finish(|| Some(name))?;

        assert_eq!(value, "Ana");

        Ok(())
    }
}
