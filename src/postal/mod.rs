//! Postal code lookup and address autofill.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

mod autofill;
mod viacep;

pub use autofill::{AddressAutofill, LatestRequest, LookupToken};
pub use viacep::{ViaCepClient, ViaCepConfig};

/// A Brazilian postal code (CEP), normalised to `00000-000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

/// The input is not an eight digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid postal code, expected 00000-000")]
pub struct InvalidPostalCode;

impl PostalCode {
    /// Parse `00000-000` or `00000000`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPostalCode`] for anything else.
    pub fn parse(input: &str) -> Result<Self, InvalidPostalCode> {
        let input = input.trim();

        let digits: String = match input.split_once('-') {
            Some((head, tail)) if head.len() == 5 && tail.len() == 3 => {
                format!("{head}{tail}")
            }
            Some(_) => return Err(InvalidPostalCode),
            None => input.to_string(),
        };

        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPostalCode);
        }

        let (head, tail) = digits.split_at(5);

        Ok(Self(format!("{head}-{tail}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The eight digits without the hyphen.
    pub fn digits(&self) -> String {
        self.0.replace('-', "")
    }
}

impl FromStr for PostalCode {
    type Err = InvalidPostalCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PostalCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Address fields resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Errors raised by a postal code lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service does not know the postal code.
    #[error("postal code not found")]
    NotFound,

    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status or an unexpected body.
    #[error("unexpected response from postal code service: {0}")]
    UnexpectedResponse(String),
}

/// Resolves postal codes to addresses.
#[automock]
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Look up the address for `code`.
    async fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_masked_and_bare_codes() -> Result<(), InvalidPostalCode> {
        assert_eq!(PostalCode::parse("01310-100")?.as_str(), "01310-100");
        assert_eq!(PostalCode::parse(" 01310100 ")?.as_str(), "01310-100");

        Ok(())
    }

    #[test]
    fn digits_strip_the_hyphen() -> Result<(), InvalidPostalCode> {
        assert_eq!(PostalCode::parse("01310-100")?.digits(), "01310100");

        Ok(())
    }

    #[test]
    fn rejects_malformed_codes() {
        for input in ["", "0131-0100", "01310-10", "0131010", "013101000", "01310-1O0", "abcde-fgh"] {
            assert_eq!(
                PostalCode::parse(input),
                Err(InvalidPostalCode),
                "{input:?} should be rejected"
            );
        }
    }
}
