//! Address autofill.
//!
//! A form field may fire a lookup on every edit. Responses can arrive out of
//! order, so each lookup takes a token and its response is applied only while
//! that token is still the latest one issued for the field.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::{Address, PostalCode, PostalCodeLookup};

/// Identifies one lookup issued for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupToken(u64);

/// Tracks the latest token issued for a single field.
#[derive(Debug, Default)]
pub struct LatestRequest {
    latest: AtomicU64,
}

impl LatestRequest {
    /// Issue a token that supersedes every earlier one.
    pub fn issue(&self) -> LookupToken {
        LookupToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `token` is still the latest issued.
    pub fn is_current(&self, token: LookupToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}

/// Fills address fields from a postal code, discarding stale responses.
#[derive(Debug)]
pub struct AddressAutofill<L> {
    lookup: L,
    latest: LatestRequest,
}

impl<L: PostalCodeLookup> AddressAutofill<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            latest: LatestRequest::default(),
        }
    }

    /// Resolve `code` to an address.
    ///
    /// Returns `None` when the lookup fails or a newer lookup was started
    /// before this one finished. Failures are logged, never returned.
    pub async fn resolve(&self, code: &PostalCode) -> Option<Address> {
        let token = self.latest.issue();

        let result = self.lookup.lookup(code).await;

        if !self.latest.is_current(token) {
            debug!(%code, "discarding superseded postal code lookup");

            return None;
        }

        match result {
            Ok(address) => Some(address),
            Err(error) => {
                debug!(%code, %error, "postal code lookup failed");

                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use testresult::TestResult;
    use tokio::sync::Notify;

    use crate::postal::{LookupError, MockPostalCodeLookup};

    use super::*;

    fn address(city: &str) -> Address {
        Address {
            street: "Rua Um".to_string(),
            neighborhood: "Centro".to_string(),
            city: city.to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn later_tokens_supersede_earlier_ones() {
        let latest = LatestRequest::default();

        let first = latest.issue();
        assert!(latest.is_current(first));

        let second = latest.issue();
        assert!(!latest.is_current(first), "first token should be stale");
        assert!(latest.is_current(second));
    }

    #[tokio::test]
    async fn resolve_returns_address_from_lookup() -> TestResult {
        let mut lookup = MockPostalCodeLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Ok(address("São Paulo")));

        let autofill = AddressAutofill::new(lookup);

        let resolved = autofill.resolve(&PostalCode::parse("01310-100")?).await;

        assert_eq!(resolved, Some(address("São Paulo")));

        Ok(())
    }

    #[tokio::test]
    async fn resolve_swallows_lookup_failures() -> TestResult {
        let mut lookup = MockPostalCodeLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(LookupError::NotFound));

        let autofill = AddressAutofill::new(lookup);

        let resolved = autofill.resolve(&PostalCode::parse("99999-999")?).await;

        assert_eq!(resolved, None);

        Ok(())
    }

    /// Holds the lookup for `slow` until any other code has been looked up.
    struct OutOfOrderLookup {
        slow: PostalCode,
        released: Notify,
    }

    #[async_trait]
    impl PostalCodeLookup for OutOfOrderLookup {
        async fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError> {
            if *code == self.slow {
                self.released.notified().await;

                Ok(address("Stale"))
            } else {
                self.released.notify_one();

                Ok(address("Fresh"))
            }
        }
    }

    #[tokio::test]
    async fn earlier_lookup_finishing_last_is_discarded() -> TestResult {
        let slow = PostalCode::parse("01310-100")?;
        let fast = PostalCode::parse("20040-020")?;

        let autofill = AddressAutofill::new(OutOfOrderLookup {
            slow: slow.clone(),
            released: Notify::new(),
        });

        let (stale, fresh) = tokio::join!(autofill.resolve(&slow), autofill.resolve(&fast));

        assert_eq!(stale, None, "superseded response should be dropped");
        assert_eq!(fresh, Some(address("Fresh")));

        Ok(())
    }
}
