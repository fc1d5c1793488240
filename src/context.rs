//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;

use crate::{
    database::{StoreError, StoreHandle},
    domain::{
        clients::{ClientsService, SqliteClientsService},
        orders::{OrdersService, SqliteOrdersService},
        products::{ProductsService, SqliteProductsService},
    },
};

/// Errors raised while building the [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The store could not be acquired.
    #[error("failed to open store")]
    Store(#[from] StoreError),
}

/// Services wired to one opened store.
#[derive(Clone)]
pub struct AppContext {
    /// Handle the services were opened from; released by [`AppContext::close`].
    pub store: Arc<StoreHandle>,
    pub clients: Arc<dyn ClientsService>,
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Acquire the store and build every service on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be opened.
    pub async fn open(store: Arc<StoreHandle>) -> Result<Self, AppInitError> {
        let db = store.acquire().await?;

        Ok(Self {
            clients: Arc::new(SqliteClientsService::new(db.as_ref().clone())),
            products: Arc::new(SqliteProductsService::new(db.as_ref().clone())),
            orders: Arc::new(SqliteOrdersService::new(db.as_ref().clone())),
            store,
        })
    }

    /// Release the store.
    ///
    /// # Errors
    ///
    /// Returns an error while writes are still in flight.
    pub async fn close(&self) -> Result<(), StoreError> {
        self.store.release().await
    }
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::products::listing::ProductListing, test::TestDb};

    use super::*;

    #[tokio::test]
    async fn open_acquires_the_shared_store() -> TestResult {
        let test_db = TestDb::new();
        let store = Arc::new(StoreHandle::new(test_db.config()));

        let ctx = AppContext::open(Arc::clone(&store)).await?;
        let again = AppContext::open(Arc::clone(&store)).await?;

        assert_eq!(store.open_count(), 1);

        let products = again.products.list_products(ProductListing::new()).await?;

        assert!(products.is_empty());

        ctx.close().await?;

        assert!(!store.is_open().await);

        Ok(())
    }
}
