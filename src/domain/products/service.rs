//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductDetails},
        errors::ProductsServiceError,
        listing::ProductListing,
        models::{Product, ProductUuid},
        repository::SqliteProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct SqliteProductsService {
    db: Db,
    repository: SqliteProductsRepository,
}

impl SqliteProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for SqliteProductsService {
    async fn list_products(
        &self,
        listing: ProductListing,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin_read().await?;

        let products = self.repository.list_products(&mut tx, &listing).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_read().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(product = %product.uuid))]
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let created = self
            .repository
            .create_product(&mut tx, product.uuid, &product.details, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(code = created.code, "product created");

        Ok(created)
    }

    #[instrument(skip(self, details))]
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &details, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let rows_affected = self
            .repository
            .delete_product(&mut tx, product, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("product deleted");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves the products matching a listing.
    async fn list_products(
        &self,
        listing: ProductListing,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product with the next sequential code.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces a product's details. Existing order items keep the price
    /// they were placed at.
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product. Its code is not handed out again.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
