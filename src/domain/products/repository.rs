//! Products Repository

use jiff::Timestamp;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::{
    database::columns::{
        encode_amount, encode_timestamp, try_get_amount, try_get_optional_timestamp,
        try_get_timestamp,
    },
    domain::products::{
        data::ProductDetails,
        listing::ProductListing,
        models::{Product, ProductUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteProductsRepository;

impl SqliteProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        listing: &ProductListing,
    ) -> Result<Vec<Product>, sqlx::Error> {
        listing.fetch_all(tx).await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Sqlite, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a product, assigning the next code in the same statement.
    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductUuid,
        details: &ProductDetails,
        now: Timestamp,
    ) -> Result<Product, sqlx::Error> {
        let price_i64 = encode_amount(details.price)?;

        query_as::<Sqlite, Product>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&details.name)
            .bind(price_i64)
            .bind(&details.description)
            .bind(details.image_uri.as_deref())
            .bind(encode_timestamp(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductUuid,
        details: &ProductDetails,
        now: Timestamp,
    ) -> Result<Product, sqlx::Error> {
        let price_i64 = encode_amount(details.price)?;

        query_as::<Sqlite, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&details.name)
            .bind(price_i64)
            .bind(&details.description)
            .bind(details.image_uri.as_deref())
            .bind(encode_timestamp(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductUuid,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(encode_timestamp(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let code_i64: i64 = row.try_get("code")?;

        let code = u64::try_from(code_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "code".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            code,
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            description: row.try_get("description")?,
            image_uri: row.try_get("image_uri")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
            deleted_at: try_get_optional_timestamp(row, "deleted_at")?,
        })
    }
}
