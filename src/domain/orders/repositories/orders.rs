//! Orders Repository

use jiff::Timestamp;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, query_scalar, sqlite::SqliteRow};

use crate::{
    database::columns::{encode_amount, encode_timestamp, try_get_amount, try_get_timestamp},
    domain::{
        clients::models::ClientUuid,
        orders::{
            listing::OrderListing,
            models::{Order, OrderStatus, OrderUuid},
            totals::OrderTotals,
        },
    },
};

const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const CLIENT_EXISTS_SQL: &str = include_str!("../sql/client_exists.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteOrdersRepository;

impl SqliteOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        listing: &OrderListing,
    ) -> Result<Vec<Order>, sqlx::Error> {
        listing.fetch_all(tx).await
    }

    /// Order header, without items.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Sqlite, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn client_exists(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        client: ClientUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Sqlite, bool>(CLIENT_EXISTS_SQL)
            .bind(client.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
        client: ClientUuid,
        totals: &OrderTotals,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(client.into_uuid())
            .bind(encode_amount(totals.total_value)?)
            .bind(encode_amount(totals.product_count)?)
            .bind(status.as_str())
            .bind(encode_timestamp(now))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let status: &str = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            client_uuid: ClientUuid::from_uuid(row.try_get("client_uuid")?),
            client_name: row.try_get("client_name")?,
            total_value: try_get_amount(row, "total_value")?,
            product_count: try_get_amount(row, "product_count")?,
            status,
            created_at: try_get_timestamp(row, "created_at")?,
            items: Vec::new(),
        })
    }
}
