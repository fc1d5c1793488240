//! Order Items Repository

use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::{
    database::columns::{encode_amount, try_get_amount, try_get_quantity},
    domain::{
        orders::{
            data::NewOrderItem,
            models::{OrderItem, OrderItemUuid, OrderUuid},
        },
        products::models::ProductUuid,
    },
};

const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_PRODUCT_PRICE_SQL: &str = include_str!("../sql/get_product_price.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteOrderItemsRepository;

impl SqliteOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Sqlite, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Current price of a live product, `None` when missing or deleted.
    pub(crate) async fn product_price(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductUuid,
    ) -> Result<Option<u64>, sqlx::Error> {
        let row = query(GET_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| try_get_amount(&row, "price")).transpose()
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
        item: &NewOrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product.into_uuid())
            .bind(i64::from(item.position))
            .bind(i64::from(item.quantity))
            .bind(encode_amount(item.unit_price)?)
            .bind(encode_amount(item.subtotal)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, SqliteRow> for OrderItem {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let product_code = row
            .try_get::<Option<i64>, _>("product_code")?
            .map(u64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "product_code".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_code,
            product_name: row.try_get("product_name")?,
            position: try_get_quantity(row, "position")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            subtotal: try_get_amount(row, "subtotal")?,
        })
    }
}
