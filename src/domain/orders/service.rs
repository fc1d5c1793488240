//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::orders::{
        data::{NewOrder, NewOrderItem},
        errors::OrdersServiceError,
        listing::OrderListing,
        models::{Order, OrderItemUuid, OrderStatus, OrderUuid},
        repositories::{SqliteOrderItemsRepository, SqliteOrdersRepository},
        totals::{OrderTotals, line_subtotal, selected_lines},
    },
};

#[derive(Debug, Clone)]
pub struct SqliteOrdersService {
    db: Db,
    orders_repository: SqliteOrdersRepository,
    items_repository: SqliteOrderItemsRepository,
}

impl SqliteOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: SqliteOrdersRepository::new(),
            items_repository: SqliteOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for SqliteOrdersService {
    async fn list_orders(&self, listing: OrderListing) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_read().await?;

        let orders = self.orders_repository.list_orders(&mut tx, &listing).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_read().await?;

        let mut order_model = self.orders_repository.get_order(&mut tx, order).await?;

        let items = self.items_repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        order_model.items.extend(items);

        Ok(order_model)
    }

    #[instrument(skip(self, order), fields(order = %order.uuid, client = %order.client))]
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let lines = selected_lines(&order.lines)?;

        if lines.is_empty() {
            return Err(OrdersServiceError::NoItemsSelected);
        }

        let mut tx = self.db.begin_write().await?;

        if !self
            .orders_repository
            .client_exists(&mut tx, order.client)
            .await?
        {
            return Err(OrdersServiceError::ClientNotFound);
        }

        let mut totals = OrderTotals::default();
        let mut items = Vec::with_capacity(lines.len());

        for (position, line) in lines.iter().enumerate() {
            let unit_price = self
                .items_repository
                .product_price(&mut tx, line.product)
                .await?
                .ok_or(OrdersServiceError::ProductNotFound(line.product))?;

            let subtotal = line_subtotal(line.quantity, unit_price)?;

            totals.add(line.quantity, subtotal)?;

            items.push(NewOrderItem {
                uuid: OrderItemUuid::new(),
                product: line.product,
                position: u32::try_from(position).map_err(|_err| OrdersServiceError::InvalidData)?,
                quantity: line.quantity,
                unit_price,
                subtotal,
            });
        }

        self.orders_repository
            .create_order(
                &mut tx,
                order.uuid,
                order.client,
                &totals,
                OrderStatus::Pending,
                Timestamp::now(),
            )
            .await?;

        for item in &items {
            self.items_repository
                .create_order_item(&mut tx, order.uuid, item)
                .await?;
        }

        let mut created = self.orders_repository.get_order(&mut tx, order.uuid).await?;

        let created_items = self
            .items_repository
            .get_order_items(&mut tx, order.uuid)
            .await?;

        tx.commit().await?;

        created.items.extend(created_items);

        info!(
            total_value = created.total_value,
            product_count = created.product_count,
            items = created.items.len(),
            "order created"
        );

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieves the orders matching a listing, without their items.
    async fn list_orders(&self, listing: OrderListing) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Places an order for the selected lines.
    ///
    /// Each item snapshots its product's current price. The order and every
    /// item are written in one transaction; on any error nothing is written.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;
}
