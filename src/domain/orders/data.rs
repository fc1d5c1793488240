//! Orders Data

use crate::domain::{
    clients::models::ClientUuid,
    orders::models::{OrderItemUuid, OrderUuid},
    products::models::ProductUuid,
};

/// A product and the quantity selected for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product: ProductUuid,
    pub quantity: u32,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub client: ClientUuid,
    /// Lines as selected. Zero quantities are dropped and repeated products
    /// merged before the order is placed.
    pub lines: Vec<OrderLine>,
}

/// An item ready to be written, with its price snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product: ProductUuid,
    pub position: u32,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
}
