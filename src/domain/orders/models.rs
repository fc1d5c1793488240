//! Order Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{clients::models::ClientUuid, products::models::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Shown in place of the name of a product that has since been deleted.
pub const DELETED_PRODUCT_NAME: &str = "(deleted product)";

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    /// Placed and awaiting delivery. Every new order starts here.
    #[default]
    Pending,

    /// Handed over to the client.
    Delivered,

    /// Called off; kept for history.
    Cancelled,
}

/// A stored status string that no [`OrderStatus`] matches.
#[derive(Debug, Error)]
#[error("unknown order status {0:?}")]
pub struct UnknownOrderStatus(String);

impl OrderStatus {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Order Model
///
/// Listings leave `items` empty; a single order lookup fills them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub client_uuid: ClientUuid,
    /// Name of the client at read time.
    pub client_name: String,
    /// Sum of item subtotals, in minor units.
    pub total_value: u64,
    /// Sum of item quantities.
    pub product_count: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub items: Vec<OrderItem>,
}

/// OrderItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    /// `None` once the product has been deleted.
    pub product_code: Option<u64>,
    /// `None` once the product has been deleted.
    pub product_name: Option<String>,
    /// Zero-based place in the order.
    pub position: u32,
    pub quantity: u32,
    /// Product price when the order was placed, in minor units.
    pub unit_price: u64,
    /// `quantity * unit_price`, in minor units.
    pub subtotal: u64,
}

impl OrderItem {
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(DELETED_PRODUCT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() -> Result<(), UnknownOrderStatus> {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("Pendente".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn deleted_product_falls_back_to_placeholder_name() {
        let item = OrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::new(),
            product_code: None,
            product_name: None,
            position: 0,
            quantity: 1,
            unit_price: 100,
            subtotal: 100,
        };

        assert_eq!(item.display_name(), DELETED_PRODUCT_NAME);
    }
}
