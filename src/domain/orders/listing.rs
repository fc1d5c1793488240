//! Order listings.

use crate::{
    domain::orders::models::Order,
    query::{Column, Listing, RecordKind},
};

/// Order record kind.
#[derive(Debug)]
pub struct Orders;

/// Keys orders may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSort {
    /// Placement time.
    CreatedAt,
    /// Order total.
    TotalValue,
    /// Client name, ignoring ASCII case.
    ClientName,
}

impl Column for OrderSort {
    fn expr(self) -> &'static str {
        match self {
            Self::CreatedAt => "o.created_at",
            Self::TotalValue => "o.total_value",
            Self::ClientName => "c.name COLLATE NOCASE",
        }
    }
}

/// Fields orders may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    /// Name of the ordering client.
    ClientName,
    /// Client identifier; pair with [`crate::query::Value::Uuid`].
    Client,
    /// Stored status, e.g. `pending`.
    Status,
}

impl Column for OrderField {
    fn expr(self) -> &'static str {
        match self {
            Self::ClientName => "c.name",
            Self::Client => "o.client_uuid",
            Self::Status => "o.status",
        }
    }
}

impl RecordKind for Orders {
    type Record = Order;
    type SortKey = OrderSort;
    type Field = OrderField;

    const SELECT: &'static str = "SELECT o.uuid, o.client_uuid, c.name AS client_name, \
        o.total_value, o.product_count, o.status, o.created_at \
        FROM orders o JOIN clients c ON c.uuid = o.client_uuid";
}

/// Order listing.
pub type OrderListing = Listing<Orders>;
