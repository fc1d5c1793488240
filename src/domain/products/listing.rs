//! Product listings.

use crate::{
    domain::products::models::Product,
    query::{Column, Listing, RecordKind},
};

/// Product record kind.
#[derive(Debug)]
pub struct Products;

/// Keys products may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    /// Name, ignoring ASCII case.
    Name,
    /// Price in minor units.
    Price,
    /// Sequential product code.
    Code,
    /// Registration time.
    CreatedAt,
}

impl Column for ProductSort {
    fn expr(self) -> &'static str {
        match self {
            Self::Name => "p.name COLLATE NOCASE",
            Self::Price => "p.price",
            Self::Code => "p.code",
            Self::CreatedAt => "p.created_at",
        }
    }
}

/// Fields products may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Description,
    /// Sequential product code; pair with [`crate::query::Value::Integer`].
    Code,
}

impl Column for ProductField {
    fn expr(self) -> &'static str {
        match self {
            Self::Name => "p.name",
            Self::Description => "p.description",
            Self::Code => "p.code",
        }
    }
}

impl RecordKind for Products {
    type Record = Product;
    type SortKey = ProductSort;
    type Field = ProductField;

    const SELECT: &'static str = "SELECT p.uuid, p.code, p.name, p.price, p.description, \
        p.image_uri, p.created_at, p.updated_at, p.deleted_at FROM products p";

    const LIVE: Option<&'static str> = Some("p.deleted_at IS NULL");
}

/// Product listing.
pub type ProductListing = Listing<Products>;
