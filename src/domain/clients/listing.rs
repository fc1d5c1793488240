//! Client listings.

use crate::{
    domain::clients::models::Client,
    query::{Column, Listing, RecordKind},
};

/// Client record kind.
#[derive(Debug)]
pub struct Clients;

/// Keys clients may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSort {
    /// Name, ignoring ASCII case.
    Name,
    /// Registration time.
    CreatedAt,
}

impl Column for ClientSort {
    fn expr(self) -> &'static str {
        match self {
            Self::Name => "c.name COLLATE NOCASE",
            Self::CreatedAt => "c.created_at",
        }
    }
}

/// Fields clients may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    /// Masked CNPJ, `00.000.000/0000-00`.
    TaxId,
    Email,
    City,
    State,
}

impl Column for ClientField {
    fn expr(self) -> &'static str {
        match self {
            Self::Name => "c.name",
            Self::TaxId => "c.tax_id",
            Self::Email => "c.email",
            Self::City => "c.city",
            Self::State => "c.state",
        }
    }
}

impl RecordKind for Clients {
    type Record = Client;
    type SortKey = ClientSort;
    type Field = ClientField;

    const SELECT: &'static str = "SELECT c.uuid, c.name, c.tax_id, c.email, c.phone, \
        c.postal_code, c.state, c.city, c.neighborhood, c.street, c.number, c.photo_uri, \
        c.created_at, c.updated_at, c.deleted_at FROM clients c";

    const LIVE: Option<&'static str> = Some("c.deleted_at IS NULL");
}

/// Client listing.
pub type ClientListing = Listing<Clients>;
