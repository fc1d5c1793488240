//! Client Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Client UUID
pub type ClientUuid = TypedUuid<Client>;

/// Client Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub uuid: ClientUuid,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub photo_uri: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
