//! Clients Repository

use jiff::Timestamp;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::{
    database::columns::{encode_timestamp, try_get_optional_timestamp, try_get_timestamp},
    domain::clients::{
        data::ClientDetails,
        listing::ClientListing,
        models::{Client, ClientUuid},
    },
};

const GET_CLIENT_SQL: &str = include_str!("sql/get_client.sql");
const CREATE_CLIENT_SQL: &str = include_str!("sql/create_client.sql");
const UPDATE_CLIENT_SQL: &str = include_str!("sql/update_client.sql");
const DELETE_CLIENT_SQL: &str = include_str!("sql/delete_client.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteClientsRepository;

impl SqliteClientsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_clients(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        listing: &ClientListing,
    ) -> Result<Vec<Client>, sqlx::Error> {
        listing.fetch_all(tx).await
    }

    pub(crate) async fn get_client(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        client: ClientUuid,
    ) -> Result<Client, sqlx::Error> {
        query_as::<Sqlite, Client>(GET_CLIENT_SQL)
            .bind(client.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_client(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        client: ClientUuid,
        details: &ClientDetails,
        now: Timestamp,
    ) -> Result<Client, sqlx::Error> {
        query_as::<Sqlite, Client>(CREATE_CLIENT_SQL)
            .bind(client.into_uuid())
            .bind(&details.name)
            .bind(details.tax_id.as_str())
            .bind(&details.email)
            .bind(&details.phone)
            .bind(details.postal_code.as_str())
            .bind(&details.state)
            .bind(&details.city)
            .bind(&details.neighborhood)
            .bind(&details.street)
            .bind(&details.number)
            .bind(details.photo_uri.as_deref())
            .bind(encode_timestamp(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_client(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        client: ClientUuid,
        details: &ClientDetails,
        now: Timestamp,
    ) -> Result<Client, sqlx::Error> {
        query_as::<Sqlite, Client>(UPDATE_CLIENT_SQL)
            .bind(client.into_uuid())
            .bind(&details.name)
            .bind(details.tax_id.as_str())
            .bind(&details.email)
            .bind(&details.phone)
            .bind(details.postal_code.as_str())
            .bind(&details.state)
            .bind(&details.city)
            .bind(&details.neighborhood)
            .bind(&details.street)
            .bind(&details.number)
            .bind(details.photo_uri.as_deref())
            .bind(encode_timestamp(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_client(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        client: ClientUuid,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CLIENT_SQL)
            .bind(client.into_uuid())
            .bind(encode_timestamp(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Client {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ClientUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            tax_id: row.try_get("tax_id")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            postal_code: row.try_get("postal_code")?,
            state: row.try_get("state")?,
            city: row.try_get("city")?,
            neighborhood: row.try_get("neighborhood")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            photo_uri: row.try_get("photo_uri")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
            deleted_at: try_get_optional_timestamp(row, "deleted_at")?,
        })
    }
}
