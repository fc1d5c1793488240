//! Clients service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::clients::{
        data::{ClientDetails, NewClient},
        errors::ClientsServiceError,
        listing::ClientListing,
        models::{Client, ClientUuid},
        repository::SqliteClientsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct SqliteClientsService {
    db: Db,
    repository: SqliteClientsRepository,
}

impl SqliteClientsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteClientsRepository::new(),
        }
    }
}

#[async_trait]
impl ClientsService for SqliteClientsService {
    async fn list_clients(&self, listing: ClientListing) -> Result<Vec<Client>, ClientsServiceError> {
        let mut tx = self.db.begin_read().await?;

        let clients = self.repository.list_clients(&mut tx, &listing).await?;

        tx.commit().await?;

        Ok(clients)
    }

    async fn get_client(&self, client: ClientUuid) -> Result<Client, ClientsServiceError> {
        let mut tx = self.db.begin_read().await?;

        let client = self.repository.get_client(&mut tx, client).await?;

        tx.commit().await?;

        Ok(client)
    }

    #[instrument(skip(self, client), fields(client = %client.uuid))]
    async fn create_client(&self, client: NewClient) -> Result<Client, ClientsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let created = self
            .repository
            .create_client(&mut tx, client.uuid, &client.details, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!("client created");

        Ok(created)
    }

    #[instrument(skip(self, details))]
    async fn update_client(
        &self,
        client: ClientUuid,
        details: ClientDetails,
    ) -> Result<Client, ClientsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let updated = self
            .repository
            .update_client(&mut tx, client, &details, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_client(&self, client: ClientUuid) -> Result<(), ClientsServiceError> {
        let mut tx = self.db.begin_write().await?;

        let rows_affected = self
            .repository
            .delete_client(&mut tx, client, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(ClientsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("client deleted");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ClientsService: Send + Sync {
    /// Retrieves the clients matching a listing.
    async fn list_clients(&self, listing: ClientListing) -> Result<Vec<Client>, ClientsServiceError>;

    /// Retrieve a single client.
    async fn get_client(&self, client: ClientUuid) -> Result<Client, ClientsServiceError>;

    /// Creates a new client.
    async fn create_client(&self, client: NewClient) -> Result<Client, ClientsServiceError>;

    /// Replaces a client's details.
    async fn update_client(
        &self,
        client: ClientUuid,
        details: ClientDetails,
    ) -> Result<Client, ClientsServiceError>;

    /// Deletes a client. Orders placed for it keep resolving.
    async fn delete_client(&self, client: ClientUuid) -> Result<(), ClientsServiceError>;
}
