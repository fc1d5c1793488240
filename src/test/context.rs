//! Test context for service-level integration tests.

use crate::{
    database::{self, Db},
    domain::{
        clients::{
            ClientsService, ClientsServiceError, SqliteClientsService,
            data::NewClient,
            models::{Client, ClientUuid},
        },
        orders::SqliteOrdersService,
        products::{
            ProductsService, ProductsServiceError, SqliteProductsService,
            data::NewProduct,
            models::{Product, ProductUuid},
        },
    },
};

use super::{
    db::TestDb,
    helpers::{client_details, product_details},
};

pub(crate) struct TestContext {
    pub db: Db,
    pub clients: SqliteClientsService,
    pub products: SqliteProductsService,
    pub orders: SqliteOrdersService,
    _store: TestDb,
}

impl TestContext {
    #[expect(clippy::expect_used, reason = "tests cannot run without a store")]
    pub(crate) async fn new() -> Self {
        let store = TestDb::new();

        let db = database::open(&store.config())
            .await
            .expect("Failed to open test store");

        Self {
            clients: SqliteClientsService::new(db.clone()),
            products: SqliteProductsService::new(db.clone()),
            orders: SqliteOrdersService::new(db.clone()),
            db,
            _store: store,
        }
    }

    pub(crate) async fn create_client(&self, name: &str) -> Result<Client, ClientsServiceError> {
        self.clients
            .create_client(NewClient {
                uuid: ClientUuid::new(),
                details: client_details(name),
            })
            .await
    }

    pub(crate) async fn create_product(
        &self,
        name: &str,
        price: u64,
    ) -> Result<Product, ProductsServiceError> {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                details: product_details(name, price),
            })
            .await
    }
}
