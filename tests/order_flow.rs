//! End-to-end order placement through the public API.

use std::sync::Arc;

use salesdesk::{
    clients::{
        data::{ClientForm, NewClient},
        models::ClientUuid,
    },
    context::AppContext,
    database::{StoreConfig, StoreHandle},
    money::format_price,
    orders::{
        OrdersServiceError,
        data::{NewOrder, OrderLine},
        listing::{OrderListing, OrderSort},
        models::OrderUuid,
    },
    products::{
        data::{NewProduct, ProductForm},
        models::{Product, ProductUuid},
    },
    query::Direction,
};
use tempfile::TempDir;
use testresult::TestResult;

fn client_form(name: &str) -> ClientForm {
    ClientForm {
        name: name.to_string(),
        tax_id: "12.345.678/0001-95".to_string(),
        email: "compras@example.com.br".to_string(),
        phone: "(11) 3333-4444".to_string(),
        postal_code: "01310-100".to_string(),
        state: "SP".to_string(),
        city: "São Paulo".to_string(),
        neighborhood: "Bela Vista".to_string(),
        street: "Avenida Paulista".to_string(),
        number: "1000".to_string(),
        photo_uri: None,
    }
}

async fn create_product(ctx: &AppContext, name: &str, price: &str) -> TestResult<Product> {
    let details = ProductForm {
        name: name.to_string(),
        price: price.to_string(),
        description: String::new(),
        image_uri: None,
    }
    .validate()?;

    let product = ctx
        .products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            details,
        })
        .await?;

    Ok(product)
}

#[tokio::test]
async fn place_order_and_read_it_back() -> TestResult {
    let dir = TempDir::new()?;
    let store = Arc::new(StoreHandle::new(StoreConfig::new(dir.path().join("salesdesk.db"))));
    let ctx = AppContext::open(Arc::clone(&store)).await?;

    let client = ctx
        .clients
        .create_client(NewClient {
            uuid: ClientUuid::new(),
            details: client_form("Padaria Estrela").validate()?,
        })
        .await?;

    let coffee = create_product(&ctx, "Café 500g", "49,90").await?;
    let filter = create_product(&ctx, "Filtro de papel", "29.90").await?;

    let order = ctx
        .orders
        .create_order(NewOrder {
            uuid: OrderUuid::new(),
            client: client.uuid,
            lines: vec![
                OrderLine {
                    product: coffee.uuid,
                    quantity: 2,
                },
                OrderLine {
                    product: filter.uuid,
                    quantity: 1,
                },
            ],
        })
        .await?;

    assert_eq!(order.total_value, 12_970);
    assert_eq!(order.product_count, 3);
    assert_eq!(format_price(order.total_value), format_price(12_970));

    let subtotals: Vec<u64> = order.items.iter().map(|item| item.subtotal).collect();

    assert_eq!(subtotals, vec![9_980, 2_990]);

    let listed = ctx
        .orders
        .list_orders(OrderListing::sorted(OrderSort::CreatedAt, Direction::Descending))
        .await?;

    let listed: Vec<_> = listed.iter().map(|order| (order.uuid, order.client_name.as_str())).collect();

    assert_eq!(listed, vec![(order.uuid, "Padaria Estrela")]);

    ctx.close().await?;

    assert!(!store.is_open().await, "store should be closed");

    Ok(())
}

#[tokio::test]
async fn empty_selection_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let store = Arc::new(StoreHandle::new(StoreConfig::new(dir.path().join("salesdesk.db"))));
    let ctx = AppContext::open(store).await?;

    let client = ctx
        .clients
        .create_client(NewClient {
            uuid: ClientUuid::new(),
            details: client_form("Mercearia Lua").validate()?,
        })
        .await?;

    let product = create_product(&ctx, "Açúcar 1kg", "5.49").await?;

    let result = ctx
        .orders
        .create_order(NewOrder {
            uuid: OrderUuid::new(),
            client: client.uuid,
            lines: vec![OrderLine {
                product: product.uuid,
                quantity: 0,
            }],
        })
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::NoItemsSelected)),
        "expected NoItemsSelected, got {result:?}"
    );

    let orders = ctx.orders.list_orders(OrderListing::new()).await?;

    assert!(orders.is_empty(), "no order should have been stored");

    ctx.close().await?;

    Ok(())
}
