use std::io::Write;

use clap::{Args, Subcommand, ValueEnum};
use salesdesk::{
    clients::models::ClientUuid,
    context::AppContext,
    money::format_price,
    orders::{
        data::{NewOrder, OrderLine},
        listing::{OrderField, OrderListing, OrderSort},
        models::{Order, OrderUuid},
    },
    products::models::ProductUuid,
    query::{Direction, Predicate},
};

use super::output::{details, emit, table};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Place an order
    Create(CreateOrderArgs),

    /// List orders, newest first
    List(ListOrdersArgs),

    /// Show one order with its items
    Show(OrderUuidArg),
}

#[derive(Debug, Args)]
struct OrderUuidArg {
    /// Order UUID
    uuid: OrderUuid,
}

#[derive(Debug, Args)]
struct CreateOrderArgs {
    /// Optional order UUID; generated when omitted
    #[arg(long)]
    uuid: Option<OrderUuid>,

    /// Client placing the order
    #[arg(long)]
    client: ClientUuid,

    /// Selected product as PRODUCT_UUID=QUANTITY; repeatable
    #[arg(long = "item", value_parser = parse_line)]
    items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortBy {
    Created,
    Total,
    Client,
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Only orders whose client name contains this text
    #[arg(long)]
    search: Option<String>,

    /// Only orders placed by this client
    #[arg(long)]
    client: Option<ClientUuid>,

    /// Sort key
    #[arg(long, value_enum, default_value_t = SortBy::Created)]
    sort: SortBy,

    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,

    /// Maximum number of orders to show
    #[arg(long)]
    limit: Option<u32>,
}

fn parse_line(input: &str) -> Result<OrderLine, String> {
    let (product, quantity) = input
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT_UUID=QUANTITY, got {input:?}"))?;

    let product = product
        .trim()
        .parse::<ProductUuid>()
        .map_err(|error| format!("invalid product uuid: {error}"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid quantity: {error}"))?;

    Ok(OrderLine { product, quantity })
}

pub(crate) async fn run(
    command: OrderCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Create(args) => {
            let order = ctx
                .orders
                .create_order(NewOrder {
                    uuid: args.uuid.unwrap_or_default(),
                    client: args.client,
                    lines: args.items,
                })
                .await
                .map_err(|error| format!("failed to create order: {error}"))?;

            emit(out, &order_details(&order))
        }
        OrderSubcommand::List(args) => list(args, ctx, out).await,
        OrderSubcommand::Show(args) => {
            let order = ctx
                .orders
                .get_order(args.uuid)
                .await
                .map_err(|error| format!("failed to load order: {error}"))?;

            emit(out, &order_details(&order))
        }
    }
}

async fn list(args: ListOrdersArgs, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let sort = match args.sort {
        SortBy::Created => OrderSort::CreatedAt,
        SortBy::Total => OrderSort::TotalValue,
        SortBy::Client => OrderSort::ClientName,
    };

    let mut listing = OrderListing::sorted(sort, Direction::from_descending(!args.ascending));

    if let Some(search) = args.search {
        listing = listing.filter(Predicate::contains(OrderField::ClientName, search));
    }

    if let Some(client) = args.client {
        listing = listing.filter(Predicate::equals(OrderField::Client, uuid::Uuid::from(client)));
    }

    if let Some(limit) = args.limit {
        listing = listing.limit(limit);
    }

    let orders = ctx
        .orders
        .list_orders(listing)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        return emit(out, "no orders found");
    }

    emit(
        out,
        &table(
            ["Created", "Client", "Products", "Total", "Status", "UUID"],
            orders.into_iter().map(|order| {
                [
                    order.created_at.to_string(),
                    order.client_name,
                    order.product_count.to_string(),
                    format_price(order.total_value),
                    order.status.to_string(),
                    order.uuid.to_string(),
                ]
            }),
        ),
    )
}

fn order_details(order: &Order) -> String {
    let header = details([
        ("UUID", order.uuid.to_string()),
        ("Client", order.client_name.clone()),
        ("Status", order.status.to_string()),
        ("Created", order.created_at.to_string()),
        ("Products", order.product_count.to_string()),
        ("Total", format_price(order.total_value)),
    ]);

    let items = table(
        ["#", "Code", "Product", "Quantity", "Unit price", "Subtotal"],
        order.items.iter().map(|item| {
            [
                (u64::from(item.position) + 1).to_string(),
                item.product_code
                    .map_or_else(|| "-".to_string(), |code| code.to_string()),
                item.display_name().to_string(),
                item.quantity.to_string(),
                format_price(item.unit_price),
                format_price(item.subtotal),
            ]
        }),
    );

    format!("{header}\n{items}")
}
