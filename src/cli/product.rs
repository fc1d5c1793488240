use std::io::Write;

use clap::{Args, Subcommand, ValueEnum};
use salesdesk::{
    context::AppContext,
    money::format_price,
    products::{
        data::{NewProduct, ProductForm},
        listing::{ProductField, ProductListing, ProductSort},
        models::{Product, ProductUuid},
    },
    query::{Direction, Predicate},
};

use super::output::{details, emit, table};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Register a product
    Create(CreateProductArgs),

    /// List products
    List(ListProductsArgs),

    /// Show one product
    Show(ProductUuidArg),

    /// Change a product's details
    Update(UpdateProductArgs),

    /// Delete a product
    Delete(ProductUuidArg),
}

#[derive(Debug, Args)]
struct ProductUuidArg {
    /// Product UUID
    uuid: ProductUuid,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<ProductUuid>,

    /// Product name
    #[arg(long)]
    name: String,

    /// Price, e.g. 49.90 or 49,90
    #[arg(long)]
    price: String,

    /// Description
    #[arg(long, default_value = "")]
    description: String,

    /// Image reference
    #[arg(long)]
    image_uri: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    /// Product UUID
    uuid: ProductUuid,

    /// Product name
    #[arg(long)]
    name: Option<String>,

    /// Price, e.g. 49.90 or 49,90
    #[arg(long)]
    price: Option<String>,

    /// Description
    #[arg(long)]
    description: Option<String>,

    /// Image reference
    #[arg(long)]
    image_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortBy {
    Name,
    Price,
    Code,
    Created,
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Only products whose name contains this text
    #[arg(long)]
    search: Option<String>,

    /// Sort key
    #[arg(long, value_enum, default_value_t = SortBy::Name)]
    sort: SortBy,

    /// Sort descending
    #[arg(long)]
    descending: bool,

    /// Maximum number of products to show
    #[arg(long)]
    limit: Option<u32>,
}

pub(crate) async fn run(
    command: ProductCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create(args, ctx, out).await,
        ProductSubcommand::List(args) => list(args, ctx, out).await,
        ProductSubcommand::Show(args) => {
            let product = ctx
                .products
                .get_product(args.uuid)
                .await
                .map_err(|error| format!("failed to load product: {error}"))?;

            emit(out, &product_details(&product))
        }
        ProductSubcommand::Update(args) => update(args, ctx, out).await,
        ProductSubcommand::Delete(args) => {
            ctx.products
                .delete_product(args.uuid)
                .await
                .map_err(|error| format!("failed to delete product: {error}"))?;

            emit(out, &format!("deleted product {}", args.uuid))
        }
    }
}

async fn create(args: CreateProductArgs, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let details = ProductForm {
        name: args.name,
        price: args.price,
        description: args.description,
        image_uri: args.image_uri,
    }
    .validate()
    .map_err(|errors| format!("invalid product: {errors}"))?;

    let product = ctx
        .products
        .create_product(NewProduct {
            uuid: args.uuid.unwrap_or_default(),
            details,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    emit(out, &product_details(&product))
}

async fn update(args: UpdateProductArgs, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let existing = ctx
        .products
        .get_product(args.uuid)
        .await
        .map_err(|error| format!("failed to load product: {error}"))?;

    let mut form = ProductForm::from(&existing);

    if let Some(name) = args.name {
        form.name = name;
    }

    if let Some(price) = args.price {
        form.price = price;
    }

    if let Some(description) = args.description {
        form.description = description;
    }

    if args.image_uri.is_some() {
        form.image_uri = args.image_uri;
    }

    let details = form
        .validate()
        .map_err(|errors| format!("invalid product: {errors}"))?;

    let product = ctx
        .products
        .update_product(args.uuid, details)
        .await
        .map_err(|error| format!("failed to update product: {error}"))?;

    emit(out, &product_details(&product))
}

async fn list(args: ListProductsArgs, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let sort = match args.sort {
        SortBy::Name => ProductSort::Name,
        SortBy::Price => ProductSort::Price,
        SortBy::Code => ProductSort::Code,
        SortBy::Created => ProductSort::CreatedAt,
    };

    let mut listing = ProductListing::sorted(sort, Direction::from_descending(args.descending));

    if let Some(search) = args.search {
        listing = listing.filter(Predicate::contains(ProductField::Name, search));
    }

    if let Some(limit) = args.limit {
        listing = listing.limit(limit);
    }

    let products = ctx
        .products
        .list_products(listing)
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        return emit(out, "no products found");
    }

    emit(
        out,
        &table(
            ["Code", "Name", "Price", "UUID"],
            products.into_iter().map(|product| {
                [
                    product.code.to_string(),
                    product.name,
                    format_price(product.price),
                    product.uuid.to_string(),
                ]
            }),
        ),
    )
}

fn product_details(product: &Product) -> String {
    details([
        ("UUID", product.uuid.to_string()),
        ("Code", product.code.to_string()),
        ("Name", product.name.clone()),
        ("Price", format_price(product.price)),
        ("Description", product.description.clone()),
        (
            "Image",
            product.image_uri.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Created", product.created_at.to_string()),
        ("Updated", product.updated_at.to_string()),
    ])
}
