use std::io::Write;

use clap::{Args, Subcommand, ValueEnum};
use salesdesk::{
    clients::{
        data::{ClientForm, NewClient},
        listing::{ClientField, ClientListing, ClientSort},
        models::{Client, ClientUuid},
    },
    config::LookupSettings,
    context::AppContext,
    postal::{AddressAutofill, PostalCode, ViaCepClient},
    query::{Direction, Predicate},
};
use tracing::debug;

use super::output::{details, emit, table};

#[derive(Debug, Args)]
pub(crate) struct ClientCommand {
    #[command(subcommand)]
    command: ClientSubcommand,
}

#[derive(Debug, Subcommand)]
enum ClientSubcommand {
    /// Register a client
    Create(CreateClientArgs),

    /// List clients
    List(ListClientsArgs),

    /// Show one client
    Show(ClientUuidArg),

    /// Change a client's details
    Update(UpdateClientArgs),

    /// Delete a client
    Delete(ClientUuidArg),
}

#[derive(Debug, Args)]
struct ClientUuidArg {
    /// Client UUID
    uuid: ClientUuid,
}

#[derive(Debug, Args)]
struct ClientFields {
    /// Client or company name
    #[arg(long)]
    name: Option<String>,

    /// Company tax id (CNPJ), with or without mask
    #[arg(long)]
    tax_id: Option<String>,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Postal code (CEP)
    #[arg(long)]
    postal_code: Option<String>,

    /// State
    #[arg(long)]
    state: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// Neighborhood
    #[arg(long)]
    neighborhood: Option<String>,

    /// Street
    #[arg(long)]
    street: Option<String>,

    /// House number
    #[arg(long)]
    number: Option<String>,

    /// Photo reference
    #[arg(long)]
    photo_uri: Option<String>,

    /// Fill street, neighborhood, city and state from the postal code;
    /// explicitly given fields win
    #[arg(long)]
    autofill: bool,
}

#[derive(Debug, Args)]
struct CreateClientArgs {
    /// Optional client UUID; generated when omitted
    #[arg(long)]
    uuid: Option<ClientUuid>,

    #[command(flatten)]
    fields: ClientFields,
}

#[derive(Debug, Args)]
struct UpdateClientArgs {
    /// Client UUID
    uuid: ClientUuid,

    #[command(flatten)]
    fields: ClientFields,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortBy {
    Name,
    Created,
}

#[derive(Debug, Args)]
struct ListClientsArgs {
    /// Only clients whose name contains this text
    #[arg(long)]
    search: Option<String>,

    /// Only clients in this city
    #[arg(long)]
    city: Option<String>,

    /// Sort key
    #[arg(long, value_enum, default_value_t = SortBy::Name)]
    sort: SortBy,

    /// Sort descending
    #[arg(long)]
    descending: bool,

    /// Maximum number of clients to show
    #[arg(long)]
    limit: Option<u32>,
}

pub(crate) async fn run(
    command: ClientCommand,
    ctx: &AppContext,
    lookup: &LookupSettings,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        ClientSubcommand::Create(args) => create(args, ctx, lookup, out).await,
        ClientSubcommand::List(args) => list(args, ctx, out).await,
        ClientSubcommand::Show(args) => show(args.uuid, ctx, out).await,
        ClientSubcommand::Update(args) => update(args, ctx, lookup, out).await,
        ClientSubcommand::Delete(args) => {
            ctx.clients
                .delete_client(args.uuid)
                .await
                .map_err(|error| format!("failed to delete client: {error}"))?;

            emit(out, &format!("deleted client {}", args.uuid))
        }
    }
}

async fn create(
    args: CreateClientArgs,
    ctx: &AppContext,
    lookup: &LookupSettings,
    out: &mut impl Write,
) -> Result<(), String> {
    let mut form = ClientForm::default();

    apply_fields(&mut form, args.fields, lookup).await;

    let details = form
        .validate()
        .map_err(|errors| format!("invalid client: {errors}"))?;

    let client = ctx
        .clients
        .create_client(NewClient {
            uuid: args.uuid.unwrap_or_default(),
            details,
        })
        .await
        .map_err(|error| format!("failed to create client: {error}"))?;

    emit(out, &client_details(&client))
}

async fn update(
    args: UpdateClientArgs,
    ctx: &AppContext,
    lookup: &LookupSettings,
    out: &mut impl Write,
) -> Result<(), String> {
    let existing = ctx
        .clients
        .get_client(args.uuid)
        .await
        .map_err(|error| format!("failed to load client: {error}"))?;

    let mut form = ClientForm::from(&existing);

    apply_fields(&mut form, args.fields, lookup).await;

    let details = form
        .validate()
        .map_err(|errors| format!("invalid client: {errors}"))?;

    let client = ctx
        .clients
        .update_client(args.uuid, details)
        .await
        .map_err(|error| format!("failed to update client: {error}"))?;

    emit(out, &client_details(&client))
}

async fn list(args: ListClientsArgs, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let sort = match args.sort {
        SortBy::Name => ClientSort::Name,
        SortBy::Created => ClientSort::CreatedAt,
    };

    let mut listing = ClientListing::sorted(sort, Direction::from_descending(args.descending));

    if let Some(search) = args.search {
        listing = listing.filter(Predicate::contains(ClientField::Name, search));
    }

    if let Some(city) = args.city {
        listing = listing.filter(Predicate::contains(ClientField::City, city));
    }

    if let Some(limit) = args.limit {
        listing = listing.limit(limit);
    }

    let clients = ctx
        .clients
        .list_clients(listing)
        .await
        .map_err(|error| format!("failed to list clients: {error}"))?;

    if clients.is_empty() {
        return emit(out, "no clients found");
    }

    emit(
        out,
        &table(
            ["Name", "Tax ID", "City", "State", "Phone", "UUID"],
            clients.into_iter().map(|client| {
                [
                    client.name,
                    client.tax_id,
                    client.city,
                    client.state,
                    client.phone,
                    client.uuid.to_string(),
                ]
            }),
        ),
    )
}

async fn show(uuid: ClientUuid, ctx: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let client = ctx
        .clients
        .get_client(uuid)
        .await
        .map_err(|error| format!("failed to load client: {error}"))?;

    emit(out, &client_details(&client))
}

/// Overlay the given flags on `form`, autofilling the address first.
async fn apply_fields(form: &mut ClientForm, fields: ClientFields, lookup: &LookupSettings) {
    let ClientFields {
        name,
        tax_id,
        email,
        phone,
        postal_code,
        state,
        city,
        neighborhood,
        street,
        number,
        photo_uri,
        autofill,
    } = fields;

    if let Some(postal_code) = postal_code {
        form.postal_code = postal_code;
    }

    if autofill && let Ok(code) = PostalCode::parse(&form.postal_code) {
        match ViaCepClient::new(lookup.viacep_config()) {
            Ok(client) => {
                if let Some(address) = AddressAutofill::new(client).resolve(&code).await {
                    form.apply_address(address);
                }
            }
            Err(error) => debug!(%error, "postal code lookup unavailable"),
        }
    }

    for (field, value) in [
        (&mut form.name, name),
        (&mut form.tax_id, tax_id),
        (&mut form.email, email),
        (&mut form.phone, phone),
        (&mut form.state, state),
        (&mut form.city, city),
        (&mut form.neighborhood, neighborhood),
        (&mut form.street, street),
        (&mut form.number, number),
    ] {
        if let Some(value) = value {
            *field = value;
        }
    }

    if photo_uri.is_some() {
        form.photo_uri = photo_uri;
    }
}

fn client_details(client: &Client) -> String {
    details([
        ("UUID", client.uuid.to_string()),
        ("Name", client.name.clone()),
        ("Tax ID", client.tax_id.clone()),
        ("Email", client.email.clone()),
        ("Phone", client.phone.clone()),
        ("Postal code", client.postal_code.clone()),
        ("Street", format!("{}, {}", client.street, client.number)),
        ("Neighborhood", client.neighborhood.clone()),
        ("City", format!("{} - {}", client.city, client.state)),
        (
            "Photo",
            client.photo_uri.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Created", client.created_at.to_string()),
        ("Updated", client.updated_at.to_string()),
    ])
}
