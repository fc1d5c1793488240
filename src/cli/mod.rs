use std::{
    io::{self, Write},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use salesdesk::{
    config::Settings,
    context::AppContext,
    database::{StoreError, StoreHandle},
    observability,
};
use tracing::warn;

mod address;
mod client;
mod order;
mod output;
mod product;

#[derive(Debug, Parser)]
#[command(name = "salesdesk", about = "SalesDesk local store CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommands),

    /// Look up an address by postal code
    Address(address::AddressArgs),
}

/// Commands that need the local store.
#[derive(Debug, Subcommand)]
enum StoreCommands {
    /// Manage clients
    Client(client::ClientCommand),

    /// Manage products
    Product(product::ProductCommand),

    /// Place and inspect orders
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.settings.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let mut out = io::stdout();

        match self.command {
            Commands::Address(args) => address::run(args, &self.settings.lookup, &mut out).await,
            Commands::Store(command) => run_with_store(command, &self.settings, &mut out).await,
        }
    }
}

async fn run_with_store(
    command: StoreCommands,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<(), String> {
    let store = Arc::new(StoreHandle::new(settings.store.store_config()));

    let ctx = AppContext::open(store)
        .await
        .map_err(|error| format!("failed to open store: {error}"))?;

    let result = match command {
        StoreCommands::Client(command) => client::run(command, &ctx, &settings.lookup, out).await,
        StoreCommands::Product(command) => product::run(command, &ctx, out).await,
        StoreCommands::Order(command) => order::run(command, &ctx, out).await,
    };

    finish(result, ctx.close().await)
}

/// Combine a command's outcome with the store release; the command's own
/// error wins.
fn finish(result: Result<(), String>, closed: Result<(), StoreError>) -> Result<(), String> {
    match (result, closed) {
        (result, Ok(())) => result,
        (Ok(()), Err(error)) => Err(format!("failed to close store: {error}")),
        (Err(command_error), Err(error)) => {
            warn!(%error, "failed to close store");

            Err(command_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_survives_a_failed_close() {
        let result = finish(
            Err("failed to create order: no products selected".to_string()),
            Err(StoreError::WritesInFlight(1)),
        );

        assert_eq!(
            result,
            Err("failed to create order: no products selected".to_string())
        );
    }

    #[test]
    fn close_failure_is_reported_after_a_successful_command() {
        let result = finish(Ok(()), Err(StoreError::WritesInFlight(1)));

        assert!(
            result
                .as_ref()
                .err()
                .is_some_and(|error| error.starts_with("failed to close store")),
            "expected a close error, got {result:?}"
        );
    }

    #[test]
    fn clean_close_keeps_the_command_outcome() {
        assert_eq!(finish(Ok(()), Ok(())), Ok(()));
        assert_eq!(
            finish(Err("boom".to_string()), Ok(())),
            Err("boom".to_string())
        );
    }
}
