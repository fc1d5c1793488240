//! Store Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use crate::{database::StoreConfig, schema::SchemaMismatchPolicy};

/// Local store settings.
#[derive(Debug, Args)]
pub struct StoreSettings {
    /// Path of the store file; created when missing
    #[arg(long, env = "SALESDESK_DATABASE_PATH", default_value = "salesdesk.db")]
    pub database_path: PathBuf,

    /// Maximum pooled connections to the store
    #[arg(long, env = "SALESDESK_MAX_CONNECTIONS", default_value_t = 4)]
    pub max_connections: u32,

    /// How long a write waits for a concurrent writer, in milliseconds
    #[arg(long, env = "SALESDESK_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// What to do with a store written by a different schema version
    #[arg(
        long,
        env = "SALESDESK_ON_SCHEMA_MISMATCH",
        value_enum,
        default_value_t = SchemaMismatchPolicy::Recreate
    )]
    pub on_schema_mismatch: SchemaMismatchPolicy,
}

impl StoreSettings {
    /// Settings for [`crate::database::open`].
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.database_path.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            on_schema_mismatch: self.on_schema_mismatch,
        }
    }
}
