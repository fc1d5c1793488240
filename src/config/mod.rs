//! Configuration
//!
//! Every setting can be given as a flag or through the environment; a `.env`
//! file in the working directory is loaded first.

use clap::Args;

mod lookup;
mod observability;
mod store;

pub use lookup::LookupSettings;
pub use observability::{LogFormat, LoggingConfig};
pub use store::StoreSettings;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct Settings {
    /// Local store settings.
    #[command(flatten)]
    pub store: StoreSettings,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Postal code lookup settings.
    #[command(flatten)]
    pub lookup: LookupSettings,
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use clap::Parser;

    use crate::schema::SchemaMismatchPolicy;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn flags_override_defaults() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from([
            "salesdesk",
            "--database-path",
            "/tmp/shop.db",
            "--max-connections",
            "2",
            "--busy-timeout-ms",
            "250",
            "--on-schema-mismatch",
            "fail",
            "--log-format",
            "json",
            "--postal-lookup-url",
            "http://localhost:8080/",
        ])?;

        let store = cli.settings.store.store_config();

        assert_eq!(store.path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(store.max_connections, 2);
        assert_eq!(store.busy_timeout, Duration::from_millis(250));
        assert_eq!(store.on_schema_mismatch, SchemaMismatchPolicy::Fail);
        assert!(matches!(cli.settings.logging.log_format, LogFormat::Json));
        assert_eq!(
            cli.settings.lookup.viacep_config().base_url,
            "http://localhost:8080/"
        );

        Ok(())
    }
}
