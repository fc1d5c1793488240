//! Postal Lookup Config

use std::time::Duration;

use clap::Args;

use crate::postal::ViaCepConfig;

/// Postal code lookup settings.
#[derive(Debug, Args)]
pub struct LookupSettings {
    /// Base URL of the ViaCEP-compatible lookup service
    #[arg(long, env = "POSTAL_LOOKUP_URL", default_value = "https://viacep.com.br")]
    pub postal_lookup_url: String,

    /// Lookup request timeout in milliseconds
    #[arg(long, env = "POSTAL_LOOKUP_TIMEOUT_MS", default_value_t = 5000)]
    pub postal_lookup_timeout_ms: u64,
}

impl LookupSettings {
    /// Settings for [`crate::postal::ViaCepClient`].
    pub fn viacep_config(&self) -> ViaCepConfig {
        ViaCepConfig {
            base_url: self.postal_lookup_url.clone(),
            timeout: Duration::from_millis(self.postal_lookup_timeout_ms),
        }
    }
}
