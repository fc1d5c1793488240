use std::io::Write;

use clap::Args;
use salesdesk::{
    config::LookupSettings,
    postal::{PostalCode, PostalCodeLookup, ViaCepClient},
};

use super::output::{details, emit};

#[derive(Debug, Args)]
pub(crate) struct AddressArgs {
    /// Postal code, e.g. 01310-100
    postal_code: PostalCode,
}

pub(crate) async fn run(
    args: AddressArgs,
    lookup: &LookupSettings,
    out: &mut impl Write,
) -> Result<(), String> {
    let client = ViaCepClient::new(lookup.viacep_config())
        .map_err(|error| format!("failed to build lookup client: {error}"))?;

    let address = client
        .lookup(&args.postal_code)
        .await
        .map_err(|error| format!("failed to look up {}: {error}", args.postal_code))?;

    emit(
        out,
        &details([
            ("Postal code", args.postal_code.to_string()),
            ("Street", address.street),
            ("Neighborhood", address.neighborhood),
            ("City", address.city),
            ("State", address.state),
        ]),
    )
}
