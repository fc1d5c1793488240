use std::io::Write;

use tabled::{builder::Builder, settings::Style};

/// Render rows under a header as a table.
pub(crate) fn table<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> String {
    let mut builder = Builder::default();

    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

/// Render field/value pairs as a two column table.
pub(crate) fn details<'a>(fields: impl IntoIterator<Item = (&'a str, String)>) -> String {
    table(
        ["Field", "Value"],
        fields
            .into_iter()
            .map(|(field, value)| [field.to_string(), value]),
    )
}

pub(crate) fn emit(out: &mut impl Write, text: &str) -> Result<(), String> {
    writeln!(out, "{text}").map_err(|error| format!("failed to write output: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_includes_header_and_rows() {
        let rendered = table(
            ["Code", "Name"],
            [["1".to_string(), "Café 500g".to_string()]],
        );

        assert!(rendered.contains("Code"), "header missing from {rendered}");
        assert!(rendered.contains("Café 500g"), "row missing from {rendered}");
    }
}
