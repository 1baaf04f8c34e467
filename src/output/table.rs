//! Table output formatter

use std::io::Write;

use comfy_table::{presets::NOTHING, Table};

use super::Record;

/// Render records as a borderless table. Columns are NAME followed by every
/// attribute key in first-seen order; a record without a key gets an empty cell.
pub fn render_table<W: Write>(out: &mut W, records: &[Record]) -> std::io::Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for (key, _) in &record.attributes {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut header = vec!["NAME".to_string()];
    header.extend(columns.iter().map(|c| c.to_uppercase()));

    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(header);

    for record in records {
        let mut row = vec![record.name.clone()];
        row.extend(
            columns
                .iter()
                .map(|c| record.get(c).unwrap_or_default().to_string()),
        );
        table.add_row(row);
    }

    writeln!(out, "{}", table)
}
