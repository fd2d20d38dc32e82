use crate::error::{ReportError, Result};
use crate::types::{Column, Dataset, RawRow, Record, Schema};
use crate::util::parse_rate;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Category label for a recognized column whose cell is empty.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let data = load_from_reader(file)?;
    tracing::info!(
        path = %path.display(),
        rows = data.len(),
        columns = ?data.schema().columns().iter().map(|c| c.header()).collect::<Vec<_>>(),
        "dataset loaded"
    );
    Ok(data)
}

/// Read a header row plus data rows. Any row that fails to parse aborts the
/// load; no partial dataset is returned.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let schema = Schema::from_headers(rdr.headers()?.iter());

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result?;
        let row_no = idx + 1;

        let negotiated_rate = parse_rate(row.negotiated_rate.as_deref()).map_err(|_| {
            ReportError::InvalidRate {
                row: row_no,
                value: row.negotiated_rate.clone().unwrap_or_default(),
            }
        })?;

        records.push(Record {
            billing_code: category(&schema, Column::BillingCode, row.billing_code),
            billing_class: category(&schema, Column::BillingClass, row.billing_class),
            negotiated_type: category(&schema, Column::NegotiatedType, row.negotiated_type),
            negotiated_rate,
            city: category(&schema, Column::City, row.city),
        });
    }

    Ok(Dataset::new(schema, records))
}

fn category(schema: &Schema, column: Column, value: Option<String>) -> Option<String> {
    if !schema.has(column) {
        return None;
    }
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => Some(UNKNOWN_CATEGORY.to_string()),
    }
}
