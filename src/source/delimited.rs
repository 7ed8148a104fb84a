use vocadeck_core::{Error, Result};

use super::{normalize_cell, SourceTable};

/// Parse comma-separated text. Rows may be shorter or longer than the header;
/// length checks happen when rows become records.
pub(super) fn parse(text: &str) -> Result<SourceTable> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Source(format!("invalid CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| Error::Source(format!("invalid CSV row {}: {e}", line + 1)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(normalize_cell).collect());
    }

    Ok(SourceTable { headers, rows })
}
