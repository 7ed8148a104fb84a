use vocadeck_core::{Error, Result};

use super::{normalize_cell, SourceTable};

/// Parse the first pipe table found in Markdown text.
///
/// Text before the table is ignored and the table ends at the first line that
/// is not a table row. `\|` inside a cell is a literal pipe.
pub(super) fn parse(text: &str) -> Result<SourceTable> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with('|'))
        .take_while(|line| line.starts_with('|'));

    let Some(header_line) = lines.next() else {
        return Ok(SourceTable::default());
    };
    let headers: Vec<String> = split_row(header_line);

    match lines.next() {
        Some(line) if is_separator(line) => {}
        _ => {
            return Err(Error::Source(
                "Markdown table header must be followed by a separator row".into(),
            ))
        }
    }

    let rows = lines
        .map(|line| {
            split_row(line)
                .iter()
                .map(|cell| normalize_cell(cell))
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    Ok(SourceTable { headers, rows })
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_separator(line: &str) -> bool {
    split_row(line).iter().all(|cell| {
        let cell = cell.trim_matches(':');
        !cell.is_empty() && cell.chars().all(|c| c == '-')
    })
}
