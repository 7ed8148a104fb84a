//! Vocabulary list readers.
//!
//! A source file is read into a [`SourceTable`]: the header names and the raw
//! rows, ready for [`vocadeck_core::Header::parse`] and
//! [`vocadeck_builder::DeckPipeline::run`]. CSV and Markdown tables are
//! supported; the format is picked from the file extension.

mod delimited;
mod markdown;

use std::path::Path;

use vocadeck_core::{Error, Header, Result, UnknownColumnPolicy};

/// Header names plus raw rows of one vocabulary list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Parse the header names under `policy`.
    pub fn header(&self, policy: UnknownColumnPolicy) -> Result<Header> {
        Header::parse(self.headers.as_slice(), policy)
    }
}

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Markdown,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            _ => Self::Csv,
        }
    }
}

/// Read and parse the vocabulary list at `path`.
pub fn read_source(path: &Path) -> Result<SourceTable> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Source(format!("cannot read {}: {e}", path.display())))?;
    let text = decode(&bytes);

    let table = match SourceFormat::from_path(path) {
        SourceFormat::Csv => delimited::parse(&text)?,
        SourceFormat::Markdown => markdown::parse(&text)?,
    };

    if table.headers.is_empty() {
        return Err(Error::Source(format!("{} has no header row", path.display())));
    }

    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Read vocabulary list"
    );

    Ok(table)
}

/// Decode file bytes as UTF-8, falling back to Latin-1. A leading BOM is dropped.
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("Source is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Turn `<br>`, `<br/>` and literal `\n` sequences into newlines.
pub fn normalize_cell(cell: &str) -> String {
    let mut out = cell.replace("\\n", "\n");
    for tag in ["<br/>", "<br />", "<br>", "<BR/>", "<BR />", "<BR>"] {
        out = out.replace(tag, "\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn decode_strips_bom() {
        assert_eq!(decode(b"\xEF\xBB\xBFVocab"), "Vocab");
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        assert_eq!(decode(b"caf\xE9"), "café");
    }

    #[test]
    fn normalize_line_breaks() {
        assert_eq!(normalize_cell("a<br>b<br/>c\\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_cell("plain"), "plain");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.md")), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_path(Path::new("a.MARKDOWN")), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_path(Path::new("a.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("a")), SourceFormat::Csv);
    }

    #[test]
    fn read_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Vocab,Translation,Sound\nle chat,the cat,\n").unwrap();

        let table = read_source(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Vocab", "Translation", "Sound"]);
        assert_eq!(table.rows, vec![vec!["le chat", "the cat", ""]]);

        let header = table.header(UnknownColumnPolicy::Strict).unwrap();
        assert_eq!(header.len(), 3);
    }

    #[test]
    fn empty_file_is_source_error() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert_matches!(read_source(file.path()), Err(Error::Source(_)));
    }
}
