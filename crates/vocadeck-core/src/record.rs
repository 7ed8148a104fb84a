//! Records: one vocabulary entry keyed by column tag.

use std::collections::BTreeMap;

use crate::column::ColumnTag;
use crate::error::{Error, Result};
use crate::header::Header;

/// One vocabulary entry's field values.
///
/// Records are built once from a source row and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    index: usize,
    fields: BTreeMap<ColumnTag, String>,
}

impl Record {
    /// Build a record from a raw row.
    ///
    /// Short rows are padded with empty values; a row with more cells than
    /// the header is rejected. Cells under ignored columns are dropped.
    pub fn from_row<S: AsRef<str>>(index: usize, header: &Header, row: &[S]) -> Result<Self> {
        if row.len() > header.len() {
            return Err(Error::invalid_record(
                index,
                format!(
                    "row has {} cells but the header has {} columns",
                    row.len(),
                    header.len()
                ),
            ));
        }

        let fields = header
            .columns()
            .iter()
            .filter_map(|column| {
                let tag = column.tag?;
                let value = row
                    .get(column.position)
                    .map(|cell| cell.as_ref().to_string())
                    .unwrap_or_default();
                Some((tag, value))
            })
            .collect();

        Ok(Self { index, fields })
    }

    /// Build a record directly from tagged values.
    pub fn new(index: usize, fields: impl IntoIterator<Item = (ColumnTag, String)>) -> Self {
        Self {
            index,
            fields: fields.into_iter().collect(),
        }
    }

    /// Zero-based position in the source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the column bound to `tag`, if the header has one.
    pub fn get(&self, tag: ColumnTag) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    /// Value of `tag` when present and not blank.
    pub fn non_empty(&self, tag: ColumnTag) -> Option<&str> {
        self.get(tag).filter(|v| !v.trim().is_empty())
    }

    /// The term: the value of the first column.
    pub fn term(&self) -> &str {
        self.get(ColumnTag::Vocab).unwrap_or_default()
    }

    /// Check that both required fields are filled in.
    pub fn validate(&self) -> Result<()> {
        for tag in [ColumnTag::Vocab, ColumnTag::Translation] {
            if self.non_empty(tag).is_none() {
                return Err(Error::invalid_record(
                    self.index,
                    format!("empty {} field", tag.name().to_lowercase()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::UnknownColumnPolicy;
    use assert_matches::assert_matches;

    fn header(names: &[&str]) -> Header {
        Header::parse(names, UnknownColumnPolicy::Tolerant).unwrap()
    }

    #[test]
    fn short_row_is_padded() {
        let h = header(&["Vocab", "Translation", "Remark"]);
        let record = Record::from_row(0, &h, &["chat", "cat"]).unwrap();
        assert_eq!(record.get(ColumnTag::Remark), Some(""));
        assert_eq!(record.non_empty(ColumnTag::Remark), None);
        assert_eq!(record.term(), "chat");
    }

    #[test]
    fn long_row_is_rejected() {
        let h = header(&["Vocab", "Translation"]);
        let err = Record::from_row(4, &h, &["chat", "cat", "extra"]).unwrap_err();
        assert_matches!(err, Error::InvalidRecord { index: 4, .. });
    }

    #[test]
    fn ignored_columns_are_dropped() {
        let h = header(&["Vocab", "Translation", "Gender"]);
        let record = Record::from_row(0, &h, &["chat", "cat", "m"]).unwrap();
        assert_eq!(record.get(ColumnTag::Vocab), Some("chat"));
        assert_eq!(record.get(ColumnTag::Translation), Some("cat"));
        assert_eq!(record.get(ColumnTag::Remark), None);
    }

    #[test]
    fn validate_requires_term_and_translation() {
        let h = header(&["Vocab", "Translation"]);
        let ok = Record::from_row(0, &h, &["chat", "cat"]).unwrap();
        assert!(ok.validate().is_ok());

        let blank = Record::from_row(1, &h, &["chat", "  "]).unwrap();
        let err = blank.validate().unwrap_err();
        assert_matches!(
            err,
            Error::InvalidRecord { index: 1, ref reason } if reason.contains("translation")
        );
    }
}
