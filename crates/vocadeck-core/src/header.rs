//! Header parsing: map source column names to [`ColumnTag`]s.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::column::ColumnTag;
use crate::error::{Error, Result};

/// What to do with a header name that is not a known tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownColumnPolicy {
    /// Reject the header with [`Error::UnknownColumnTag`].
    Strict,
    /// Ignore the column and record a warning.
    Tolerant,
}

/// One column of a parsed header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderColumn {
    /// Zero-based position in the source row.
    pub position: usize,
    /// Name as written in the source file.
    pub label: String,
    /// Bound tag, or `None` for an ignored column.
    pub tag: Option<ColumnTag>,
}

/// Ordered list of header columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    columns: Vec<HeaderColumn>,
    warnings: Vec<String>,
}

impl Header {
    /// Parse header names.
    ///
    /// The first two columns bind to `Vocab` and `Translation` by position,
    /// keeping their names as labels, unless the name is itself a flag or
    /// literal-media tag. Remaining columns must carry a tag name.
    pub fn parse<S: AsRef<str>>(names: &[S], policy: UnknownColumnPolicy) -> Result<Self> {
        let mut columns = Vec::with_capacity(names.len());
        let mut warnings = Vec::new();
        let mut seen = BTreeSet::new();

        for (position, name) in names.iter().enumerate() {
            let label = name.as_ref().trim().to_string();
            let named = ColumnTag::from_name(&label);

            let tag = match position {
                0 | 1 => {
                    let positional = if position == 0 {
                        ColumnTag::Vocab
                    } else {
                        ColumnTag::Translation
                    };
                    match named {
                        Some(tag) if !tag.is_text() => Some(tag),
                        _ => Some(positional),
                    }
                }
                _ => match (named, policy) {
                    (Some(tag), _) => Some(tag),
                    (None, UnknownColumnPolicy::Strict) => {
                        return Err(Error::unknown_column(label));
                    }
                    (None, UnknownColumnPolicy::Tolerant) => {
                        warnings.push(format!(
                            "ignoring unknown column {:?} at position {}",
                            label,
                            position + 1
                        ));
                        None
                    }
                },
            };

            if let Some(tag) = tag {
                if !seen.insert(tag) {
                    return Err(Error::DuplicateColumn { name: label });
                }
            }

            columns.push(HeaderColumn {
                position,
                label,
                tag,
            });
        }

        Ok(Self { columns, warnings })
    }

    /// All columns, including ignored ones.
    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    /// Number of columns in the source header.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The set of bound tags, independent of column order.
    pub fn tags(&self) -> BTreeSet<ColumnTag> {
        self.columns.iter().filter_map(|c| c.tag).collect()
    }

    /// Source label of the column bound to `tag`.
    pub fn label(&self, tag: ColumnTag) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.tag == Some(tag))
            .map(|c| c.label.as_str())
    }

    /// Warnings produced under the tolerant policy.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
