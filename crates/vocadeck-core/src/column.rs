//! Column tags: the closed set of semantic roles a source column can carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized semantic role of a source-text column.
///
/// The declaration order is the canonical ordering used when tags are
/// collected into sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnTag {
    Vocab,
    Translation,
    Reverse,
    #[serde(rename = "Q&A")]
    QAndA,
    Listen,
    Sound,
    Image,
    Phonetics,
    Remark,
}

impl ColumnTag {
    /// Every tag in canonical order.
    pub const ALL: [ColumnTag; 9] = [
        Self::Vocab,
        Self::Translation,
        Self::Reverse,
        Self::QAndA,
        Self::Listen,
        Self::Sound,
        Self::Image,
        Self::Phonetics,
        Self::Remark,
    ];

    /// Match a header name against the known tags.
    ///
    /// Matching trims surrounding whitespace and ignores case. `QA` is
    /// accepted for `Q&A`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("QA") {
            return Some(Self::QAndA);
        }
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// Canonical header name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vocab => "Vocab",
            Self::Translation => "Translation",
            Self::Reverse => "Reverse",
            Self::QAndA => "Q&A",
            Self::Listen => "Listen",
            Self::Sound => "Sound",
            Self::Image => "Image",
            Self::Phonetics => "Phonetics",
            Self::Remark => "Remark",
        }
    }

    /// Tags whose values are copied into text fields.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Vocab | Self::Translation | Self::Remark)
    }

    /// Tags whose non-empty value replaces a provider call.
    pub fn is_literal_media(self) -> bool {
        matches!(self, Self::Sound | Self::Image | Self::Phonetics)
    }

    /// Tags where only presence matters.
    pub fn is_flag(self) -> bool {
        matches!(self, Self::Reverse | Self::QAndA | Self::Listen)
    }

    /// Vocab and Translation must be present in every header.
    pub fn is_required(self) -> bool {
        matches!(self, Self::Vocab | Self::Translation)
    }
}

impl fmt::Display for ColumnTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
