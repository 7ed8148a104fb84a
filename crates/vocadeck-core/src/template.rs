//! Note templates: derived card layouts made of slots.

use serde::Serialize;
use std::fmt;

use crate::column::ColumnTag;

/// Card region a slot is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Front,
    Back,
    Extra,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
            Self::Extra => write!(f, "extra"),
        }
    }
}

/// What a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Audio,
    Image,
    Phonetics,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
            Self::Phonetics => write!(f, "phonetics"),
        }
    }
}

/// Which record value a slot is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Term,
    Translation,
    Question,
    Answer,
    Remark,
}

impl FieldRole {
    /// Column the role reads its text from.
    pub fn column(self) -> ColumnTag {
        match self {
            Self::Term | Self::Question => ColumnTag::Vocab,
            Self::Translation | Self::Answer => ColumnTag::Translation,
            Self::Remark => ColumnTag::Remark,
        }
    }

    /// Roles that read the first column.
    pub fn is_prompt(self) -> bool {
        matches!(self, Self::Term | Self::Question)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Term => "Vocab",
            Self::Translation => "Translation",
            Self::Question => "Question",
            Self::Answer => "Answer",
            Self::Remark => "Remark",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a resolved value and of an emitted field.
///
/// Ordering is by role, then content kind; emitters use it to lay out
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotKey {
    pub role: FieldRole,
    pub content: ContentKind,
}

impl SlotKey {
    pub fn new(content: ContentKind, role: FieldRole) -> Self {
        Self { role, content }
    }

    /// Emitted field name.
    ///
    /// Text fields are named after their role. Media fields of the prompt
    /// role take the media name alone (`Sound`, `Image`, `Phonetics`);
    /// other roles append the role (`Sound Answer`).
    pub fn field_name(&self) -> String {
        let media = match self.content {
            ContentKind::Text => return self.role.label().to_string(),
            ContentKind::Audio => "Sound",
            ContentKind::Image => "Image",
            ContentKind::Phonetics => "Phonetics",
        };
        if self.role.is_prompt() {
            media.to_string()
        } else {
            format!("{media} {}", self.role.label())
        }
    }

    /// Column whose non-empty value is used as-is for this key.
    pub fn literal_column(&self) -> Option<ColumnTag> {
        if !self.role.is_prompt() {
            return None;
        }
        match self.content {
            ContentKind::Audio => Some(ColumnTag::Sound),
            ContentKind::Image => Some(ColumnTag::Image),
            ContentKind::Phonetics => Some(ColumnTag::Phonetics),
            ContentKind::Text => None,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field_name())
    }
}

/// One unit of a note template that the card builder resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    pub region: Region,
    pub content: ContentKind,
    pub role: FieldRole,
}

impl Slot {
    pub fn new(region: Region, content: ContentKind, role: FieldRole) -> Self {
        Self {
            region,
            content,
            role,
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.content, self.role)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.region, self.content, self.role)
    }
}

/// Derived card layout: a name and ordered slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteTemplate {
    pub name: String,
    pub slots: Vec<Slot>,
}

impl NoteTemplate {
    pub fn new(name: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }

    /// Slots of one region, in layout order.
    pub fn slots_in(&self, region: Region) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().filter(move |s| s.region == region)
    }

    /// Distinct slot keys in first-appearance order.
    pub fn keys(&self) -> Vec<SlotKey> {
        let mut keys = Vec::new();
        for slot in &self.slots {
            let key = slot.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn contains(&self, region: Region, content: ContentKind, role: FieldRole) -> bool {
        self.slots.contains(&Slot::new(region, content, role))
    }

    /// A copy with Front and Back swapped; Extra is kept in place.
    pub fn reversed(&self, name: impl Into<String>) -> Self {
        let swap = |region: Region| match region {
            Region::Front => Region::Back,
            Region::Back => Region::Front,
            Region::Extra => Region::Extra,
        };
        let mut slots: Vec<Slot> = Vec::with_capacity(self.slots.len());
        for region in [Region::Back, Region::Front, Region::Extra] {
            slots.extend(self.slots_in(region).map(|s| Slot {
                region: swap(s.region),
                ..*s
            }));
        }
        Self::new(name, slots)
    }
}

impl fmt::Display for NoteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for region in [Region::Front, Region::Back, Region::Extra] {
            let slots: Vec<String> = self
                .slots_in(region)
                .map(|s| format!("{}({})", s.content, s.role))
                .collect();
            if !slots.is_empty() {
                write!(f, "\n  {region}: {}", slots.join(", "))?;
            }
        }
        Ok(())
    }
}
