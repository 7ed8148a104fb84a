//! Cards: resolved slot values for one record and one template.

use bytes::Bytes;

use crate::template::{Slot, SlotKey};

/// A media blob to package alongside the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Resolved value of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// Plain text copied from the record or produced by a phonemizer.
    Text(String),
    /// A media reference (`[sound:..]`, `<img src="..">`).
    ///
    /// `file` is `None` when the reference came from the source file
    /// rather than a provider.
    Media {
        reference: String,
        file: Option<MediaFile>,
    },
    /// Resolution failed; the card is still built.
    Failed(String),
    /// Nothing to show (e.g. a blank optional column).
    Empty,
}

impl SlotValue {
    /// Text placed in the emitted field.
    pub fn field_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Media { reference, .. } => reference,
            Self::Failed(_) | Self::Empty => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One slot of a card with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub slot: Slot,
    pub value: SlotValue,
}

/// One built flashcard instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Index of the record the card was built from.
    pub record_index: usize,
    /// Note identity: the term text.
    pub note_key: String,
    pub template: String,
    /// Position of the template in the inferred list.
    pub ordinal: usize,
    pub fields: Vec<CardField>,
}

impl Card {
    /// Value resolved for `key`, if the card has a slot with that key.
    pub fn value(&self, key: SlotKey) -> Option<&SlotValue> {
        self.fields
            .iter()
            .find(|f| f.slot.key() == key)
            .map(|f| &f.value)
    }

    /// Whether any slot failed to resolve.
    pub fn is_partial(&self) -> bool {
        self.fields.iter().any(|f| f.value.is_failed())
    }

    /// Media blobs carried by the card.
    pub fn media(&self) -> impl Iterator<Item = &MediaFile> + '_ {
        self.fields.iter().filter_map(|f| match &f.value {
            SlotValue::Media {
                file: Some(file), ..
            } => Some(file),
            _ => None,
        })
    }
}
