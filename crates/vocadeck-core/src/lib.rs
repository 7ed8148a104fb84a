//! vocadeck-core: shared types for turning vocabulary lists into decks.
//!
//! This crate is the foundational dependency for the other vocadeck crates:
//!
//! - **Column tags** ([`ColumnTag`]) and header parsing ([`Header`])
//! - **Records** ([`Record`]): one vocabulary entry keyed by column tag
//! - **Note templates** ([`NoteTemplate`]): inferred card layouts
//! - **Cards** ([`Card`]): resolved field values for one record and template
//! - **Media naming** ([`media`]): content-hash file names and references
//! - **Emitter seam** ([`DeckEmitter`]): turns templates and cards into a package
//! - **Error handling** ([`Error`], [`Result`])

pub mod card;
pub mod column;
pub mod emit;
pub mod error;
pub mod header;
pub mod media;
pub mod record;
pub mod template;

pub use card::{Card, CardField, MediaFile, SlotValue};
pub use column::ColumnTag;
pub use emit::{DeckEmitter, EmittedPackage};
pub use error::{Error, Result};
pub use header::{Header, HeaderColumn, UnknownColumnPolicy};
pub use record::Record;
pub use template::{ContentKind, FieldRole, NoteTemplate, Region, Slot, SlotKey};
