//! The emitter seam: templates and cards in, a package out.

use std::path::PathBuf;

use serde::Serialize;

use crate::card::Card;
use crate::error::Result;
use crate::template::NoteTemplate;

/// What an emitter produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedPackage {
    pub path: PathBuf,
    pub notes: usize,
    pub cards: usize,
    pub media_files: usize,
}

/// Turns a deck's templates and cards into a package.
///
/// Failures are reported as [`crate::Error::EmitterFailure`] and end the run.
pub trait DeckEmitter {
    fn emit(&self, templates: &[NoteTemplate], cards: &[Card]) -> Result<EmittedPackage>;
}
