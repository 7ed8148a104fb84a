//! vocadeck-builder: resolves note templates into cards.
//!
//! - [`provider`] -- capability traits for speech, phonetics, images and
//!   language models, plus the explicit [`Providers`] bundle.
//! - [`builder`] -- builds one record's cards, recovering slot failures.
//! - [`pipeline`] -- infers templates once, builds every record and hands the
//!   cards to a [`vocadeck_core::DeckEmitter`].
//! - [`report`] -- the run summary.

pub mod builder;
pub mod context;
pub mod pipeline;
pub mod provider;
pub mod report;

pub use builder::{build, BuiltRecord, CardBuilder, SlotFailure};
pub use context::BuildConfig;
pub use pipeline::DeckPipeline;
pub use provider::{
    ImageFinder, Modality, ModelClient, ModelIllustrator, ModelOutput, ModelSpeaker, Phonemizer,
    Providers, Speaker,
};
pub use report::{RunSummary, SkippedRecord};
