//! Deck pipeline: header in, package and run summary out.

use std::sync::Arc;

use tracing::{info, warn};
use vocadeck_core::{DeckEmitter, Header, NoteTemplate, Record, Result};
use vocadeck_infer::TemplateEngine;

use crate::builder::CardBuilder;
use crate::context::BuildConfig;
use crate::provider::Providers;
use crate::report::{RunSummary, SkippedRecord};

/// Runs inference once and the card builder per record.
///
/// Records are processed sequentially. A record either yields all its cards
/// or is skipped and reported.
pub struct DeckPipeline {
    engine: TemplateEngine,
    providers: Providers,
    config: BuildConfig,
}

impl DeckPipeline {
    pub fn new(providers: Providers, config: BuildConfig) -> Self {
        Self {
            engine: TemplateEngine::default(),
            providers,
            config,
        }
    }

    /// Replace the template engine (e.g. with a custom rule catalog).
    pub fn with_engine(mut self, engine: TemplateEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Templates for `header`, shared read-only by every record.
    pub fn templates(&self, header: &Header) -> Result<Arc<[NoteTemplate]>> {
        Ok(self.engine.infer(header.tags())?.into())
    }

    /// Build every row and hand the cards to `emitter`.
    ///
    /// Header errors and emitter failures abort the run; invalid records are
    /// skipped and listed in the summary.
    pub async fn run<S: AsRef<str>>(
        &self,
        header: &Header,
        rows: &[Vec<S>],
        emitter: &dyn DeckEmitter,
    ) -> Result<RunSummary> {
        let templates = self.templates(header)?;
        let mut summary = RunSummary {
            total_records: rows.len(),
            templates: templates.iter().map(|t| t.name.clone()).collect(),
            warnings: header.warnings().to_vec(),
            ..Default::default()
        };
        info!(
            records = rows.len(),
            templates = ?summary.templates,
            "Building deck"
        );

        let builder = CardBuilder::new(&self.providers, &self.config);
        let mut cards = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let built = match Record::from_row(index, header, row.as_slice()) {
                Ok(record) => builder.build(&record, &templates).await,
                Err(e) => Err(e),
            };
            match built {
                Ok(built) => {
                    summary.built_records += 1;
                    summary.failed_slots.extend(built.failures);
                    cards.extend(built.cards);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(record = index, error = %e, "Skipping record");
                    summary.skipped.push(SkippedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        summary.cards = cards.len();
        let package = emitter.emit(&templates, &cards)?;
        info!(
            path = %package.path.display(),
            notes = package.notes,
            cards = package.cards,
            skipped = summary.skipped.len(),
            failed_slots = summary.failed_slots.len(),
            "Deck written"
        );
        summary.package = Some(package);
        Ok(summary)
    }
}
