//! The [`TemplateEngine`] turns a deck's column tags into note templates.

use std::collections::BTreeSet;

use tracing::debug;
use vocadeck_core::{ColumnTag, Error, NoteTemplate, Result};

use crate::transform::{catalog, Draft, TransformRule};

/// Engine that holds transform rules sorted by priority.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    /// Rules sorted by priority descending (highest priority first).
    rules: Vec<TransformRule>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(catalog())
    }
}

impl TemplateEngine {
    /// Create a new engine, sorting rules by priority descending.
    pub fn new(mut rules: Vec<TransformRule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// Infer the note templates for a set of column tags.
    ///
    /// The result depends only on which tags are present, never on the
    /// order they were supplied in.
    pub fn infer(&self, tags: impl IntoIterator<Item = ColumnTag>) -> Result<Vec<NoteTemplate>> {
        let tags: BTreeSet<ColumnTag> = tags.into_iter().collect();

        for required in [ColumnTag::Vocab, ColumnTag::Translation] {
            if !tags.contains(&required) {
                return Err(Error::missing_column(required));
            }
        }

        let mut draft = Draft::default();
        for rule in self.rules.iter().filter(|r| tags.contains(&r.tag)) {
            debug!(tag = %rule.tag, priority = rule.priority, "Applying template rule");
            rule.transform.apply(&mut draft);
        }

        let mut templates = Vec::with_capacity(2);
        if draft.reverse {
            let reversed = draft
                .template
                .reversed(format!("{} (reversed)", draft.template.name));
            templates.push(draft.template);
            templates.push(reversed);
        } else {
            templates.push(draft.template);
        }
        Ok(templates)
    }

    /// Return a reference to the internal rules slice.
    pub fn rules(&self) -> &[TransformRule] {
        &self.rules
    }
}

/// Infer templates with the built-in catalog.
pub fn infer(tags: impl IntoIterator<Item = ColumnTag>) -> Result<Vec<NoteTemplate>> {
    TemplateEngine::default().infer(tags)
}
