//! The card builder: one record and the deck's templates in, cards out.
//!
//! Each distinct slot key is resolved once per record and shared by the
//! record's sibling cards. Provider errors, timeouts and missing providers
//! leave the slot [`SlotValue::Failed`] and are collected as
//! [`SlotFailure`]s; the cards are still produced.

use std::collections::BTreeMap;
use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};
use vocadeck_core::media::MediaKind;
use vocadeck_core::{
    Card, CardField, ContentKind, Error, MediaFile, NoteTemplate, Record, Result, SlotKey,
    SlotValue,
};

use crate::context::BuildConfig;
use crate::provider::Providers;

/// A slot that could not be enriched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotFailure {
    pub record_index: usize,
    /// Term of the record, for reporting.
    pub term: String,
    /// Emitted field name of the slot.
    pub field: String,
    pub provider: String,
    pub reason: String,
}

impl SlotFailure {
    pub fn to_error(&self) -> Error {
        Error::provider(&self.provider, &self.reason)
    }
}

/// Cards built for one record, plus the slots that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRecord {
    pub cards: Vec<Card>,
    pub failures: Vec<SlotFailure>,
}

impl BuiltRecord {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Builds cards with a fixed provider bundle and configuration.
pub struct CardBuilder<'a> {
    providers: &'a Providers,
    config: &'a BuildConfig,
}

impl<'a> CardBuilder<'a> {
    pub fn new(providers: &'a Providers, config: &'a BuildConfig) -> Self {
        Self { providers, config }
    }

    /// Build one card per template for `record`.
    ///
    /// Fails with [`Error::InvalidRecord`] when a required field is blank;
    /// no cards are produced in that case.
    pub async fn build(&self, record: &Record, templates: &[NoteTemplate]) -> Result<BuiltRecord> {
        record.validate()?;

        let mut failures = Vec::new();
        let mut resolved: BTreeMap<SlotKey, SlotValue> = BTreeMap::new();
        for template in templates {
            for key in template.keys() {
                if resolved.contains_key(&key) {
                    continue;
                }
                let value = match self.resolve(record, key).await {
                    Ok(value) => value,
                    Err((provider, reason)) => {
                        warn!(
                            record = record.index(),
                            term = record.term(),
                            field = %key,
                            provider = %provider,
                            reason = %reason,
                            "Slot enrichment failed"
                        );
                        failures.push(SlotFailure {
                            record_index: record.index(),
                            term: record.term().to_string(),
                            field: key.field_name(),
                            provider,
                            reason: reason.clone(),
                        });
                        SlotValue::Failed(reason)
                    }
                };
                resolved.insert(key, value);
            }
        }

        let cards = templates
            .iter()
            .enumerate()
            .map(|(ordinal, template)| Card {
                record_index: record.index(),
                note_key: record.term().to_string(),
                template: template.name.clone(),
                ordinal,
                fields: template
                    .slots
                    .iter()
                    .map(|slot| CardField {
                        slot: *slot,
                        value: resolved.get(&slot.key()).cloned().unwrap_or(SlotValue::Empty),
                    })
                    .collect(),
            })
            .collect();

        Ok(BuiltRecord { cards, failures })
    }

    /// Resolve one slot key. Errors carry `(provider, reason)`.
    async fn resolve(
        &self,
        record: &Record,
        key: SlotKey,
    ) -> std::result::Result<SlotValue, (String, String)> {
        let text = record.get(key.role.column()).unwrap_or_default();

        if key.content == ContentKind::Text {
            return Ok(if text.is_empty() {
                SlotValue::Empty
            } else {
                SlotValue::Text(text.to_string())
            });
        }

        if let Some(literal) = key.literal_column().and_then(|c| record.non_empty(c)) {
            debug!(record = record.index(), field = %key, "Using literal value");
            return Ok(match key.content {
                ContentKind::Audio => SlotValue::Media {
                    reference: MediaKind::Sound.normalize_literal(literal),
                    file: None,
                },
                ContentKind::Image => SlotValue::Media {
                    reference: MediaKind::Image.normalize_literal(literal),
                    file: None,
                },
                _ => SlotValue::Text(literal.trim().to_string()),
            });
        }

        if text.trim().is_empty() {
            return Ok(SlotValue::Empty);
        }

        match key.content {
            ContentKind::Audio => {
                let speaker = self
                    .providers
                    .speaker
                    .as_ref()
                    .ok_or_else(|| missing("speaker"))?;
                let data = self.call(speaker.name(), speaker.speak(text)).await?;
                Ok(media(MediaKind::Sound, text, data))
            }
            ContentKind::Image => {
                let finder = self
                    .providers
                    .image_finder
                    .as_ref()
                    .ok_or_else(|| missing("image finder"))?;
                let data = self.call(finder.name(), finder.find_image(text)).await?;
                Ok(media(MediaKind::Image, text, data))
            }
            ContentKind::Phonetics => {
                let phonemizer = self
                    .providers
                    .phonemizer
                    .as_ref()
                    .ok_or_else(|| missing("phonemizer"))?;
                let ipa = self
                    .call(phonemizer.name(), phonemizer.phonemize(text))
                    .await?;
                Ok(SlotValue::Text(ipa))
            }
            ContentKind::Text => Ok(SlotValue::Text(text.to_string())),
        }
    }

    /// Run one provider call under the configured timeout.
    async fn call<T>(
        &self,
        provider: &str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> std::result::Result<T, (String, String)> {
        debug!(provider, "Calling provider");
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err((provider.to_string(), format!("{e:#}"))),
            Err(_) => Err((
                provider.to_string(),
                format!(
                    "timed out after {:.1}s",
                    self.config.call_timeout.as_secs_f64()
                ),
            )),
        }
    }
}

fn missing(capability: &str) -> (String, String) {
    (
        capability.to_string(),
        format!("no {capability} configured"),
    )
}

fn media(kind: MediaKind, text: &str, data: bytes::Bytes) -> SlotValue {
    let file_name = kind.file_name(text);
    SlotValue::Media {
        reference: kind.reference(&file_name),
        file: Some(MediaFile { file_name, data }),
    }
}

/// Build one record's cards. See [`CardBuilder::build`].
pub async fn build(
    record: &Record,
    templates: &[NoteTemplate],
    providers: &Providers,
    config: &BuildConfig,
) -> Result<BuiltRecord> {
    CardBuilder::new(providers, config)
        .build(record, templates)
        .await
}
