//! [`ApkgEmitter`]: the `.apkg` implementation of [`DeckEmitter`].

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};
use vocadeck_core::media::MediaKind;
use vocadeck_core::{
    Card, ContentKind, DeckEmitter, EmittedPackage, Error, NoteTemplate, Result, SlotValue,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::collection::{write_collection, NoteRow};
use crate::ids::guid_for;
use crate::model::NoteModel;
use crate::render::field_value;
use crate::schema::DEFAULT_CSS;

/// Writes one deck as an Anki package.
#[derive(Debug, Clone)]
pub struct ApkgEmitter {
    deck_name: String,
    output: PathBuf,
    css: Option<String>,
    media_dir: Option<PathBuf>,
}

impl ApkgEmitter {
    /// Emit deck `deck_name` to the package file `output`.
    pub fn new(deck_name: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            deck_name: deck_name.into(),
            output: output.into(),
            css: None,
            media_dir: None,
        }
    }

    /// Use `css` instead of the default stylesheet.
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    /// Directory searched for files named by literal media references.
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Group cards into notes, one per record.
    fn notes(&self, model: &NoteModel, cards: &[Card]) -> Vec<NoteRow> {
        let mut by_record: BTreeMap<usize, Vec<&Card>> = BTreeMap::new();
        for card in cards {
            by_record.entry(card.record_index).or_default().push(card);
        }

        by_record
            .into_values()
            .map(|siblings| {
                let mut fields = vec![String::new(); model.fields.len()];
                let mut ordinals = Vec::with_capacity(siblings.len());
                for card in &siblings {
                    ordinals.push(card.ordinal);
                    for field in &card.fields {
                        if let Some(index) = model.field_index(field.slot.key()) {
                            fields[index] = field_value(&field.value);
                        }
                    }
                }
                ordinals.sort_unstable();
                ordinals.dedup();
                let guid = guid_for(fields.first().map(String::as_str).unwrap_or(""));
                NoteRow {
                    guid,
                    fields,
                    tags: Vec::new(),
                    ordinals,
                }
            })
            .collect()
    }

    /// Media to package, deduplicated by file name.
    fn media(&self, cards: &[Card]) -> BTreeMap<String, Bytes> {
        let mut media = BTreeMap::new();
        for card in cards {
            for file in card.media() {
                media
                    .entry(file.file_name.clone())
                    .or_insert_with(|| file.data.clone());
            }
            for field in &card.fields {
                let SlotValue::Media {
                    reference,
                    file: None,
                } = &field.value
                else {
                    continue;
                };
                let kind = match field.slot.content {
                    ContentKind::Audio => MediaKind::Sound,
                    ContentKind::Image => MediaKind::Image,
                    _ => continue,
                };
                if let Some(name) = kind.referenced_file(reference) {
                    if !media.contains_key(name) {
                        if let Some(data) = self.literal_file(name) {
                            media.insert(name.to_string(), data);
                        }
                    }
                }
            }
        }
        media
    }

    fn literal_file(&self, name: &str) -> Option<Bytes> {
        let dir = self.media_dir.as_ref()?;
        let path = dir.join(name);
        if !path.is_file() {
            debug!(path = %path.display(), "Literal media file not found");
            return None;
        }
        match fs::read(&path) {
            Ok(data) => Some(Bytes::from(data)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read literal media file");
                None
            }
        }
    }

    fn write_zip(&self, collection: &Path, media: &BTreeMap<String, Bytes>) -> Result<()> {
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.output)?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let zip_err = |e: zip::result::ZipError| Error::emitter(format!("zip: {e}"));

        zip.start_file("collection.anki2", options).map_err(zip_err)?;
        zip.write_all(&fs::read(collection)?)?;

        let mut names = serde_json::Map::new();
        for (index, (name, data)) in media.iter().enumerate() {
            let entry = index.to_string();
            zip.start_file(entry.as_str(), options).map_err(zip_err)?;
            zip.write_all(data)?;
            names.insert(entry, serde_json::Value::String(name.clone()));
        }

        zip.start_file("media", options).map_err(zip_err)?;
        zip.write_all(serde_json::Value::Object(names).to_string().as_bytes())?;
        zip.finish().map_err(zip_err)?;
        Ok(())
    }

    fn write(&self, templates: &[NoteTemplate], cards: &[Card]) -> Result<EmittedPackage> {
        if templates.is_empty() {
            return Err(Error::emitter("no note templates to emit"));
        }

        let css = self.css.as_deref().unwrap_or(DEFAULT_CSS);
        let model = NoteModel::from_templates(&self.deck_name, templates, css);
        let notes = self.notes(&model, cards);
        let media = self.media(cards);

        let workdir = tempfile::tempdir()?;
        let collection = workdir.path().join("collection.anki2");
        let card_rows = write_collection(&collection, &self.deck_name, &model, &notes, Utc::now())
            .map_err(|e| Error::emitter(format!("failed to write collection: {e}")))?;

        self.write_zip(&collection, &media)?;

        info!(
            deck = %self.deck_name,
            path = %self.output.display(),
            notes = notes.len(),
            cards = card_rows,
            media = media.len(),
            "Wrote package"
        );

        Ok(EmittedPackage {
            path: self.output.clone(),
            notes: notes.len(),
            cards: card_rows,
            media_files: media.len(),
        })
    }
}

impl DeckEmitter for ApkgEmitter {
    fn emit(&self, templates: &[NoteTemplate], cards: &[Card]) -> Result<EmittedPackage> {
        self.write(templates, cards).map_err(|e| match e {
            Error::EmitterFailure { .. } => e,
            other => Error::emitter(other.to_string()),
        })
    }
}
