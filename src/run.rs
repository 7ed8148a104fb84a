//! The `build`, `inspect` and `dump` commands.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vocadeck_apkg::{read_package, ApkgEmitter, NoteModel};
use vocadeck_builder::{BuildConfig, DeckPipeline, Providers, RunSummary};
use vocadeck_core::{Header, NoteTemplate, UnknownColumnPolicy};

use crate::config::Config;
use crate::providers;
use crate::source::{read_source, SourceTable};

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// Command line overrides for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub deck_name: Option<String>,
    pub package_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub language: Option<String>,
    pub tolerant: bool,
    pub offline: bool,
}

impl BuildOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Explicit deck name, or the input file stem.
    pub fn deck_name(&self) -> String {
        self.deck_name.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Deck".to_string())
        })
    }

    /// Package path inside the output directory.
    pub fn package_path(&self, config: &Config) -> PathBuf {
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| config.deck.output_dir.clone());
        let name = self
            .package_name
            .clone()
            .unwrap_or_else(|| format!("{}.apkg", self.deck_name()));
        dir.join(name)
    }
}

fn policy(config: &Config, tolerant: bool) -> UnknownColumnPolicy {
    if tolerant {
        UnknownColumnPolicy::Tolerant
    } else {
        config.deck.unknown_columns.into()
    }
}

fn read_input(input: &Path) -> Result<SourceTable> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }
    read_source(input).with_context(|| format!("Failed to read {:?}", input))
}

/// Run the whole pipeline for `opts.input` and write the package.
pub async fn build_deck(config: &Config, opts: &BuildOptions) -> Result<RunSummary> {
    let table = read_input(&opts.input)?;
    let header = table
        .header(policy(config, opts.tolerant))
        .context("Invalid header row")?;

    let language = opts.language.as_deref().unwrap_or(&config.deck.language);
    let providers = if opts.offline {
        tracing::info!("Offline build, no providers");
        Providers::none()
    } else {
        crate::config::validate_providers(config)?;
        providers::from_config(config, language)?
    };

    let deck_name = opts.deck_name();
    let output = opts.package_path(config);
    let mut emitter = ApkgEmitter::new(&deck_name, &output);
    if let Some(ref style) = config.deck.style {
        let css = std::fs::read_to_string(style)
            .with_context(|| format!("Failed to read style file: {:?}", style))?;
        emitter = emitter.with_css(css);
    }
    if let Some(ref dir) = config.deck.media_dir {
        emitter = emitter.with_media_dir(dir);
    }

    tracing::info!(deck = %deck_name, input = %opts.input.display(), "Building deck");

    let pipeline = DeckPipeline::new(
        providers,
        BuildConfig::with_timeout(config.providers.timeout()),
    );
    let summary = pipeline
        .run(&header, table.rows.as_slice(), &emitter)
        .await
        .with_context(|| format!("Failed to build deck '{deck_name}'"))?;

    Ok(summary)
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

/// What a build would produce, without calling providers.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub header: Header,
    pub templates: Vec<NoteTemplate>,
    pub fields: Vec<String>,
    pub records: usize,
}

pub fn inspect(config: &Config, input: &Path, tolerant: bool) -> Result<Inspection> {
    let table = read_input(input)?;
    let header = table
        .header(policy(config, tolerant))
        .context("Invalid header row")?;

    let pipeline = DeckPipeline::new(Providers::none(), BuildConfig::default());
    let templates = pipeline.templates(&header)?.to_vec();
    let fields = NoteModel::from_templates("", &templates, "").field_names();

    Ok(Inspection {
        header,
        templates,
        fields,
        records: table.rows.len(),
    })
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Columns:")?;
        for column in self.header.columns() {
            match column.tag {
                Some(tag) => writeln!(f, "  [{}] {} -> {}", column.position, column.label, tag)?,
                None => writeln!(f, "  [{}] {} (ignored)", column.position, column.label)?,
            }
        }
        for warning in self.header.warnings() {
            writeln!(f, "  warning: {warning}")?;
        }

        writeln!(f, "\nTemplates:")?;
        for (ordinal, template) in self.templates.iter().enumerate() {
            writeln!(f, "  {ordinal}. {}", template.to_string().replace('\n', "\n    "))?;
        }

        writeln!(f, "\nFields: {}", self.fields.join(", "))?;
        write!(f, "Records: {}", self.records)
    }
}

// ---------------------------------------------------------------------------
// dump
// ---------------------------------------------------------------------------

/// Write one CSV per note model of `package` into `output_dir`.
///
/// Columns are the model fields plus `tags`. Returns the files written.
pub fn dump_package(package: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let contents = read_package(package)
        .with_context(|| format!("Failed to read package: {:?}", package))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut written = Vec::new();
    let mut names: BTreeMap<String, usize> = BTreeMap::new();
    for model in &contents.models {
        let seen = names.entry(model.name.clone()).or_default();
        let file_name = if *seen == 0 {
            format!("{}.csv", model.name)
        } else {
            format!("{}-{}.csv", model.name, model.id)
        };
        *seen += 1;

        let path = output_dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {:?}", path))?;

        let mut header = model.fields.clone();
        header.push("tags".to_string());
        writer.write_record(&header)?;

        for note in contents.notes_of(model.id) {
            let mut row: Vec<String> = note.fields.clone();
            row.resize(model.fields.len(), String::new());
            row.push(note.tags.join(", "));
            writer.write_record(&row)?;
        }
        writer.flush()?;

        tracing::debug!(path = %path.display(), model = %model.name, "Dumped model");
        written.push(path);
    }

    Ok(written)
}
