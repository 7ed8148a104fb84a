//! Read an `.apkg` package back into models and notes.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use rusqlite::Connection;
use serde::Deserialize;
use vocadeck_core::{Error, Result};
use zip::ZipArchive;

use crate::render::FIELD_SEPARATOR;

/// A note model as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageModel {
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
}

/// A note with its field values in model order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNote {
    pub model_id: i64,
    pub guid: String,
    pub fields: Vec<String>,
    pub tags: Vec<String>,
}

/// Everything `read_package` extracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageContents {
    pub models: Vec<PackageModel>,
    pub notes: Vec<PackageNote>,
    /// Packaged media file names.
    pub media: Vec<String>,
}

impl PackageContents {
    /// Notes belonging to `model_id`.
    pub fn notes_of(&self, model_id: i64) -> impl Iterator<Item = &PackageNote> + '_ {
        self.notes.iter().filter(move |n| n.model_id == model_id)
    }
}

#[derive(Deserialize)]
struct RawModel {
    name: String,
    flds: Vec<RawField>,
}

#[derive(Deserialize)]
struct RawField {
    name: String,
}

fn corrupt(message: impl std::fmt::Display) -> Error {
    Error::Source(format!("invalid package: {message}"))
}

/// Read models, notes and the media list from the package at `path`.
pub fn read_package(path: &Path) -> Result<PackageContents> {
    let mut archive = ZipArchive::new(File::open(path)?).map_err(corrupt)?;

    let workdir = tempfile::tempdir()?;
    let collection = workdir.path().join("collection.anki2");
    {
        let mut entry = archive.by_name("collection.anki2").map_err(corrupt)?;
        let mut out = File::create(&collection)?;
        io::copy(&mut entry, &mut out)?;
    }

    let media = match archive.by_name("media") {
        Ok(mut entry) => {
            let mut json = String::new();
            entry.read_to_string(&mut json)?;
            let map: BTreeMap<String, String> = serde_json::from_str(&json).map_err(corrupt)?;
            let mut numbered: Vec<(u64, String)> = map
                .into_iter()
                .map(|(k, v)| (k.parse().unwrap_or(u64::MAX), v))
                .collect();
            numbered.sort();
            numbered.into_iter().map(|(_, v)| v).collect()
        }
        Err(_) => Vec::new(),
    };

    let conn = Connection::open(&collection).map_err(corrupt)?;
    let models_json: String = conn
        .query_row("SELECT models FROM col", [], |row| row.get(0))
        .map_err(corrupt)?;
    let raw: BTreeMap<String, RawModel> = serde_json::from_str(&models_json).map_err(corrupt)?;
    let models = raw
        .into_iter()
        .map(|(id, model)| {
            Ok(PackageModel {
                id: id.parse().map_err(corrupt)?,
                name: model.name,
                fields: model.flds.into_iter().map(|f| f.name).collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut stmt = conn
        .prepare("SELECT mid, guid, flds, tags FROM notes ORDER BY id")
        .map_err(corrupt)?;
    let notes = stmt
        .query_map([], |row| {
            let flds: String = row.get(2)?;
            let tags: String = row.get(3)?;
            Ok(PackageNote {
                model_id: row.get(0)?,
                guid: row.get(1)?,
                fields: flds.split(FIELD_SEPARATOR).map(str::to_string).collect(),
                tags: tags.split_whitespace().map(str::to_string).collect(),
            })
        })
        .map_err(corrupt)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(corrupt)?;

    Ok(PackageContents {
        models,
        notes,
        media,
    })
}
