//! Writes the SQLite collection (`collection.anki2`).

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::ids::{field_checksum, id_for_name};
use crate::model::NoteModel;
use crate::render::{strip_html, FIELD_SEPARATOR};
use crate::schema;

/// One note to store, with the card ordinals it generates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub guid: String,
    /// Field values in model order.
    pub fields: Vec<String>,
    pub tags: Vec<String>,
    pub ordinals: Vec<usize>,
}

/// Create a collection at `path` holding one deck, one model and `notes`.
///
/// Returns the number of card rows written.
pub fn write_collection(
    path: &Path,
    deck_name: &str,
    model: &NoteModel,
    notes: &[NoteRow],
    now: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(schema::SCHEMA)?;

    let deck_id = id_for_name(deck_name);
    let secs = now.timestamp();
    let millis = now.timestamp_millis();

    let mut models = serde_json::Map::new();
    models.insert(model.id.to_string(), model.to_json(deck_id, secs));

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
         VALUES (1, ?1, ?2, ?2, ?3, 0, 0, 0, ?4, ?5, ?6, ?7, '{}')",
        params![
            secs,
            millis,
            schema::SCHEMA_VERSION,
            schema::collection_conf(deck_id, model.id).to_string(),
            serde_json::Value::Object(models).to_string(),
            schema::decks(deck_id, deck_name, secs).to_string(),
            schema::deck_conf().to_string(),
        ],
    )?;

    let mut card_count = 0usize;
    {
        let mut insert_note = tx.prepare(
            "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
             VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')",
        )?;
        let mut insert_card = tx.prepare(
            "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor,
                                reps, lapses, left, odue, odid, flags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
        )?;

        for (position, note) in notes.iter().enumerate() {
            let note_id = millis + position as i64;
            let sort_field = strip_html(note.fields.first().map(String::as_str).unwrap_or(""));
            let tags = if note.tags.is_empty() {
                String::new()
            } else {
                format!(" {} ", note.tags.join(" "))
            };
            let flds = note.fields.join(&FIELD_SEPARATOR.to_string());

            insert_note.execute(params![
                note_id,
                note.guid,
                model.id,
                secs,
                tags,
                flds,
                sort_field,
                field_checksum(&sort_field),
            ])?;

            for ord in &note.ordinals {
                let card_id = millis + card_count as i64;
                insert_card.execute(params![
                    card_id,
                    note_id,
                    deck_id,
                    *ord as i64,
                    secs,
                    position as i64 + 1,
                ])?;
                card_count += 1;
            }
        }
    }
    tx.commit()?;

    Ok(card_count)
}
