//! Package writer/reader integration tests.

use std::fs;

use assert_matches::assert_matches;
use bytes::Bytes;
use vocadeck_apkg::{read_package, ApkgEmitter};
use vocadeck_core::{
    Card, CardField, ContentKind, DeckEmitter, Error, FieldRole, MediaFile, NoteTemplate, Region,
    Slot, SlotValue,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn templates() -> Vec<NoteTemplate> {
    let base = NoteTemplate::new(
        "Vocab",
        vec![
            Slot::new(Region::Front, ContentKind::Text, FieldRole::Term),
            Slot::new(Region::Front, ContentKind::Audio, FieldRole::Term),
            Slot::new(Region::Back, ContentKind::Text, FieldRole::Translation),
            Slot::new(Region::Extra, ContentKind::Image, FieldRole::Term),
        ],
    );
    let reversed = base.reversed("Vocab (reversed)");
    vec![base, reversed]
}

fn cards_for(
    index: usize,
    term: &str,
    translation: &str,
    audio: SlotValue,
    image: SlotValue,
) -> Vec<Card> {
    templates()
        .iter()
        .enumerate()
        .map(|(ordinal, template)| Card {
            record_index: index,
            note_key: term.to_string(),
            template: template.name.clone(),
            ordinal,
            fields: template
                .slots
                .iter()
                .map(|slot| CardField {
                    slot: *slot,
                    value: match (slot.content, slot.role) {
                        (ContentKind::Text, FieldRole::Term) => SlotValue::Text(term.into()),
                        (ContentKind::Text, _) => SlotValue::Text(translation.into()),
                        (ContentKind::Audio, _) => audio.clone(),
                        _ => image.clone(),
                    },
                })
                .collect(),
        })
        .collect()
}

fn sound(name: &str) -> SlotValue {
    SlotValue::Media {
        reference: format!("[sound:{name}]"),
        file: Some(MediaFile {
            file_name: name.to_string(),
            data: Bytes::from_static(b"ID3fake"),
        }),
    }
}

fn deck_cards() -> Vec<Card> {
    let mut cards = cards_for(
        0,
        "le chat",
        "the cat\nfeline",
        sound("sound_a.mp3"),
        SlotValue::Media {
            reference: "<img src=\"cat.png\">".into(),
            file: None,
        },
    );
    cards.extend(cards_for(
        1,
        "le chien",
        "the dog",
        sound("sound_a.mp3"),
        SlotValue::Failed("no image found".into()),
    ));
    cards
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn round_trip_models_and_notes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out").join("French.apkg");
    let emitter = ApkgEmitter::new("French", &output);

    let package = emitter.emit(&templates(), &deck_cards()).unwrap();
    assert_eq!(package.path, output);
    assert_eq!(package.notes, 2);
    assert_eq!(package.cards, 4);
    assert_eq!(package.media_files, 1);

    let contents = read_package(&output).unwrap();
    assert_eq!(contents.models.len(), 1);
    let model = &contents.models[0];
    assert_eq!(model.name, "French");
    assert_eq!(model.fields, vec!["Vocab", "Sound", "Image", "Translation"]);

    let notes: Vec<_> = contents.notes_of(model.id).collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(
        notes[0].fields,
        vec![
            "le chat",
            "[sound:sound_a.mp3]",
            "<img src=\"cat.png\">",
            "the cat<br>feline"
        ]
    );
    assert_eq!(notes[1].fields[2], "");
    assert_eq!(contents.media, vec!["sound_a.mp3"]);
}

#[test]
fn guids_are_stable_across_builds() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.apkg");
    let second = dir.path().join("b.apkg");
    ApkgEmitter::new("French", &first)
        .emit(&templates(), &deck_cards())
        .unwrap();
    ApkgEmitter::new("French", &second)
        .emit(&templates(), &deck_cards())
        .unwrap();

    let guids = |path: &std::path::Path| {
        read_package(path)
            .unwrap()
            .notes
            .into_iter()
            .map(|n| n.guid)
            .collect::<Vec<_>>()
    };
    assert_eq!(guids(&first), guids(&second));
    let a = read_package(&first).unwrap();
    let b = read_package(&second).unwrap();
    assert_eq!(a.models[0].id, b.models[0].id);
}

#[test]
fn literal_media_packaged_from_media_dir() {
    let dir = tempfile::tempdir().unwrap();
    let media_dir = dir.path().join("media");
    fs::create_dir_all(&media_dir).unwrap();
    fs::write(media_dir.join("cat.png"), b"\x89PNGfake").unwrap();

    let output = dir.path().join("French.apkg");
    let package = ApkgEmitter::new("French", &output)
        .with_media_dir(&media_dir)
        .with_css(".card { color: red; }")
        .emit(&templates(), &deck_cards())
        .unwrap();

    assert_eq!(package.media_files, 2);
    let contents = read_package(&output).unwrap();
    assert!(contents.media.contains(&"cat.png".to_string()));
    assert!(contents.media.contains(&"sound_a.mp3".to_string()));
}

#[test]
fn no_templates_is_emitter_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = ApkgEmitter::new("French", dir.path().join("x.apkg"))
        .emit(&[], &[])
        .unwrap_err();
    assert_matches!(err, Error::EmitterFailure { .. });
}

#[test]
fn unwritable_output_is_emitter_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"").unwrap();
    let err = ApkgEmitter::new("French", blocker.join("deck.apkg"))
        .emit(&templates(), &deck_cards())
        .unwrap_err();
    assert_matches!(err, Error::EmitterFailure { .. });
}

#[test]
fn reading_garbage_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.apkg");
    fs::write(&path, b"not a zip").unwrap();
    assert_matches!(read_package(&path), Err(Error::Source(_)));
}
