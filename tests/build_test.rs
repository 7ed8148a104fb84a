//! Full builds against mocked HTTP providers and a fake `espeak-ng`.

#![cfg(unix)]

use std::fs;
use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use vocadeck::config::Config;
use vocadeck::run::{build_deck, dump_package, BuildOptions};
use vocadeck_apkg::read_package;
use vocadeck_core::media::MediaKind;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn fake_espeak(dir: &Path) -> PathBuf {
    write_script(dir, "espeak-ng", "#!/bin/sh\necho \" ʃa\"\n")
}

/// Echoes the transcribed term back, and fails unless it follows `--`.
fn echoing_espeak(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "espeak-echo",
        "#!/bin/sh\n[ \"$5\" = \"--\" ] || exit 2\nprintf '%s\\n' \"$6\"\n",
    )
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let script = dir.join(name);
    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

async fn mock_providers() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("tl", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3chat".to_vec()))
        .mount(&server)
        .await;

    let image_url = format!("{}/img/cat.png", server.uri());
    Mock::given(method("GET"))
        .and(path("/images/async"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<a m=\"{{&quot;murl&quot;:&quot;{image_url}&quot;}}\"></a>"
        )))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/img/cat.png"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(1200, 600)))
        .mount(&server)
        .await;

    server
}

fn config(server: &MockServer, dir: &Path) -> Config {
    let mut config = Config::default();
    config.deck.language = "fr".into();
    config.deck.output_dir = dir.to_path_buf();
    config.sound.gtts_url = server.uri();
    config.image.search_url = server.uri();
    config.phonetics.espeak_path = Some(fake_espeak(dir));
    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enriched_deck_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let server = mock_providers().await;
    let input = dir.path().join("french.csv");
    fs::write(
        &input,
        "Vocab,Translation,Sound,Image,Phonetics\nle chat,the cat,,,\nle chien,the dog,,,/ʃjɛ̃/\n",
    )
    .unwrap();

    let summary = build_deck(&config(&server, dir.path()), &BuildOptions::new(&input))
        .await
        .unwrap();
    assert!(summary.is_clean(), "{summary}");
    assert_eq!(summary.cards, 2);

    let package = summary.package.unwrap();
    assert_eq!(package.path, dir.path().join("french.apkg"));

    let contents = read_package(&package.path).unwrap();
    let model = &contents.models[0];
    assert_eq!(
        model.fields,
        vec!["Vocab", "Sound", "Image", "Phonetics", "Translation"]
    );

    let notes: Vec<_> = contents.notes_of(model.id).collect();
    let sound = MediaKind::Sound.file_name("le chat");
    let picture = MediaKind::Image.file_name("le chat");
    assert_eq!(
        notes[0].fields,
        vec![
            "le chat".to_string(),
            format!("[sound:{sound}]"),
            format!("<img src=\"{picture}\">"),
            "/ʃa/".to_string(),
            "the cat".to_string(),
        ]
    );
    // Literal phonetics bypass the phonemizer.
    assert_eq!(notes[1].fields[3], "/ʃjɛ̃/");

    assert!(contents.media.contains(&sound));
    assert!(contents.media.contains(&picture));
    assert_eq!(contents.media.len(), 4);
}

#[tokio::test]
async fn provider_errors_become_failed_slots() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let input = dir.path().join("words.csv");
    fs::write(&input, "Vocab,Translation,Sound\nle chat,the cat,\n").unwrap();

    let mut config = config(&server, dir.path());
    config.phonetics.enabled = false;
    let summary = build_deck(&config, &BuildOptions::new(&input)).await.unwrap();

    assert_eq!(summary.built_records, 1);
    assert_eq!(summary.failed_slots.len(), 1);
    assert_eq!(summary.failed_slots[0].provider, "gtts");
    assert!(summary.package.is_some());
}

#[tokio::test]
async fn suffix_terms_reach_espeak_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let input = dir.path().join("suffixes.csv");
    fs::write(&input, "Vocab,Translation,Phonetics\n-ment,-ly,\n").unwrap();

    let mut config = config(&server, dir.path());
    config.phonetics.espeak_path = Some(echoing_espeak(dir.path()));
    let summary = build_deck(&config, &BuildOptions::new(&input)).await.unwrap();
    assert!(summary.is_clean(), "{summary}");

    let contents = read_package(&summary.package.unwrap().path).unwrap();
    let model = &contents.models[0];
    let phonetics = model.fields.iter().position(|f| f == "Phonetics").unwrap();
    let notes: Vec<_> = contents.notes_of(model.id).collect();
    assert_eq!(notes[0].fields[phonetics], "/-ment/");
}

#[tokio::test]
async fn dump_writes_one_csv_per_model() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("qa.csv");
    fs::write(&input, "Question,Answer,Q&A\nCapital of France?,Paris,\n").unwrap();

    let mut config = Config::default();
    config.deck.output_dir = dir.path().to_path_buf();
    let opts = BuildOptions {
        offline: true,
        deck_name: Some("Geo".into()),
        ..BuildOptions::new(&input)
    };
    let summary = build_deck(&config, &opts).await.unwrap();
    let package = summary.package.unwrap();

    let files = dump_package(&package.path, &dir.path().join("dump")).unwrap();
    assert_eq!(files, vec![dir.path().join("dump").join("Geo.csv")]);
    let csv = fs::read_to_string(&files[0]).unwrap();
    assert_eq!(csv, "Question,Answer,tags\nCapital of France?,Paris,\n");
}
