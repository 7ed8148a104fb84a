//! Google Translate text-to-speech.

use anyhow::Context;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tracing::debug;
use vocadeck_builder::Speaker;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The endpoint rejects longer texts.
const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

// ---------------------------------------------------------------------------
// GoogleTts
// ---------------------------------------------------------------------------

/// [`Speaker`] backed by the `translate_tts` endpoint.
pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl GoogleTts {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, language)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        }
    }

    async fn fetch_chunk(&self, chunk: &str) -> anyhow::Result<Bytes> {
        let url = format!("{}/translate_tts", self.base_url);
        debug!(lang = %self.language, chars = chunk.chars().count(), "gTTS request");

        self.client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
            ])
            .send()
            .await
            .with_context(|| format!("gTTS request failed: {url}"))?
            .error_for_status()
            .context("gTTS request returned error")?
            .bytes()
            .await
            .context("failed to read gTTS response")
    }
}

/// Split `text` at whitespace into pieces of at most [`MAX_CHUNK_CHARS`]
/// characters. Words longer than that are cut.
fn chunks(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > MAX_CHUNK_CHARS {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(MAX_CHUNK_CHARS);
            out.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > MAX_CHUNK_CHARS {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[async_trait]
impl Speaker for GoogleTts {
    fn name(&self) -> &'static str {
        "gtts"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<Bytes> {
        let pieces = chunks(text);
        if pieces.is_empty() {
            anyhow::bail!("nothing to speak");
        }

        let mut audio = BytesMut::new();
        for piece in &pieces {
            audio.extend_from_slice(&self.fetch_chunk(piece).await?);
        }
        Ok(audio.freeze())
    }
}
