//! OpenAI client: speech and image generation.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vocadeck_builder::{Modality, ModelClient, ModelOutput};

use super::images::{download_image, DEFAULT_MAX_WIDTH};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Voices cycled through for successive speech requests.
const VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

// ---------------------------------------------------------------------------
// Wire types (private)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenAiClient
// ---------------------------------------------------------------------------

/// [`ModelClient`] for the OpenAI REST API.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tts_model: String,
    image_model: String,
    max_width: u32,
    next_voice: AtomicUsize,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        tts_model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tts_model: tts_model.into(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            max_width: DEFAULT_MAX_WIDTH,
            next_voice: AtomicUsize::new(0),
        }
    }

    /// Use `model` (`dall-e-2` or `dall-e-3`) for image generation.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Scale generated pictures down to `max_width`.
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    fn voice(&self) -> &'static str {
        VOICES[self.next_voice.fetch_add(1, Ordering::Relaxed) % VOICES.len()]
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> anyhow::Result<reqwest::Response> {
        let url = format!("{}{endpoint}", self.base_url);
        self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .with_context(|| format!("OpenAI request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("OpenAI request returned error: {url}"))
    }

    async fn speech(&self, text: &str) -> anyhow::Result<bytes::Bytes> {
        let voice = self.voice();
        debug!(model = %self.tts_model, voice, "OpenAI speech");
        self.post(
            "/audio/speech",
            &SpeechRequest {
                model: &self.tts_model,
                input: text,
                voice,
            },
        )
        .await?
        .bytes()
        .await
        .context("failed to read OpenAI speech response")
    }

    async fn image(&self, prompt: &str) -> anyhow::Result<bytes::Bytes> {
        debug!(model = %self.image_model, "OpenAI image generation");
        let body: ImageResponse = self
            .post(
                "/images/generations",
                &ImageRequest {
                    model: &self.image_model,
                    prompt,
                    n: 1,
                    size: IMAGE_SIZE,
                    quality: IMAGE_QUALITY,
                    response_format: "url",
                },
            )
            .await?
            .json()
            .await
            .context("failed to parse OpenAI image response")?;

        let url = body
            .data
            .into_iter()
            .find_map(|d| d.url)
            .context("OpenAI image response has no URL")?;

        download_image(&self.client, &url, self.max_width).await
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn ask(&self, prompt: &str, modality: Modality) -> anyhow::Result<ModelOutput> {
        match modality {
            Modality::Text => anyhow::bail!("OpenAI client only produces audio and images"),
            Modality::Audio => self.speech(prompt).await.map(ModelOutput::Audio),
            Modality::Image => self.image(prompt).await.map(ModelOutput::Image),
        }
    }
}
