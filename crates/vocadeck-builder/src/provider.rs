//! Capability traits for enrichment providers.
//!
//! Every backend (a hosted TTS endpoint, an image search, a local phonemizer,
//! a language model) satisfies one of these traits. Each call is fallible on
//! its own; the card builder turns errors into failed slots.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

// ---------------------------------------------------------------------------
// Single-purpose capabilities
// ---------------------------------------------------------------------------

/// Text to speech.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Short, lowercase identifier (e.g. `"gtts"`).
    fn name(&self) -> &'static str;

    /// Synthesize `text`; returns MP3 bytes.
    async fn speak(&self, text: &str) -> anyhow::Result<Bytes>;
}

/// Text to phonetic transcription.
#[async_trait]
pub trait Phonemizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transcribe `text`, e.g. `/ʃa/`.
    async fn phonemize(&self, text: &str) -> anyhow::Result<String>;
}

/// Query to picture.
#[async_trait]
pub trait ImageFinder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Find or generate a picture for `query`; returns PNG bytes.
    async fn find_image(&self, query: &str) -> anyhow::Result<Bytes>;
}

// ---------------------------------------------------------------------------
// Language models
// ---------------------------------------------------------------------------

/// Kind of answer requested from a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Audio,
    Image,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// A model's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    Text(String),
    Audio(Bytes),
    Image(Bytes),
}

impl ModelOutput {
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text(_) => Modality::Text,
            Self::Audio(_) => Modality::Audio,
            Self::Image(_) => Modality::Image,
        }
    }
}

/// A hosted model that answers prompts in several modalities.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn ask(&self, prompt: &str, modality: Modality) -> anyhow::Result<ModelOutput>;
}

/// [`Speaker`] backed by a model's audio modality.
pub struct ModelSpeaker {
    client: Arc<dyn ModelClient>,
}

impl ModelSpeaker {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Speaker for ModelSpeaker {
    fn name(&self) -> &'static str {
        self.client.name()
    }

    async fn speak(&self, text: &str) -> anyhow::Result<Bytes> {
        match self.client.ask(text, Modality::Audio).await? {
            ModelOutput::Audio(bytes) => Ok(bytes),
            other => anyhow::bail!("expected audio, model returned {}", other.modality()),
        }
    }
}

/// [`ImageFinder`] backed by a model's image modality.
///
/// The model is asked for a picture that helps memorize the term rather than
/// a literal illustration.
pub struct ModelIllustrator {
    client: Arc<dyn ModelClient>,
}

impl ModelIllustrator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub fn prompt(term: &str) -> String {
        format!("Create a funny/interesting picture that helps to memorize the following term: '{term}'")
    }
}

#[async_trait]
impl ImageFinder for ModelIllustrator {
    fn name(&self) -> &'static str {
        self.client.name()
    }

    async fn find_image(&self, query: &str) -> anyhow::Result<Bytes> {
        match self.client.ask(&Self::prompt(query), Modality::Image).await? {
            ModelOutput::Image(bytes) => Ok(bytes),
            other => anyhow::bail!("expected image, model returned {}", other.modality()),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider bundle
// ---------------------------------------------------------------------------

/// The providers available to a build. A missing provider fails the slots
/// that need it.
#[derive(Clone, Default)]
pub struct Providers {
    pub speaker: Option<Arc<dyn Speaker>>,
    pub phonemizer: Option<Arc<dyn Phonemizer>>,
    pub image_finder: Option<Arc<dyn ImageFinder>>,
}

impl Providers {
    /// No providers at all; only text and literal media resolve.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn with_phonemizer(mut self, phonemizer: Arc<dyn Phonemizer>) -> Self {
        self.phonemizer = Some(phonemizer);
        self
    }

    pub fn with_image_finder(mut self, image_finder: Arc<dyn ImageFinder>) -> Self {
        self.image_finder = Some(image_finder);
        self
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("speaker", &self.speaker.as_ref().map(|p| p.name()))
            .field("phonemizer", &self.phonemizer.as_ref().map(|p| p.name()))
            .field("image_finder", &self.image_finder.as_ref().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl ModelClient for EchoModel {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn ask(&self, prompt: &str, modality: Modality) -> anyhow::Result<ModelOutput> {
            let bytes = Bytes::copy_from_slice(prompt.as_bytes());
            Ok(match modality {
                Modality::Text => ModelOutput::Text(prompt.to_string()),
                Modality::Audio => ModelOutput::Audio(bytes),
                Modality::Image => ModelOutput::Image(bytes),
            })
        }
    }

    struct TextOnlyModel;

    #[async_trait]
    impl ModelClient for TextOnlyModel {
        fn name(&self) -> &'static str {
            "text-only"
        }

        async fn ask(&self, prompt: &str, _modality: Modality) -> anyhow::Result<ModelOutput> {
            Ok(ModelOutput::Text(prompt.to_string()))
        }
    }

    #[tokio::test]
    async fn model_speaker_speaks_the_text() {
        let speaker = ModelSpeaker::new(Arc::new(EchoModel));
        let audio = speaker.speak("le chat").await.unwrap();
        assert_eq!(&audio[..], b"le chat");
        assert_eq!(speaker.name(), "echo");
    }

    #[tokio::test]
    async fn model_illustrator_wraps_the_prompt() {
        let illustrator = ModelIllustrator::new(Arc::new(EchoModel));
        let image = illustrator.find_image("chat").await.unwrap();
        let prompt = String::from_utf8(image.to_vec()).unwrap();
        assert!(prompt.contains("memorize"));
        assert!(prompt.ends_with("'chat'"));
    }

    #[tokio::test]
    async fn wrong_modality_is_an_error() {
        let speaker = ModelSpeaker::new(Arc::new(TextOnlyModel));
        let err = speaker.speak("chat").await.unwrap_err();
        assert!(err.to_string().contains("expected audio"));
    }

    #[test]
    fn providers_debug_lists_names() {
        let providers =
            Providers::none().with_speaker(Arc::new(ModelSpeaker::new(Arc::new(EchoModel))));
        let debug = format!("{providers:?}");
        assert!(debug.contains("Some(\"echo\")"));
        assert!(debug.contains("phonemizer: None"));
    }
}
