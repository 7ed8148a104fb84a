use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use vocadeck_core::UnknownColumnPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub deck: DeckConfig,

    #[serde(default)]
    pub sound: SoundConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub phonetics: PhoneticsConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeckConfig {
    /// Language code of the vocabulary column (e.g. "fr")
    #[serde(default = "default_language")]
    pub language: String,

    /// What to do with columns whose header is not a known tag
    #[serde(default)]
    pub unknown_columns: UnknownColumns,

    /// Stylesheet file applied to the note model
    #[serde(default)]
    pub style: Option<PathBuf>,

    /// Directory searched for literal Sound/Image files
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            unknown_columns: UnknownColumns::default(),
            style: None,
            media_dir: None,
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownColumns {
    #[default]
    Strict,
    Tolerant,
}

impl From<UnknownColumns> for UnknownColumnPolicy {
    fn from(value: UnknownColumns) -> Self {
        match value {
            UnknownColumns::Strict => UnknownColumnPolicy::Strict,
            UnknownColumns::Tolerant => UnknownColumnPolicy::Tolerant,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundConfig {
    #[serde(default)]
    pub engine: SoundEngine,

    /// Base URL of the Google Translate TTS endpoint
    #[serde(default = "default_gtts_url")]
    pub gtts_url: String,
}

fn default_gtts_url() -> String {
    "https://translate.google.com".to_string()
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            engine: SoundEngine::default(),
            gtts_url: default_gtts_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEngine {
    #[default]
    Gtts,
    #[serde(alias = "whisper")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub engine: ImageEngine,

    /// Bing filter shorthand: line, linedrawing, photo, clipart, transparent
    #[serde(default)]
    pub filter: Option<String>,

    /// Bing `adlt` value
    #[serde(default = "default_adult")]
    pub adult: String,

    /// Images wider than this are scaled down
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_search_url")]
    pub search_url: String,
}

fn default_adult() -> String {
    "off".to_string()
}

fn default_max_width() -> u32 {
    800
}

fn default_search_url() -> String {
    "https://www.bing.com".to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            engine: ImageEngine::default(),
            filter: None,
            adult: default_adult(),
            max_width: default_max_width(),
            search_url: default_search_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ImageEngine {
    #[default]
    #[serde(rename = "bing")]
    Bing,
    #[serde(rename = "dall-e-2")]
    DallE2,
    #[serde(rename = "dall-e-3")]
    DallE3,
}

impl ImageEngine {
    /// Image model name for the generation engines.
    pub fn model(self) -> Option<&'static str> {
        match self {
            Self::Bing => None,
            Self::DallE2 => Some("dall-e-2"),
            Self::DallE3 => Some("dall-e-3"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhoneticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Custom espeak-ng executable (found in PATH otherwise)
    #[serde(default)]
    pub espeak_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for PhoneticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            espeak_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// API key; `OPENAI_API_KEY` is used when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_url")]
    pub base_url: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_url(),
            tts_model: default_tts_model(),
        }
    }
}

impl OpenAiConfig {
    /// Configured key, falling back to the `OPENAI_API_KEY` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Upper bound for a single provider call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
