//! Concrete enrichment providers and their wiring from configuration.
//!
//! - [`gtts::GoogleTts`]: speech through Google Translate
//! - [`openai::OpenAiClient`]: speech and generated images through OpenAI
//! - [`bing::BingImageSearch`]: pictures from Bing image search
//! - [`espeak::EspeakPhonemizer`]: IPA through `espeak-ng`

pub mod bing;
pub mod espeak;
pub mod gtts;
pub mod images;
pub mod openai;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use vocadeck_builder::{ModelClient, ModelIllustrator, ModelSpeaker, Providers};

use crate::config::{Config, SoundEngine};

/// Build the provider bundle described by `config` for a deck in `language`.
///
/// A phonemizer that cannot be located is left out with a warning; the slots
/// that need it are then reported as failed.
pub fn from_config(config: &Config, language: &str) -> anyhow::Result<Providers> {
    let mut providers = Providers::none();

    let openai = openai_client(config)?;

    providers = match config.sound.engine {
        SoundEngine::Gtts => {
            providers.with_speaker(Arc::new(gtts::GoogleTts::new(&config.sound.gtts_url, language)))
        }
        SoundEngine::OpenAi => {
            let client = openai.clone().context("OpenAI sound engine needs an API key")?;
            providers.with_speaker(Arc::new(ModelSpeaker::new(client)))
        }
    };

    providers = match config.image.engine.model() {
        None => {
            let mut bing = bing::BingImageSearch::new(&config.image.search_url, language)?
                .with_adult(&config.image.adult)
                .with_max_width(config.image.max_width);
            if let Some(ref filter) = config.image.filter {
                bing = bing.with_filter(filter);
            }
            providers.with_image_finder(Arc::new(bing))
        }
        Some(_) => {
            let client = openai.context("OpenAI image engine needs an API key")?;
            providers.with_image_finder(Arc::new(ModelIllustrator::new(client)))
        }
    };

    if config.phonetics.enabled {
        let phonemizer = match config.phonetics.espeak_path {
            Some(ref path) => Ok(espeak::EspeakPhonemizer::new(path, language)),
            None => espeak::EspeakPhonemizer::discover(language),
        };
        match phonemizer {
            Ok(p) => providers = providers.with_phonemizer(Arc::new(p)),
            Err(e) => warn!("Phonetics disabled: {e:#}"),
        }
    }

    info!(?providers, "Providers ready");
    Ok(providers)
}

fn openai_client(config: &Config) -> anyhow::Result<Option<Arc<dyn ModelClient>>> {
    let needed =
        config.sound.engine == SoundEngine::OpenAi || config.image.engine.model().is_some();
    if !needed {
        return Ok(None);
    }

    let api_key = config
        .openai
        .resolved_api_key()
        .context("OpenAI engine selected but no API key is configured")?;
    let mut client = openai::OpenAiClient::new(
        &config.openai.base_url,
        api_key,
        &config.openai.tts_model,
    )
    .with_max_width(config.image.max_width);
    if let Some(model) = config.image.engine.model() {
        client = client.with_image_model(model);
    }

    Ok(Some(Arc::new(client)))
}
