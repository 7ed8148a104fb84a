mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./vocadeck.toml", "~/.config/vocadeck/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.providers.timeout_secs == 0 {
        anyhow::bail!("Provider timeout cannot be 0");
    }

    if config.image.max_width == 0 {
        anyhow::bail!("Image max width cannot be 0");
    }

    if config.deck.language.trim().is_empty() {
        anyhow::bail!("Deck language cannot be empty");
    }

    if let Some(ref dir) = config.deck.media_dir {
        if !dir.exists() {
            tracing::warn!("Media directory does not exist: {:?}", dir);
        }
    }

    if let Some(ref filter) = config.image.filter {
        if crate::providers::bing::filter_query(filter).is_empty() {
            tracing::warn!("Unknown image filter '{}', searching unfiltered", filter);
        }
    }

    Ok(())
}

/// Validate the provider settings a networked build needs.
///
/// Only `build` (without `--offline`) and `validate` check these.
pub fn validate_providers(config: &Config) -> Result<()> {
    let needs_openai =
        config.sound.engine == SoundEngine::OpenAi || config.image.engine.model().is_some();
    if needs_openai && config.openai.resolved_api_key().is_none() {
        anyhow::bail!(
            "OpenAI engine selected but no API key is configured \
             (set openai.api_key or OPENAI_API_KEY)"
        );
    }

    Ok(())
}
