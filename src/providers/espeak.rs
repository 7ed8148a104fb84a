//! IPA transcription through the `espeak-ng` command line tool.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use vocadeck_builder::Phonemizer;

/// Executable looked up in `PATH` when no path is configured.
pub const ESPEAK_BINARY: &str = "espeak-ng";

/// espeak voice for a deck language.
pub fn voice_for(language: &str) -> String {
    match language {
        "fr" => "fr-fr".to_string(),
        "en" => "en-us".to_string(),
        other => other.to_string(),
    }
}

/// Wrap espeak output as `/…/`: trimmed, one line.
fn format_ipa(stdout: &str) -> String {
    let joined = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("/{joined}/")
}

/// [`Phonemizer`] that runs `espeak-ng -q --ipa`.
///
/// The term is passed after `--`, so suffix entries such as `-ment` are
/// transcribed instead of parsed as options.
pub struct EspeakPhonemizer {
    program: PathBuf,
    voice: String,
}

impl EspeakPhonemizer {
    pub fn new(program: impl Into<PathBuf>, language: &str) -> Self {
        Self {
            program: program.into(),
            voice: voice_for(language),
        }
    }

    /// Locate `espeak-ng` in `PATH`.
    pub fn discover(language: &str) -> anyhow::Result<Self> {
        let program = which::which(ESPEAK_BINARY)
            .with_context(|| format!("{ESPEAK_BINARY} not found in PATH"))?;
        Ok(Self::new(program, language))
    }
}

#[async_trait]
impl Phonemizer for EspeakPhonemizer {
    fn name(&self) -> &'static str {
        "espeak"
    }

    async fn phonemize(&self, text: &str) -> anyhow::Result<String> {
        debug!(voice = %self.voice, "espeak-ng transcription");
        let output = Command::new(&self.program)
            .args(["-q", "--ipa", "-v", self.voice.as_str(), "--", text])
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            anyhow::bail!("{} produced no transcription", self.program.display());
        }
        Ok(format_ipa(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voices() {
        assert_eq!(voice_for("fr"), "fr-fr");
        assert_eq!(voice_for("en"), "en-us");
        assert_eq!(voice_for("de"), "de");
    }

    #[test]
    fn output_is_wrapped() {
        assert_eq!(format_ipa(" lə ʃa\n"), "/lə ʃa/");
        assert_eq!(format_ipa("bɔ̃ʒuʁ\n\nmɔ̃d\n"), "/bɔ̃ʒuʁ mɔ̃d/");
    }

    #[tokio::test]
    async fn missing_program_fails() {
        let phonemizer = EspeakPhonemizer::new("/nonexistent/espeak-ng", "fr");
        assert!(phonemizer.phonemize("chat").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_program_with_voice() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("espeak-ng");
        std::fs::write(&script, "#!/bin/sh\necho \" $4:$6\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let phonemizer = EspeakPhonemizer::new(&script, "fr");
        assert_eq!(phonemizer.phonemize("chat").await.unwrap(), "/fr-fr:chat/");
        assert_eq!(phonemizer.phonemize("-ment").await.unwrap(), "/fr-fr:-ment/");
    }
}
