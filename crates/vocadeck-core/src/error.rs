//! Unified error type for deck building.
//!
//! Header problems and emitter failures abort a run. [`Error::InvalidRecord`]
//! is recovered at the record boundary and [`Error::ProviderFailure`] at the
//! slot boundary; see [`Error::is_recoverable`].

use crate::column::ColumnTag;

/// Errors raised while reading, inferring, building or emitting a deck.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One of the two mandatory columns (term, translation) is absent.
    #[error("missing required column: {column}")]
    MissingRequiredColumn {
        /// The tag that was expected.
        column: ColumnTag,
    },

    /// A header name does not match any known column tag.
    #[error("unknown column tag: {name:?}")]
    UnknownColumnTag {
        /// The header name as written in the source file.
        name: String,
    },

    /// The same column tag appears twice in one header.
    #[error("duplicate column: {name:?}")]
    DuplicateColumn {
        /// The header name of the second occurrence.
        name: String,
    },

    /// A record failed validation and was skipped.
    #[error("invalid record #{index}: {reason}")]
    InvalidRecord {
        /// Zero-based position of the record in the source.
        index: usize,
        /// Human-readable reason.
        reason: String,
    },

    /// An enrichment provider could not resolve a slot.
    #[error("provider failure [{provider}]: {message}")]
    ProviderFailure {
        /// Provider name (e.g. "gtts", "bing").
        provider: String,
        /// Human-readable error description.
        message: String,
    },

    /// The package could not be produced.
    #[error("emitter failure: {message}")]
    EmitterFailure {
        /// Human-readable error description.
        message: String,
    },

    /// The input file could not be read or parsed.
    #[error("source error: {0}")]
    Source(String),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::MissingRequiredColumn`].
    pub fn missing_column(column: ColumnTag) -> Self {
        Error::MissingRequiredColumn { column }
    }

    /// Convenience constructor for [`Error::UnknownColumnTag`].
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Error::UnknownColumnTag { name: name.into() }
    }

    /// Convenience constructor for [`Error::InvalidRecord`].
    pub fn invalid_record(index: usize, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Error::ProviderFailure`].
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ProviderFailure {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::EmitterFailure`].
    pub fn emitter(message: impl Into<String>) -> Self {
        Error::EmitterFailure {
            message: message.into(),
        }
    }

    /// Whether a run can continue after this error.
    ///
    /// Record and slot level failures are reported and skipped; everything
    /// else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidRecord { .. } | Error::ProviderFailure { .. }
        )
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
