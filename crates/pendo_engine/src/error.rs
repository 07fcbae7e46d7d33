//! Error types for wordlist loading and engine runs.

use crate::engine::RunState;
use crate::metrics::RunSummary;
use std::path::PathBuf;
use thiserror::Error;

/// Wordlist loading errors.
#[derive(Error, Debug)]
pub enum WordlistError {
    /// The wordlist path does not exist
    #[error("Wordlist file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Any other I/O failure while reading the wordlist
    #[error("Error loading wordlist {}: {}", .path.display(), .source)]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WordlistError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Load { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Engine configuration and run errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected before construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `run()` was called on an engine that already ran
    #[error("Engine already ran (state: {state})")]
    AlreadyRun { state: RunState },

    /// The run was interrupted; statistics are final
    #[error("Run interrupted after {} attempts", .summary.total)]
    Interrupted { summary: RunSummary },
}

impl EngineError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Final statistics carried by an interruption.
    pub fn interrupted_summary(&self) -> Option<&RunSummary> {
        match self {
            Self::Interrupted { summary } => Some(summary),
            _ => None,
        }
    }
}
