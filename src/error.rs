use std::fmt;

/// Broad classes of failure the presentation layer distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Data source location missing or unusable
    Configuration,
    /// Network failure, non-success response or undecodable body
    Transport,
    /// A raw record missing a structurally required field
    MalformedRecord,
}

/// Which kind of raw record failed to normalize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Prompt,
    Submission,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Prompt => f.write_str("prompt"),
            RecordKind::Submission => f.write_str("submission"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Data source not configured. ARCHIVE_DATA_URL environment variable is missing or empty.")]
    NotConfigured,

    #[error("Invalid data source URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Fetch {action} failed: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch {action} failed: {status}")]
    Status {
        action: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Fetch {action} returned an unexpected payload: {reason}")]
    Payload { action: &'static str, reason: String },

    #[error("Malformed {kind} record at index {index}: {reason}")]
    MalformedRecord {
        kind: RecordKind,
        index: usize,
        reason: String,
    },
}

impl ArchiveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ArchiveError::NotConfigured | ArchiveError::InvalidUrl { .. } => {
                ErrorCategory::Configuration
            }
            ArchiveError::Transport { .. }
            | ArchiveError::Status { .. }
            | ArchiveError::Payload { .. } => ErrorCategory::Transport,
            ArchiveError::MalformedRecord { .. } => ErrorCategory::MalformedRecord,
        }
    }

    /// Whether retrying the same request could succeed.
    /// Only network failures and server-side (5xx) responses qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            ArchiveError::Transport { .. } => true,
            ArchiveError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
