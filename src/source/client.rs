use std::time::{Duration, Instant};

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use crate::archive::raw::value_kind;
use crate::error::ArchiveError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRIES: u32 = 2;

/// Resolved settings for talking to the archive endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Base URL; `None` or blank means the source is not configured
    pub data_url: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            data_url: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }
}

/// The two read-only queries the endpoint answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Prompts,
    Submissions,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Prompts => "prompts",
            Action::Submissions => "submissions",
        }
    }
}

/// Response body shape: `{"data": [...]}`
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
}

/// HTTP client for the spreadsheet-backed JSON endpoint.
///
/// Every call checks the configured location first, so an unconfigured
/// source fails with [`ArchiveError::NotConfigured`] before any I/O.
#[derive(Clone, Debug)]
pub struct ArchiveClient {
    http: reqwest::Client,
    settings: SourceSettings,
}

impl ArchiveClient {
    pub fn new(settings: SourceSettings) -> Result<Self, ArchiveError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("prompt-archive/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ArchiveError::Transport {
                action: "setup",
                source,
            })?;
        Ok(Self { http, settings })
    }

    /// Raw prompt rows, in source order
    pub async fn list_prompts(&self) -> Result<Vec<Value>, ArchiveError> {
        self.fetch_records(Action::Prompts).await
    }

    /// Raw submission rows, in source order
    pub async fn list_submissions(&self) -> Result<Vec<Value>, ArchiveError> {
        self.fetch_records(Action::Submissions).await
    }

    fn endpoint(&self, action: Action) -> Result<Url, ArchiveError> {
        let base = self
            .settings
            .data_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ArchiveError::NotConfigured)?;

        let mut url = Url::parse(base).map_err(|e| ArchiveError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("action", action.as_str());
        Ok(url)
    }

    async fn fetch_records(&self, action: Action) -> Result<Vec<Value>, ArchiveError> {
        let url = self.endpoint(action)?;
        let started = Instant::now();

        // Exponential backoff, only for network errors and 5xx responses
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.settings.retries as usize);

        let records = RetryIf::spawn(
            retry_strategy,
            || self.fetch_once(action, url.clone()),
            |e: &ArchiveError| {
                let transient = e.is_transient();
                if transient {
                    tracing::debug!(action = action.as_str(), error = %e, "transient fetch failure");
                }
                transient
            },
        )
        .await?;

        tracing::debug!(
            action = action.as_str(),
            records = records.len(),
            elapsed = ?started.elapsed(),
            "fetched archive records"
        );
        Ok(records)
    }

    async fn fetch_once(&self, action: Action, url: Url) -> Result<Vec<Value>, ArchiveError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ArchiveError::Transport {
                action: action.as_str(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::Status {
                action: action.as_str(),
                status,
            });
        }

        let envelope: Envelope = response.json().await.map_err(|e| ArchiveError::Payload {
            action: action.as_str(),
            reason: e.to_string(),
        })?;

        match envelope.data {
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(ArchiveError::Payload {
                action: action.as_str(),
                reason: format!("`data` is {}, expected an array", value_kind(&other)),
            }),
            None => Err(ArchiveError::Payload {
                action: action.as_str(),
                reason: "missing `data` field".to_string(),
            }),
        }
    }
}
