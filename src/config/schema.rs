use serde::{Deserialize, Serialize};

/// On-disk configuration (`~/.config/prompt-archive/config.yaml`).
///
/// Example YAML:
/// ```yaml
/// data_url: "https://script.google.com/macros/s/XXXX/exec"
/// timeout: "10s"
/// retries: 2
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the archive's JSON endpoint. `ARCHIVE_DATA_URL` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,

    /// Per-request timeout as a humantime duration, e.g. "10s" (default: 10s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Retries after a transient fetch failure (default: 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}
