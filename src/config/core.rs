use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::search::Topk;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Root configuration structure for cifinder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CiFinderConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    /// Issue tracker the B2B names refer to
    #[serde(default)]
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the `/Input`, `/Result` and `/Download` paths are appended to
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_topk")]
    pub default_topk: Topk,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_topk: default_topk(),
        }
    }
}

fn default_topk() -> Topk {
    Topk::default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_directory")]
    pub directory: PathBuf,

    /// Ask the backend to remove its temporary copy after sending it
    #[serde(default = "default_delete_ste")]
    pub delete_ste: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_directory(),
            delete_ste: default_delete_ste(),
        }
    }
}

fn default_download_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_delete_ste() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// URL the ticket number found in a B2B name is appended to
    #[serde(default)]
    pub issue_url_prefix: Option<String>,
}

/// Commented default written by `cifinder init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# cifinder configuration

[backend]
# Base URL of the CI Finder service.
url = "http://localhost:8000"

[search]
# Number of B2B suites requested per search (0-100).
default_topk = 30

[download]
directory = "."
# Ask the service to delete its temporary .ste copy after download.
delete_ste = true

[tracker]
# Ticket links are built by appending the five-digit number in a B2B name.
# issue_url_prefix = "https://tracker.example.com/browse/LS-"
"#;
