//! Types for drive API configuration and responses.

use rmusic_core::{FilePage, RemoteFile};
use serde::{Deserialize, Serialize};

/// Mime type the drive uses for folders
pub(crate) const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Configuration for connecting to the drive API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the API (default: `https://www.googleapis.com`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Whole-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Entries requested per listing page (default: 1000)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl DriveConfig {
    /// Create a config pointing at a different API host
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    1000
}

// =============================================================================
// Response Types
// =============================================================================

/// One file resource as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<DriveFile> for RemoteFile {
    fn from(file: DriveFile) -> Self {
        RemoteFile {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
        }
    }
}

/// Response from the files listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<FileList> for FilePage {
    fn from(list: FileList) -> Self {
        FilePage {
            files: list.files.into_iter().map(RemoteFile::from).collect(),
            next_page_token: list.next_page_token,
        }
    }
}

/// Quote a value for use inside a search query string literal.
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
