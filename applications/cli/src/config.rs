/// CLI configuration
use crate::error::{CliError, Result};
use rmusic_core::LibraryLayout;
use rmusic_drive::DriveConfig;
use rmusic_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when no `--config` path is given and it exists
pub const DEFAULT_CONFIG_FILE: &str = "rmusic.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub library: LibraryLayout,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Bearer token issued by the sign-in flow
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Files downloaded and parsed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    8
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `rmusic.toml` in the working
    /// directory is read if present. Environment variables prefixed with
    /// `RMUSIC_` override file values, with `__` between nested keys
    /// (`RMUSIC_AUTH__ACCESS_TOKEN`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("RMUSIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token.trim().is_empty() {
            return Err(CliError::Config(
                "access token is required (set RMUSIC_AUTH__ACCESS_TOKEN)".to_string(),
            ));
        }

        self.playback
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        if self.export.concurrency == 0 {
            return Err(CliError::Config(
                "export concurrency must be at least 1".to_string(),
            ));
        }

        if self.drive.page_size == 0 {
            return Err(CliError::Config(
                "drive page size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
