//! Configuration file support for boxsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `BOXSYNC_`, e.g. `BOXSYNC_HTB_TOKEN`)
//! 2. Local config file (./boxsync.toml)
//! 3. XDG config file (~/.config/boxsync/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [htb]
//! url = "https://labs.hackthebox.com"  # optional, this is the default
//! token = "..."                        # or BOXSYNC_HTB_TOKEN
//!
//! [notion]
//! url = "https://api.notion.com"       # optional, this is the default
//! token = "secret_..."                 # or BOXSYNC_NOTION_TOKEN
//! database = "..."                     # or BOXSYNC_NOTION_DATABASE
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Default challenge-platform host.
const DEFAULT_HTB_URL: &str = "https://labs.hackthebox.com";

/// Default tracker-database host.
const DEFAULT_NOTION_URL: &str = "https://api.notion.com";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Challenge-platform configuration.
    pub htb: HtbConfig,
    /// Tracker-database configuration.
    pub notion: NotionConfig,
}

/// Challenge-platform configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HtbConfig {
    /// Platform base URL.
    pub url: Option<String>,
    /// Platform API token (app token).
    /// Can also be set via BOXSYNC_HTB_TOKEN.
    pub token: Option<String>,
}

/// Tracker-database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// API base URL.
    pub url: Option<String>,
    /// Integration token.
    /// Can also be set via BOXSYNC_NOTION_TOKEN.
    pub token: Option<String>,
    /// Target database ID.
    /// Can also be set via BOXSYNC_NOTION_DATABASE.
    pub database: Option<String>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "boxsync") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("boxsync.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./boxsync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("BOXSYNC")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the platform base URL, falling back to the public host.
    pub fn htb_url(&self) -> String {
        self.htb
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_HTB_URL.to_string())
    }

    /// Get the platform token.
    pub fn htb_token(&self) -> Option<String> {
        self.htb.token.clone()
    }

    /// Get the tracker API base URL.
    pub fn notion_url(&self) -> String {
        self.notion
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_NOTION_URL.to_string())
    }

    /// Get the tracker integration token.
    pub fn notion_token(&self) -> Option<String> {
        self.notion.token.clone()
    }

    /// Get the target database ID.
    pub fn notion_database(&self) -> Option<String> {
        self.notion.database.clone()
    }
}
