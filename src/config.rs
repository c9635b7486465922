//! Configuration for the tutor chat crate.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [chat]
//! endpoint = "http://localhost:8787/chat"
//! connect_timeout_secs = 10
//!
//! [anchor]
//! width = 80
//! height = 80
//! margin = 24
//! storage_key = "anchor-position"
//!
//! [panel.expanded]
//! width = 400
//! height = 600
//! offset_x = -410
//! offset_y = -520
//!
//! [storage]
//! dir = "/home/me/.local/share/tutor-chat/positions"
//! ```
//!
//! Writes are atomic (temp file → fsync → rename).

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drag::geometry::Size;
use crate::drag::placement::PanelConfig;
use crate::error::ChatError;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Completion endpoint settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Anchor icon geometry and storage key.
    #[serde(default)]
    pub anchor: AnchorConfig,
    /// Panel layouts.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Position storage location.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[chat]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// URL requests are POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Connection establishment timeout. The stream itself has none.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8787/chat".into()
}

fn default_connect_timeout() -> u64 {
    10
}

/// `[anchor]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Icon width in pixels.
    #[serde(default = "default_anchor_extent")]
    pub width: i32,
    /// Icon height in pixels.
    #[serde(default = "default_anchor_extent")]
    pub height: i32,
    /// Inset from the bottom-right corner for the default position.
    #[serde(default = "default_margin")]
    pub margin: i32,
    /// Key under which the anchor position is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            width: default_anchor_extent(),
            height: default_anchor_extent(),
            margin: default_margin(),
            storage_key: default_storage_key(),
        }
    }
}

impl AnchorConfig {
    /// Icon size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn default_anchor_extent() -> i32 {
    80
}

fn default_margin() -> i32 {
    24
}

fn default_storage_key() -> String {
    "anchor-position".into()
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for position files. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured directory, or `{data_dir}/tutor-chat/positions`.
    pub fn resolved_dir(&self) -> Result<PathBuf, ChatError> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("tutor-chat").join("positions"))
            .ok_or_else(|| ChatError::ConfigError("no platform data directory available".into()))
    }
}

impl TutorConfig {
    /// Default config file location: `{config_dir}/tutor-chat/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tutor-chat")
            .join("config.toml")
    }

    /// Check values that would make the crate misbehave.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.chat.endpoint.trim().is_empty() {
            return Err(ChatError::ConfigError("chat.endpoint must not be empty".into()));
        }
        if self.anchor.width <= 0 || self.anchor.height <= 0 {
            return Err(ChatError::ConfigError("anchor size must be positive".into()));
        }
        for (name, layout) in [("expanded", &self.panel.expanded), ("minimized", &self.panel.minimized)] {
            if layout.width <= 0 || layout.height <= 0 {
                return Err(ChatError::ConfigError(format!(
                    "panel.{name} size must be positive"
                )));
            }
        }
        if self.anchor.storage_key.is_empty() {
            return Err(ChatError::ConfigError("anchor.storage_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Read and validate a config file.
///
/// # Errors
/// Returns `ChatError::ConfigError` if the file cannot be read, parsed or validated.
pub fn read_config(path: &Path) -> Result<TutorConfig, ChatError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ChatError::ConfigError(format!(
            "failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    let config: TutorConfig = toml::from_str(&contents).map_err(|e| {
        ChatError::ConfigError(format!(
            "failed to parse config file '{}': {e}",
            path.display()
        ))
    })?;
    config.validate()?;
    Ok(config)
}

/// Read `path` if it exists, otherwise return defaults.
pub fn load_or_default(path: &Path) -> Result<TutorConfig, ChatError> {
    if path.exists() {
        read_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(TutorConfig::default())
    }
}

/// Write a config file atomically (temp file → fsync → rename).
///
/// # Errors
/// Returns `ChatError::ConfigError` on serialization, write, or rename failure.
pub fn write_config_atomic(path: &Path, config: &TutorConfig) -> Result<(), ChatError> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ChatError::ConfigError(format!("failed to serialize config: {e}")))?;
    let tmp_path = path.with_extension("toml.tmp");

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ChatError::ConfigError(format!(
                "failed to create config directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut file = std::fs::File::create(&tmp_path).map_err(|e| {
        ChatError::ConfigError(format!(
            "failed to create temp file '{}': {e}",
            tmp_path.display()
        ))
    })?;
    file.write_all(toml_str.as_bytes())
        .map_err(|e| ChatError::ConfigError(format!("failed to write temp file: {e}")))?;
    file.sync_all()
        .map_err(|e| ChatError::ConfigError(format!("failed to sync temp file: {e}")))?;

    std::fs::rename(&tmp_path, path).map_err(|e| {
        ChatError::ConfigError(format!(
            "failed to rename temp file to '{}': {e}",
            path.display()
        ))
    })
}
