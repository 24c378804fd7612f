/// Service configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the config file next to the executable.
pub const CONFIG_FILE_NAME: &str = "scriptpad.json";
/// File name of the default socket.
pub const SOCKET_FILE_NAME: &str = "scriptpad.sock";

const MIN_FRAME_BYTES: usize = 1024;
const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;
const MAX_VIEWPORT_LINES: usize = 10_000;

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket the server listens on. Empty = `default_socket_path()`.
    pub socket_path: String,
    /// Number of lines each editor's viewport shows.
    pub viewport_lines: usize,
    /// Maximum undo depth per editor.
    pub max_history_depth: usize,
    /// Largest request or reply frame accepted, in bytes.
    pub max_frame_bytes: usize,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket_path: String::new(),
            viewport_lines: 40,
            max_history_depth: 10_000,
            max_frame_bytes: 4 * 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Returns the config file path: exe directory + `scriptpad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Default socket location: the user runtime dir, else the temp dir.
    pub fn default_socket_path() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(SOCKET_FILE_NAME)
    }

    /// The socket path to use, falling back to `default_socket_path()`.
    pub fn resolved_socket_path(&self) -> PathBuf {
        if self.socket_path.is_empty() {
            Self::default_socket_path()
        } else {
            PathBuf::from(&self.socket_path)
        }
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<ServiceConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left for the user to fix.
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write config: {}", path.display()))
    }

    /// Clamps values to valid ranges and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.viewport_lines = self.viewport_lines.clamp(1, MAX_VIEWPORT_LINES);
        self.max_history_depth = self.max_history_depth.max(1);
        self.max_frame_bytes = self.max_frame_bytes.clamp(MIN_FRAME_BYTES, MAX_FRAME_BYTES);
        self.socket_path = self.socket_path.trim().to_string();
        if self.log_filter.trim().is_empty() {
            self.log_filter = "info".to_string();
        }
    }
}
