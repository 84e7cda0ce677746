//! Configuration management.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration for promptvault.
///
/// Built once at startup and handed to the pieces that need it; nothing
/// reads configuration files after this point.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Path to the `SQLite` database.
    pub db_path: PathBuf,
    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
    /// Chat provider configuration for AI-assisted authoring.
    pub chat: ChatConfig,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingConfig {
    /// API endpoint (OpenAI-compatible, includes the `/v1` prefix).
    pub endpoint: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Vector width the model produces.
    pub dimensions: Option<usize>,
}

/// Chat provider configuration.
///
/// Kept apart from [`EmbeddingConfig`] so the two can point at different
/// providers.
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    /// API endpoint (OpenAI-compatible, includes the `/v1` prefix).
    pub endpoint: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Database path.
    pub db_path: Option<String>,
    /// Embedding configuration.
    pub embedding: Option<ConfigFileEmbedding>,
    /// Chat configuration.
    pub chat: Option<ConfigFileChat>,
}

/// Embedding section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileEmbedding {
    /// API endpoint.
    pub endpoint: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Vector width.
    pub dimensions: Option<usize>,
}

/// Chat section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileChat {
    /// API endpoint.
    pub endpoint: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            db_path: crate::storage::PromptStore::default_user_path()
                .unwrap_or_else(|| PathBuf::from("promptvault.db")),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl VaultConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/promptvault/` on macOS)
    /// 2. XDG config dir (`~/.config/promptvault/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        // Check platform-specific config dir first
        let platform_config = base_dirs
            .config_dir()
            .join("promptvault")
            .join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        // Fall back to XDG-style ~/.config/promptvault/ for Unix compatibility
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("promptvault")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `VaultConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(db_path) = file.db_path {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(embedding) = file.embedding {
            config.embedding.endpoint = embedding.endpoint;
            config.embedding.model = embedding.model;
            config.embedding.api_key = embedding.api_key;
            config.embedding.dimensions = embedding.dimensions;
        }
        if let Some(chat) = file.chat {
            config.chat.endpoint = chat.endpoint;
            config.chat.model = chat.model;
            config.chat.api_key = chat.api_key;
        }

        config
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }
}
