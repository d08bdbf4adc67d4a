//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use stackshift_detect::DetectionTables;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::types::StackshiftConfig;

const DEFAULT_ENV_PREFIX: &str = "STACKSHIFT";

/// Loads, validates and saves [`StackshiftConfig`]
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Manager for the default file and `STACKSHIFT_` variables
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Read environment variables with another prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// `<config_dir>/stackshift/config.toml`
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stackshift")
            .join("config.toml")
    }

    /// Load the file (if present) overlaid with environment variables.
    ///
    /// Nested keys use a double underscore:
    /// `STACKSHIFT_LIMITS__MAX_FILES=100`.
    pub fn load_config(&self) -> Result<StackshiftConfig> {
        let builder = Config::builder()
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: StackshiftConfig = builder.build()?.try_deserialize()?;
        self.validate_config(&config)?;
        info!(
            path = %self.config_path.display(),
            mode = %config.parsing.mode,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save_config(&self, config: &StackshiftConfig) -> Result<()> {
        self.validate_config(config)?;
        let toml = toml::to_string(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        debug!(path = %self.config_path.display(), "Saved configuration");
        Ok(())
    }

    /// Reject zero limits and empty output identifiers
    pub fn validate_config(&self, config: &StackshiftConfig) -> Result<()> {
        let limits = &config.limits;
        if limits.max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_file_size_bytes must be greater than 0".to_string(),
            ));
        }
        if limits.max_files == 0 {
            return Err(ConfigError::Validation(
                "limits.max_files must be greater than 0".to_string(),
            ));
        }
        if limits.max_total_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_total_bytes must be greater than 0".to_string(),
            ));
        }
        if config.output.project_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.project_name must not be empty".to_string(),
            ));
        }
        if config.output.package_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.package_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Detection tables named by `detection.tables_path`, or the built-in set
    pub fn detection_tables(&self, config: &StackshiftConfig) -> Result<DetectionTables> {
        let Some(path) = &config.detection.tables_path else {
            return Ok(DetectionTables::builtin());
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let tables = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "Loaded detection tables");
        Ok(tables)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
