//! Configuration loader for shop-rs
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "SHOP_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "SHOP_CONFIG_FILE";

/// Legacy listening port, honoured when `SHOP_SERVER__PORT` is absent
const LEGACY_PORT_ENV: &str = "PORT";

const SERVER_PORT_ENV: &str = "SHOP_SERVER__PORT";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SHOP";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `PORT` for the listening port
/// 5. `SHOP_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
    /// Snapshot of the process environment the loader reads from
    vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a loader from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if both `SHOP_CONFIG_DIR` and `SHOP_CONFIG_FILE` are set,
    /// as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Create a loader that reads `SHOP_*` and `PORT` from `vars` instead
    /// of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let config_file = vars.get(CONFIG_FILE_ENV).map(PathBuf::from);

        if config_file.is_some() && vars.contains_key(CONFIG_DIR_ENV) {
            return Err(ConfigError::ConflictingSources);
        }

        let config_dir = vars
            .get(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
        let environment = AppEnvironment::from_vars(&vars);

        Ok(Self {
            config_dir,
            config_file,
            environment,
            vars,
        })
    }

    /// Load a single file instead of the layered directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found (when using layered loading)
    /// - Configuration parsing fails
    /// - `PORT` is set but is not a valid port number
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let mut settings: Settings = config.try_deserialize().map_err(ConfigError::Deserialize)?;

        self.apply_legacy_port(&mut settings)?;
        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // SHOP_SERVER__PORT -> server.port
        let builder = self.add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// Maps `SHOP_`-prefixed variables onto configuration keys, with `__`
    /// separating nested sections (`SHOP_DATABASE__URL` -> `database.url`).
    fn add_env_source(&self, builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        let source: config::Map<String, String> = self
            .vars
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .source(Some(source)),
        )
    }

    fn apply_legacy_port(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if self.vars.contains_key(SERVER_PORT_ENV) {
            return Ok(());
        }

        let Some(raw) = self
            .vars
            .get(LEGACY_PORT_ENV)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
        else {
            return Ok(());
        };

        settings.server.port = raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
            var: LEGACY_PORT_ENV,
            value: raw.to_string(),
            message: "expected a port number between 1 and 65535".to_string(),
        })?;
        Ok(())
    }
}
