//! Errors raised while loading or checking shop-rs settings.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `default.toml` (layered mode) or the `--config` / `SHOP_CONFIG_FILE`
    /// file does not exist.
    #[error("Required configuration file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The merged sources do not deserialize into `Settings`.
    #[error("Settings do not match the expected shape: {0}")]
    Deserialize(#[source] config::ConfigError),

    /// A loaded value failed validation; `field` is the dotted settings key.
    #[error("Invalid setting {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `SHOP_APP_ENV` or the legacy `PORT` holds an unusable value.
    #[error("Invalid value '{value}' for {var}: {message}")]
    InvalidEnvVar {
        var: &'static str,
        value: String,
        message: String,
    },

    #[error(
        "SHOP_CONFIG_DIR and SHOP_CONFIG_FILE cannot both be set; \
         use the directory for layered files or the file for a single one"
    )]
    ConflictingSources,

    /// Reading or merging the sources failed inside the `config` crate.
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted settings key or variable the error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationError { field, .. } => Some(field),
            ConfigError::InvalidEnvVar { var, .. } => Some(var),
            _ => None,
        }
    }
}
