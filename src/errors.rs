// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GobError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A package could not be resolved from the source root.
    ///
    /// Reported per package; it never invalidates graph state that was
    /// already built for other packages.
    #[error("Could not resolve package '{package}': {reason}")]
    Resolution { package: String, reason: String },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GobError {
    pub fn resolution(package: impl Into<String>, reason: impl Into<String>) -> Self {
        GobError::Resolution {
            package: package.into(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GobError>;
