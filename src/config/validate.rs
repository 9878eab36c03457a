// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GobError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_build_types(cfg)?;
    validate_extensions("[watch].template_types", &cfg.watch.template_types)?;
    validate_extensions("[watch].ignore_types", &cfg.watch.ignore_types)?;
    validate_exclude_globs(cfg)?;
    validate_agent(cfg)?;
    Ok(())
}

fn validate_build_types(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.build_types.is_empty() {
        return Err(GobError::ConfigError(
            "[build].build_types must list at least one extension".to_string(),
        ));
    }
    validate_extensions("[build].build_types", &cfg.build.build_types)
}

fn validate_extensions(field: &str, extensions: &[String]) -> Result<()> {
    for ext in extensions {
        if ext.len() < 2 || !ext.starts_with('.') || ext[1..].contains(['.', '/']) {
            return Err(GobError::ConfigError(format!(
                "{field}: '{ext}' is not a file extension (expected e.g. \".go\")"
            )));
        }
    }
    Ok(())
}

fn validate_exclude_globs(cfg: &RawConfigFile) -> Result<()> {
    for pattern in &cfg.watch.exclude {
        Glob::new(pattern).map_err(|e| {
            GobError::ConfigError(format!("[watch].exclude: invalid glob '{pattern}': {e}"))
        })?;
    }
    Ok(())
}

fn validate_agent(cfg: &RawConfigFile) -> Result<()> {
    if cfg.agent.port == 0 {
        return Err(GobError::ConfigError(
            "[agent].port must be a non-zero port number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::try_from(RawConfigFile::default()).is_ok());
    }

    #[test]
    fn rejects_bare_extensions() {
        let mut raw = RawConfigFile::default();
        raw.watch.template_types = vec!["soy".to_string()];
        match ConfigFile::try_from(raw) {
            Err(GobError::ConfigError(msg)) => assert!(msg.contains("template_types")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_broken_globs() {
        let mut raw = RawConfigFile::default();
        raw.watch.exclude = vec!["src/[".to_string()];
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(GobError::ConfigError(_))
        ));
    }
}
