// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile, CONFIG_FILE_NAME};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the package's config file if it exists.
pub fn load_if_present(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Option<ConfigFile>> {
    let path = path.as_ref();
    if !fs.is_file(path) {
        return Ok(None);
    }
    load_and_validate(fs, path).map(Some)
}

/// Write `config` as TOML to `path`.
pub fn save_to_path(fs: &dyn FileSystem, path: impl AsRef<Path>, config: &RawConfigFile) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    fs.write(path.as_ref(), contents.as_bytes())?;
    Ok(())
}

/// Location of the config file for a package directory.
pub fn config_path_for(package_dir: &Path) -> PathBuf {
    package_dir.join(CONFIG_FILE_NAME)
}
