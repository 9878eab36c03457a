// src/config/mod.rs

//! Configuration loading and validation for gob.
//!
//! Responsibilities:
//! - Define the TOML-backed data model of `.gob.toml` (`model.rs`).
//! - Load and save a config file (`loader.rs`).
//! - Validate extension lists, globs and ports (`validate.rs`).
//! - Merge CLI flags, file values and defaults (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{config_path_for, load_and_validate, load_from_path, load_if_present, save_to_path};
pub use model::{
    AgentSection, BuildSection, ConfigFile, RawConfigFile, RunSection, WatchSection,
    CONFIG_FILE_NAME,
};
pub use settings::{GoPaths, Settings};
