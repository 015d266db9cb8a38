// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file and run validation, falling back to built-in
/// defaults when the file does not exist.
///
/// The config file is optional by design: the defaults reproduce the bot's
/// standard deployment, and most runs only supply the target address on the
/// command line.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    let config = if path.exists() {
        load_from_path(path)?
    } else {
        debug!(?path, "no config file found, using built-in defaults");
        ConfigFile::default()
    };

    validate_config(&config)?;
    Ok(config)
}

/// Directory against which relative payload paths are resolved.
///
/// Currently: directory containing the config file, or `.`.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("."),
    }
}
