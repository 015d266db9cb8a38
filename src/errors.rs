// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("required payload file missing locally: {0}")]
    MissingPayload(PathBuf),

    #[error("remote step '{label}' exited with status {status}")]
    RemoteCommand { label: String, status: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DeployError>;
