// src/config/mod.rs

//! Deployment configuration: TOML model, loader and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, PayloadSection, RemoteSection, ServiceSection, TargetSection};
pub use validate::validate_config;
