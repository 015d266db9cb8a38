// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{DeployError, Result};
use crate::exec::HostKeyPolicy;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - the payload lists at least one file
/// - the manifest is part of the payload (it must be transferred to be
///   installable)
/// - the remote directory is an absolute path
/// - the service name is systemd-safe
/// - `connect_timeout_secs >= 1`
/// - `host_key_policy` parses
///
/// It does **not** check that payload files exist locally; that happens at
/// transfer time, where the missing path can be reported precisely.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_payload(cfg)?;
    validate_manifest(cfg)?;
    validate_remote_dir(cfg)?;
    validate_service_name(cfg)?;
    validate_target_options(cfg)?;
    Ok(())
}

fn ensure_has_payload(cfg: &ConfigFile) -> Result<()> {
    if cfg.payload.files.is_empty() {
        return Err(DeployError::Config(
            "[payload].files must list at least one file".to_string(),
        ));
    }
    Ok(())
}

fn validate_manifest(cfg: &ConfigFile) -> Result<()> {
    if !cfg.payload.files.iter().any(|f| f == &cfg.payload.manifest) {
        return Err(DeployError::Config(format!(
            "[payload].manifest '{}' is not listed in [payload].files",
            cfg.payload.manifest
        )));
    }
    Ok(())
}

fn validate_remote_dir(cfg: &ConfigFile) -> Result<()> {
    if !cfg.remote.dir.starts_with('/') {
        return Err(DeployError::Config(format!(
            "[remote].dir must be an absolute path (got '{}')",
            cfg.remote.dir
        )));
    }
    if cfg.remote.dir == "/" {
        return Err(DeployError::Config(
            "[remote].dir must not be the filesystem root".to_string(),
        ));
    }
    Ok(())
}

fn validate_service_name(cfg: &ConfigFile) -> Result<()> {
    let name = &cfg.service.name;
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(DeployError::Config(format!(
            "[service].name '{}' must be non-empty and contain only \
             alphanumerics, '-', '_' or '.'",
            name
        )));
    }
    Ok(())
}

fn validate_target_options(cfg: &ConfigFile) -> Result<()> {
    if cfg.target.connect_timeout_secs == 0 {
        return Err(DeployError::Config(
            "[target].connect_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    cfg.target
        .host_key_policy
        .parse::<HostKeyPolicy>()
        .map_err(DeployError::Config)?;

    Ok(())
}
