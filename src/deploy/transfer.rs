// src/deploy/transfer.rs

//! Payload transfer stage.
//!
//! Every required file is checked locally before the first remote call, so
//! a missing file can never leave a partial upload behind. The secrets
//! file is the single optional member: absent means a warning, not an
//! abort, and any fallout surfaces later at the health check.
//!
//! No checksum or diff skip: a redeploy re-copies everything and is
//! idempotent by overwrite.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PayloadSection;
use crate::deploy::ensure_success;
use crate::errors::{DeployError, Result};
use crate::exec::RemoteExecutor;

/// Resolve the payload against `local_root`, verifying required files.
///
/// Returns the source list for the copy plus whether the secrets file was
/// included.
pub fn collect_payload(
    local_root: &Path,
    payload: &PayloadSection,
) -> Result<(Vec<PathBuf>, bool)> {
    let mut sources = Vec::with_capacity(payload.files.len() + 1);

    for name in &payload.files {
        let path = local_root.join(name);
        if !path.is_file() {
            return Err(DeployError::MissingPayload(path));
        }
        sources.push(path);
    }

    let secrets = local_root.join(&payload.secrets);
    let secrets_included = secrets.is_file();
    if secrets_included {
        sources.push(secrets);
    } else {
        warn!(
            file = %payload.secrets,
            "secrets file not found locally; deploying without it \
             (the service may fail to start until it is provided)"
        );
    }

    Ok((sources, secrets_included))
}

/// Copy the payload set into the remote directory as one batched upload.
pub async fn push_payload(
    exec: &dyn RemoteExecutor,
    local_root: &Path,
    payload: &PayloadSection,
    remote_dir: &str,
) -> Result<bool> {
    let (sources, secrets_included) = collect_payload(local_root, payload)?;

    debug!(files = sources.len(), remote_dir, "uploading payload");
    let out = exec.upload(&sources, remote_dir).await?;
    ensure_success("upload-payload", &out)?;

    Ok(secrets_included)
}
