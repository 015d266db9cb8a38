// src/deploy/deps.rs

//! Dependency installation stage.
//!
//! Runtime detection is existence-of-binary only: if `python3` (or the
//! configured runtime) resolves on PATH, it is accepted as-is with no
//! version check. The venv is created only when absent, so redeploys reuse
//! the existing environment and stale packages persist unless cleared by
//! hand.

use crate::config::{PayloadSection, RemoteSection};
use crate::deploy::ensure_success;
use crate::errors::Result;
use crate::exec::{RemoteExecutor, RemoteScript};

/// Build the install script for the configured runtime and manifest.
pub fn install_script(remote: &RemoteSection, payload: &PayloadSection) -> RemoteScript {
    let dir = &remote.dir;
    let rt = &remote.runtime;
    let venv = &payload.venv_dir;

    let mut script = RemoteScript::new("install-dependencies")
        .line(format!("cd {dir}"))
        .line(format!("if ! command -v {rt} >/dev/null 2>&1; then"))
        .line("    sudo apt-get update -y")
        .line(format!("    sudo apt-get install -y {rt} {rt}-venv {rt}-pip"))
        .line("fi")
        .line(format!("if [ ! -d {venv} ]; then"))
        .line(format!("    {rt} -m venv {venv}"))
        .line("fi")
        .line(format!("{venv}/bin/pip install --upgrade pip"))
        .line(format!("{venv}/bin/pip install -r {}", payload.manifest));

    // Informational listing only; `|| true` keeps a grep miss from
    // failing the stage.
    if !payload.expected_packages.is_empty() {
        let filter = payload.expected_packages.join("|");
        script = script
            .line("echo '--- installed packages of interest ---'")
            .line(format!("{venv}/bin/pip list | grep -i -E '{filter}' || true"));
    }

    script
}

/// Ensure runtime, venv and declared dependencies are present on the host.
pub async fn install_dependencies(
    exec: &dyn RemoteExecutor,
    remote: &RemoteSection,
    payload: &PayloadSection,
) -> Result<()> {
    let script = install_script(remote, payload);
    let out = exec.run_script(&script).await?;
    ensure_success(script.name(), &out)
}
