// src/deploy/service.rs

//! Service installation stage.
//!
//! Renders the systemd unit from configuration and ships it inside the
//! stage script as a quoted heredoc, then installs it under
//! `/etc/systemd/system`, reloads the unit index and enables boot start.
//! The unit file is rewritten unconditionally on every run; same inputs
//! produce the same file, so the stage is idempotent.

use crate::config::ConfigFile;
use crate::deploy::ensure_success;
use crate::errors::Result;
use crate::exec::{RemoteExecutor, RemoteScript};

/// Render the systemd unit text.
///
/// `user` is the target's user part; the service runs as the deploy user,
/// never root. Writes are confined to the remote directory and privilege
/// escalation is disabled.
pub fn render_unit(cfg: &ConfigFile, user: &str) -> String {
    let dir = &cfg.remote.dir;
    let venv = &cfg.payload.venv_dir;

    format!(
        "[Unit]\n\
         Description=Spot/futures arbitrage trading bot\n\
         After=network-online.target\n\
         Wants=network-online.target\n\
         \n\
         [Service]\n\
         Type=simple\n\
         User={user}\n\
         WorkingDirectory={dir}\n\
         ExecStart={dir}/{venv}/bin/python {dir}/{entrypoint}\n\
         Restart=on-failure\n\
         RestartSec={restart_delay}\n\
         StandardOutput=journal\n\
         StandardError=journal\n\
         NoNewPrivileges=true\n\
         ProtectSystem=full\n\
         ReadWritePaths={dir}\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        entrypoint = cfg.service.entrypoint,
        restart_delay = cfg.service.restart_delay_secs,
    )
}

/// Build the unit-install script: write, install, reload, enable.
pub fn install_script(cfg: &ConfigFile, user: &str) -> RemoteScript {
    let name = &cfg.service.name;
    let staged = format!("/tmp/{name}.service");

    let mut script =
        RemoteScript::new("install-service").line(format!("cat > {staged} <<'UNIT'"));
    for line in render_unit(cfg, user).lines() {
        script = script.line(line);
    }
    script
        .line("UNIT")
        .line(format!(
            "sudo install -m 644 {staged} /etc/systemd/system/{name}.service"
        ))
        .line(format!("rm -f {staged}"))
        .line("sudo systemctl daemon-reload")
        .line(format!("sudo systemctl enable {name}"))
}

/// Materialize and register the service definition on the host.
pub async fn install_service(
    exec: &dyn RemoteExecutor,
    cfg: &ConfigFile,
    user: &str,
) -> Result<()> {
    let script = install_script(cfg, user);
    let out = exec.run_script(&script).await?;
    ensure_success(script.name(), &out)
}
