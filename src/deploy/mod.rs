// src/deploy/mod.rs

//! Deployment orchestrator.
//!
//! This module ties together the five stages of a run:
//! 1. create the remote directory
//! 2. transfer the payload
//! 3. install the runtime and dependencies
//! 4. install the systemd unit
//! 5. restart the service and check health
//!
//! Stages run strictly in order; the first fatal failure aborts the run
//! with no rollback of completed stages. A failed health check is not
//! fatal to the process: the journal tail and the cheat-sheet are still
//! printed so the operator can diagnose without a separate session.

pub mod control;
pub mod deps;
pub mod service;
pub mod summary;
pub mod transfer;

use std::path::PathBuf;

use tracing::info;

use crate::config::{ConfigFile, RemoteSection};
use crate::errors::{DeployError, Result};
use crate::exec::{ExecOutput, RemoteExecutor, RemoteScript, Target};

pub use control::ServiceState;

/// Number of numbered stages printed in progress banners.
pub const TOTAL_STAGES: usize = 5;

/// Result of a full deployment run.
///
/// Not persisted anywhere; it exists only for the caller and the printed
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployReport {
    /// Whether the optional secrets file was found and shipped.
    pub secrets_included: bool,
    /// Terminal state of the post-restart health check.
    pub health: ServiceState,
}

/// One deployment run against a single target.
///
/// Owns the sequencing decisions; each stage owns only its remote side
/// effects and reports back through its `Result`.
pub struct Deployment<'a> {
    exec: &'a dyn RemoteExecutor,
    cfg: &'a ConfigFile,
    target: &'a Target,
    local_root: PathBuf,
}

impl<'a> Deployment<'a> {
    pub fn new(
        exec: &'a dyn RemoteExecutor,
        cfg: &'a ConfigFile,
        target: &'a Target,
        local_root: PathBuf,
    ) -> Self {
        Self {
            exec,
            cfg,
            target,
            local_root,
        }
    }

    /// Run all stages in fixed order, fail-fast.
    ///
    /// Returns `Ok` with an [`DeployReport`] even when the service ends up
    /// inactive; `Err` means a provisioning stage aborted the run.
    pub async fn run(&self) -> Result<DeployReport> {
        banner(1, &format!("preparing remote directory {}", self.cfg.remote.dir));
        let out = self
            .exec
            .run_script(&ensure_dir_script(&self.cfg.remote))
            .await?;
        ensure_success("create-remote-dir", &out)?;

        banner(
            2,
            &format!("transferring payload ({} files)", self.cfg.payload.files.len()),
        );
        let secrets_included = transfer::push_payload(
            self.exec,
            &self.local_root,
            &self.cfg.payload,
            &self.cfg.remote.dir,
        )
        .await?;

        banner(3, "installing runtime and dependencies");
        deps::install_dependencies(self.exec, &self.cfg.remote, &self.cfg.payload).await?;

        banner(
            4,
            &format!("installing systemd unit {}.service", self.cfg.service.name),
        );
        service::install_service(self.exec, self.cfg, self.target.user()).await?;

        banner(5, "restarting service and checking health");
        let health = control::restart_and_verify(self.exec, &self.cfg.service).await?;

        match health {
            ServiceState::Active => {
                println!(
                    "deployment complete: service {} is active",
                    self.cfg.service.name
                );
            }
            ServiceState::Inactive => {
                println!(
                    "deployment finished with errors: service {} is not active \
                     (journal tail printed above)",
                    self.cfg.service.name
                );
            }
        }

        println!("{}", summary::cheat_sheet(self.target, self.cfg));

        Ok(DeployReport {
            secrets_included,
            health,
        })
    }
}

fn ensure_dir_script(remote: &RemoteSection) -> RemoteScript {
    RemoteScript::new("create-remote-dir").line(format!("mkdir -p {}", remote.dir))
}

/// Map a non-zero remote exit into the fatal stage error.
pub(crate) fn ensure_success(label: &str, out: &ExecOutput) -> Result<()> {
    if out.success() {
        Ok(())
    } else {
        Err(DeployError::RemoteCommand {
            label: label.to_string(),
            status: out.status,
        })
    }
}

fn banner(step: usize, msg: &str) {
    println!("[{step}/{TOTAL_STAGES}] {msg}");
    info!(step, total = TOTAL_STAGES, "{msg}");
}
