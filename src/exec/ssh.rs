// src/exec/ssh.rs

//! Production [`RemoteExecutor`] built on the local `ssh` and `scp`
//! binaries.
//!
//! Script bodies are fed to `bash -s` over stdin, so nothing needs to be
//! quoted for the wire. Remote output is streamed line-by-line to the
//! operator's terminal while also being captured for the structured result.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::config::TargetSection;
use crate::errors::{DeployError, Result};
use crate::exec::remote::{ExecOutput, RemoteExecutor};
use crate::exec::script::RemoteScript;

/// `StrictHostKeyChecking` policy passed to `ssh`/`scp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept and record keys of previously unseen hosts (`accept-new`).
    AcceptNew,
    /// Refuse hosts that are not already in `known_hosts` (`yes`).
    Strict,
}

impl HostKeyPolicy {
    fn as_openssh_value(self) -> &'static str {
        match self {
            HostKeyPolicy::AcceptNew => "accept-new",
            HostKeyPolicy::Strict => "yes",
        }
    }
}

impl FromStr for HostKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept-new" => Ok(HostKeyPolicy::AcceptNew),
            "strict" | "yes" => Ok(HostKeyPolicy::Strict),
            other => Err(format!(
                "invalid host_key_policy '{other}' (expected 'accept-new' or 'strict')"
            )),
        }
    }
}

/// The remote host plus connection parameters, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct Target {
    address: String,
    key_path: Option<PathBuf>,
    connect_timeout: Duration,
    host_key_policy: HostKeyPolicy,
}

impl Target {
    /// Build a target from the CLI address/key and the `[target]` config
    /// section.
    ///
    /// The address must be in `user@host` form; the user part becomes the
    /// `User=` of the installed service.
    pub fn new(
        address: impl Into<String>,
        key_path: Option<PathBuf>,
        section: &TargetSection,
    ) -> Result<Self> {
        let address = address.into();

        match address.split_once('@') {
            Some((user, host)) if !user.is_empty() && !host.is_empty() => {}
            _ => {
                return Err(DeployError::Config(format!(
                    "target address '{address}' must be in user@host form"
                )));
            }
        }

        let host_key_policy = section
            .host_key_policy
            .parse::<HostKeyPolicy>()
            .map_err(DeployError::Config)?;

        Ok(Self {
            address,
            key_path,
            connect_timeout: Duration::from_secs(section.connect_timeout_secs),
            host_key_policy,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The user part of the address.
    pub fn user(&self) -> &str {
        self.address.split('@').next().unwrap_or(&self.address)
    }

    pub fn key_path(&self) -> Option<&Path> {
        self.key_path.as_deref()
    }

    /// `-o`/`-i` options shared by `ssh` and `scp`.
    fn transport_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs()),
            "-o".to_string(),
            format!(
                "StrictHostKeyChecking={}",
                self.host_key_policy.as_openssh_value()
            ),
        ];
        if let Some(key) = &self.key_path {
            args.push("-i".to_string());
            args.push(key.display().to_string());
        }
        args
    }
}

/// Executor that runs every operation through OpenSSH client binaries.
pub struct SshExecutor {
    target: Target,
}

impl SshExecutor {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    async fn run_local(
        program: &str,
        args: Vec<String>,
        stdin_body: Option<String>,
    ) -> Result<ExecOutput> {
        debug!(program, ?args, "spawning local process");

        let mut cmd = Command::new(program);
        cmd.args(&args)
            .stdin(if stdin_body.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning '{program}'"))?;

        if let Some(body) = stdin_body {
            let mut stdin = child
                .stdin
                .take()
                .context("child process has no stdin handle")?;
            stdin
                .write_all(body.as_bytes())
                .await
                .context("writing script body to remote shell")?;
            // Dropping the handle closes the pipe so the remote shell sees EOF.
            drop(stdin);
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Stream remote output to the operator as it arrives, capturing a
        // copy for the structured result.
        let stdout_task = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    println!("{line}");
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        });

        let stderr_task = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("{line}");
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        });

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for '{program}'"))?;

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ExecOutput {
            status: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

impl RemoteExecutor for SshExecutor {
    fn run_script(
        &self,
        script: &RemoteScript,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>> {
        let body = script.render();
        let name = script.name().to_string();

        let mut args = self.target.transport_args();
        args.push(self.target.address().to_string());
        args.push("bash".to_string());
        args.push("-s".to_string());

        Box::pin(async move {
            debug!(script = %name, "running remote script over ssh");
            Self::run_local("ssh", args, Some(body)).await
        })
    }

    fn upload(
        &self,
        sources: &[PathBuf],
        remote_dir: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>> {
        let files = sources.len();
        let mut args = self.target.transport_args();
        for src in sources {
            args.push(src.display().to_string());
        }
        args.push(format!("{}:{}/", self.target.address(), remote_dir));

        Box::pin(async move {
            debug!(files, "uploading payload batch over scp");
            Self::run_local("scp", args, None).await
        })
    }
}
