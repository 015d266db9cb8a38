// src/exec/remote.rs

//! The executor seam between the deployment stages and the target host.
//!
//! Production code uses [`SshExecutor`](super::ssh::SshExecutor); tests can
//! provide their own implementation that records calls and replays canned
//! outputs per script name.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::script::RemoteScript;

/// Structured result of one remote operation.
///
/// A non-zero status is data, not an error: stages decide whether it is
/// fatal. `Err` from the executor itself means the operation could not be
/// carried out at all (e.g. `ssh` failed to spawn).
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Process exit status; -1 when the process died without one.
    pub status: i32,
    /// Captured stdout (also streamed to the terminal as it arrived).
    pub stdout: String,
    /// Captured stderr (also streamed to the terminal as it arrived).
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Trait abstracting how remote operations are executed.
pub trait RemoteExecutor: Send + Sync {
    /// Run a rendered script body on the target and wait for it to exit.
    fn run_script(
        &self,
        script: &RemoteScript,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>>;

    /// Copy a batch of local files into `remote_dir` on the target as one
    /// operation.
    fn upload(
        &self,
        sources: &[PathBuf],
        remote_dir: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>>;
}
