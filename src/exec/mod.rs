// src/exec/mod.rs

//! Remote execution layer.
//!
//! This module owns everything that talks to the target host:
//!
//! - [`script`] describes a remote stage as a named list of shell command
//!   lines, rendered to one opaque script string.
//! - [`remote`] defines the [`RemoteExecutor`] seam: run a script, upload a
//!   file batch, get back a structured `{status, stdout, stderr}` result.
//! - [`ssh`] is the production implementation, shelling out to the local
//!   `ssh`/`scp` binaries via `tokio::process::Command`.
//!
//! Tests implement [`RemoteExecutor`] with canned outputs so every stage
//! branch can be exercised without a live host.

pub mod remote;
pub mod script;
pub mod ssh;

pub use remote::{ExecOutput, RemoteExecutor};
pub use script::RemoteScript;
pub use ssh::{HostKeyPolicy, SshExecutor, Target};
