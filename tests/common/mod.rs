#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use arbdeploy::config::ConfigFile;
use arbdeploy::errors::Result;
use arbdeploy::exec::{ExecOutput, RemoteExecutor, RemoteScript, Target};

/// One recorded executor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Script { name: String, body: String },
    Upload { sources: Vec<PathBuf>, dest: String },
}

/// A fake remote host: records every call and replays canned outputs
/// keyed by script name (uploads use the key `"upload"`).
///
/// Unconfigured calls succeed with empty output.
#[derive(Default)]
pub struct FakeRemote {
    calls: Arc<Mutex<Vec<RemoteCall>>>,
    outputs: Mutex<HashMap<String, ExecOutput>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output(&self, name: &str, status: i32, stdout: &str) {
        self.outputs.lock().unwrap().insert(
            name.to_string(),
            ExecOutput {
                status,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Call labels in order; uploads appear as `"upload"`.
    pub fn call_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| match c {
                RemoteCall::Script { name, .. } => name,
                RemoteCall::Upload { .. } => "upload".to_string(),
            })
            .collect()
    }
}

impl RemoteExecutor for FakeRemote {
    fn run_script(
        &self,
        script: &RemoteScript,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>> {
        let call = RemoteCall::Script {
            name: script.name().to_string(),
            body: script.render(),
        };
        let out = self
            .outputs
            .lock()
            .unwrap()
            .get(script.name())
            .cloned()
            .unwrap_or_default();
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls.lock().unwrap().push(call);
            Ok(out)
        })
    }

    fn upload(
        &self,
        sources: &[PathBuf],
        remote_dir: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ExecOutput>> + Send + '_>> {
        let call = RemoteCall::Upload {
            sources: sources.to_vec(),
            dest: remote_dir.to_string(),
        };
        let out = self
            .outputs
            .lock()
            .unwrap()
            .get("upload")
            .cloned()
            .unwrap_or_default();
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls.lock().unwrap().push(call);
            Ok(out)
        })
    }
}

/// A small config: three payload files and no post-restart wait, so tests
/// run instantly.
pub fn minimal_config() -> ConfigFile {
    let mut cfg = ConfigFile::default();
    cfg.payload.files = vec![
        "run.py".to_string(),
        "config.yaml".to_string(),
        "requirements.txt".to_string(),
    ];
    cfg.service.start_grace_secs = 0;
    cfg
}

/// Create the payload files from `cfg` under `root`.
pub fn stage_payload(root: &Path, cfg: &ConfigFile, with_secrets: bool) {
    for name in &cfg.payload.files {
        fs::write(root.join(name), b"payload\n").unwrap();
    }
    if with_secrets {
        fs::write(root.join(&cfg.payload.secrets), b"API_KEY=k\n").unwrap();
    }
}

pub fn test_target(cfg: &ConfigFile) -> Target {
    Target::new("deploy-user@10.0.0.5", None, &cfg.target).unwrap()
}

/// The full stage sequence of a healthy run, as recorded by [`FakeRemote`].
pub fn healthy_sequence() -> Vec<String> {
    [
        "create-remote-dir",
        "upload",
        "install-dependencies",
        "install-service",
        "restart-service",
        "query-service-state",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
