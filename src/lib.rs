// src/lib.rs

pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod exec;
pub mod logging;

use std::path::PathBuf;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::{config_root_dir, load_and_validate};
use crate::config::ConfigFile;
use crate::deploy::{Deployment, TOTAL_STAGES};
use crate::errors::Result;
use crate::exec::{SshExecutor, Target};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (built-in defaults when no `Deploy.toml` exists)
/// - the target built from CLI address/key + `[target]` options
/// - the SSH executor
/// - the five-stage deployment run
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let target = Target::new(
        args.target.as_str(),
        args.key.clone().map(PathBuf::from),
        &cfg.target,
    )?;

    if args.dry_run {
        print_dry_run(&cfg, &target);
        return Ok(());
    }

    let local_root = config_root_dir(&config_path);
    info!(
        target = %target.address(),
        remote_dir = %cfg.remote.dir,
        service = %cfg.service.name,
        "starting deployment"
    );

    let exec = SshExecutor::new(target.clone());
    let deployment = Deployment::new(&exec, &cfg, &target, local_root);
    let report = deployment.run().await?;

    info!(?report.health, secrets = report.secrets_included, "deployment run finished");
    Ok(())
}

/// Simple dry-run output: print the resolved plan without touching the host.
fn print_dry_run(cfg: &ConfigFile, target: &Target) {
    println!("arbdeploy dry-run");
    println!("  target = {}", target.address());
    if let Some(key) = target.key_path() {
        println!("  key = {}", key.display());
    }
    println!("  remote.dir = {}", cfg.remote.dir);
    println!("  remote.runtime = {}", cfg.remote.runtime);
    println!("  service.name = {}", cfg.service.name);
    println!("  service.entrypoint = {}", cfg.service.entrypoint);
    println!();

    println!("payload ({} files):", cfg.payload.files.len());
    for file in &cfg.payload.files {
        println!("  - {file}");
    }
    println!("  - {} (optional secrets)", cfg.payload.secrets);
    println!();

    println!("stages (1..{TOTAL_STAGES}):");
    println!("  1. create remote directory");
    println!("  2. transfer payload");
    println!("  3. install runtime and dependencies");
    println!("  4. install systemd unit");
    println!("  5. restart service and check health");
}
