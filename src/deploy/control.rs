// src/deploy/control.rs

//! Service restart and post-start health check.
//!
//! Restart is used for first deploys and redeploys alike. After the fixed
//! grace delay the service state is queried once; there is no retry of the
//! start attempt. An inactive service ends the run in a logically failed
//! state, but the recent journal tail is fetched and printed first so the
//! operator can diagnose without opening a second session.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ServiceSection;
use crate::deploy::ensure_success;
use crate::errors::Result;
use crate::exec::{RemoteExecutor, RemoteScript};

/// Terminal state of the health check, observed once after the grace delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Active,
    Inactive,
}

/// Restart the registered service and verify it became healthy.
///
/// A failing `systemctl restart` is fatal; an inactive state afterwards is
/// reported as [`ServiceState::Inactive`], never as `Err`.
pub async fn restart_and_verify(
    exec: &dyn RemoteExecutor,
    service: &ServiceSection,
) -> Result<ServiceState> {
    let restart = RemoteScript::new("restart-service")
        .line(format!("sudo systemctl restart {}", service.name));
    let out = exec.run_script(&restart).await?;
    ensure_success(restart.name(), &out)?;

    debug!(
        secs = service.start_grace_secs,
        "waiting for the service to settle"
    );
    tokio::time::sleep(Duration::from_secs(service.start_grace_secs)).await;

    let query = RemoteScript::new("query-service-state")
        .line(format!("systemctl is-active {}", service.name));
    let out = exec.run_script(&query).await?;

    // `is-active` prints the state and exits non-zero for anything but
    // "active"; the stdout comparison is the confirmation check.
    if out.stdout.trim() == "active" {
        info!(service = %service.name, "service is active");
        return Ok(ServiceState::Active);
    }

    warn!(
        service = %service.name,
        state = %out.stdout.trim(),
        "service did not come up, fetching journal tail"
    );

    let tail = RemoteScript::new("collect-service-logs").line(format!(
        "sudo journalctl -u {} -n {} --no-pager",
        service.name, service.log_tail_lines
    ));
    match exec.run_script(&tail).await {
        Ok(out) if !out.success() => {
            warn!(status = out.status, "journal tail could not be fetched");
        }
        Ok(_) => {}
        Err(err) => warn!(error = %err, "journal tail could not be fetched"),
    }

    Ok(ServiceState::Inactive)
}
